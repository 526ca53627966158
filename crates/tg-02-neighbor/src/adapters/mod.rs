//! Default adapters for the driven ports.

mod dns;

pub use dns::DnsResolver;
