//! # Driven Ports (Outbound SPI)

use std::io;
use std::net::SocketAddr;

/// Turns a configured host name and port into a socket address.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; the runtime re-resolves every
/// neighbor from a background task.
pub trait AddressResolver: Send + Sync {
    fn resolve(&self, host: &str, port: u16) -> io::Result<SocketAddr>;
}
