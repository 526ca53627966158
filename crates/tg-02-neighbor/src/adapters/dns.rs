//! OS resolver adapter for the [`AddressResolver`] port.

use std::io;
use std::net::{SocketAddr, ToSocketAddrs};

use crate::ports::outbound::AddressResolver;

/// Resolves through the operating system's resolver.
///
/// The first address returned wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct DnsResolver;

impl AddressResolver for DnsResolver {
    fn resolve(&self, host: &str, port: u16) -> io::Result<SocketAddr> {
        (host, port).to_socket_addrs()?.next().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no address found for {host}:{port}"),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolves_ip_literal() {
        let addr = DnsResolver.resolve("127.0.0.1", 14265).unwrap();
        assert_eq!(addr, "127.0.0.1:14265".parse().unwrap());
    }

    #[test]
    fn test_unresolvable_host_is_an_error() {
        assert!(DnsResolver.resolve("no such host.invalid", 1).is_err());
    }
}
