//! # UDP Transport
//!
//! Implements the sender's [`DatagramTransport`] port on a shared
//! `std::net::UdpSocket`. The same socket is read by the receive loop, so
//! neighbors see our gossip coming from the configured port.

use std::io;
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};
use std::sync::Arc;

use tg_03_gossip_sender::DatagramTransport;

#[derive(Debug, Clone)]
pub struct UdpTransport {
    socket: Arc<UdpSocket>,
}

impl UdpTransport {
    pub fn new(socket: Arc<UdpSocket>) -> Self {
        Self { socket }
    }

    pub fn bind(address: impl ToSocketAddrs) -> io::Result<Self> {
        Ok(Self::new(Arc::new(UdpSocket::bind(address)?)))
    }

    pub fn socket(&self) -> &Arc<UdpSocket> {
        &self.socket
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }
}

impl DatagramTransport for UdpTransport {
    fn send_to(&self, payload: &[u8], destination: SocketAddr) -> io::Result<()> {
        let written = self.socket.send_to(payload, destination)?;
        if written != payload.len() {
            return Err(io::Error::new(
                io::ErrorKind::WriteZero,
                format!("datagram truncated: {written} of {} bytes", payload.len()),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_send_to_delivers_whole_datagram() {
        let transport = UdpTransport::bind("127.0.0.1:0").unwrap();
        let peer = UdpSocket::bind("127.0.0.1:0").unwrap();
        peer.set_read_timeout(Some(Duration::from_secs(2))).unwrap();

        let payload = vec![7u8; 1653];
        transport.send_to(&payload, peer.local_addr().unwrap()).unwrap();

        let mut buf = [0u8; 2048];
        let (len, from) = peer.recv_from(&mut buf).unwrap();
        assert_eq!(len, payload.len());
        assert_eq!(from, transport.local_addr().unwrap());
    }
}
