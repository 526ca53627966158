//! # Integration Flows
//!
//! Real `GossipNode`s talking to plain UDP sockets that stand in for peers.

pub mod propagation;
pub mod round_rollover;

#[cfg(test)]
pub(crate) mod support {
    use std::net::{SocketAddr, UdpSocket};
    use std::time::Duration;

    use node_runtime::container::NeighborConfig;
    use node_runtime::{GossipNode, NodeConfig};
    use tg_01_transaction_codec::{GossipPacket, PACKET_BYTES};

    /// A peer played by a bare socket.
    pub struct Peer {
        pub socket: UdpSocket,
    }

    impl Peer {
        pub fn bind() -> Self {
            let socket = UdpSocket::bind("127.0.0.1:0").unwrap();
            socket
                .set_read_timeout(Some(Duration::from_millis(500)))
                .unwrap();
            Self { socket }
        }

        pub fn addr(&self) -> SocketAddr {
            self.socket.local_addr().unwrap()
        }

        pub fn send(&self, bytes: &[u8], to: SocketAddr) {
            self.socket.send_to(bytes, to).unwrap();
        }

        /// Next packet, or `None` once the read times out.
        pub fn recv(&self) -> Option<GossipPacket> {
            let mut buf = vec![0u8; PACKET_BYTES + 1];
            let (len, _) = self.socket.recv_from(&mut buf).ok()?;
            Some(GossipPacket::decode(&buf[..len]).unwrap())
        }
    }

    pub fn zero_delay_config(peers: &[&Peer]) -> NodeConfig {
        let mut config = NodeConfig::default();
        config.network.bind_host = "127.0.0.1".into();
        config.network.port = 0;
        config.gossip.min_forward_delay_ms = 0;
        config.gossip.max_forward_delay_ms = 0;
        config.neighbors = peers
            .iter()
            .map(|peer| NeighborConfig {
                host: "127.0.0.1".into(),
                port: peer.addr().port(),
            })
            .collect();
        config
    }

    pub fn node_for(peers: &[&Peer]) -> GossipNode {
        GossipNode::new(zero_delay_config(peers)).unwrap()
    }
}
