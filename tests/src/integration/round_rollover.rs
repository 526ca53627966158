//! # Round Rollover Flow
//!
//! A neighbor with a quota of 5 that sends 6 transactions within a round has
//! the sixth ignored. When the sender's round elapses the neighbor's round is
//! closed and the new quota of 10 applies.

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use node_runtime::GossipNode;
    use tg_01_transaction_codec::TransactionBuilder;
    use tg_03_gossip_sender::GossipSenderApi;

    use node_runtime::adapters::InboundOutcome;

    use crate::integration::support::{zero_delay_config, Peer};

    #[test]
    fn test_quota_resets_when_round_elapses() {
        let packets: Vec<Vec<u8>> = (0..6)
            .map(|i| {
                TransactionBuilder::new()
                    .with_tag(format!("QUOTA{}", char::from(b'A' + i)))
                    .build()
                    .unwrap()
                    .encode()
            })
            .collect();

        let peer = Peer::bind();
        let mut config = zero_delay_config(&[&peer]);
        config.gossip.max_tx_per_round = 5;
        config.gossip.round_duration_ms = 100;
        let node = GossipNode::new(config).unwrap();
        let neighbor = node.roster().snapshot()[0].clone();

        let outcomes: Vec<InboundOutcome> = packets
            .iter()
            .map(|bytes| node.inbound().handle_datagram(bytes, peer.addr()))
            .collect();
        assert!(outcomes[..5].iter().all(|o| *o == InboundOutcome::New));
        assert_eq!(outcomes[5], InboundOutcome::Ignored);
        assert!(neighbor.quota_exceeded());

        node.set_round_quota(10);
        let deadline = Instant::now() + Duration::from_secs(5);
        while node.sender().stats().rounds == 0 && Instant::now() < deadline {
            node.sender().step();
        }

        assert_eq!(node.sender().stats().rounds, 1);
        assert!(!neighbor.quota_exceeded());
        assert_eq!(neighbor.quota(), 10);
        let previous = neighbor.previous_stats();
        assert_eq!(previous.received_all, 5);
        assert_eq!(previous.received_new, 5);
        assert_eq!(previous.ignored, 1);
    }
}
