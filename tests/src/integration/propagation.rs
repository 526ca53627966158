//! # Propagation Flows
//!
//! 1. A transaction created by the node reaches every neighbor exactly once
//! 2. A transaction received from one neighbor reaches the others, not the
//!    origin
//! 3. A missing trunk is requested on the next outgoing packet

#[cfg(test)]
mod tests {
    use shared_types::TxHash;
    use tg_01_transaction_codec::{encode_packet, TransactionBuilder};
    use tg_03_gossip_sender::{DispatchOutcome, SendLog};

    use crate::integration::support::{node_for, Peer};

    #[test]
    fn test_own_transaction_reaches_three_peers_once() {
        let peers = [Peer::bind(), Peer::bind(), Peer::bind()];
        let node = node_for(&[&peers[0], &peers[1], &peers[2]]);

        let tx = TransactionBuilder::new()
            .with_tag("END9TO9END")
            .build()
            .unwrap();
        let hash = node.broadcast(tx);

        // One scheduler tick.
        let outcome = node.sender().step();
        assert_eq!(
            outcome,
            Some(DispatchOutcome::Delivered {
                sent: 3,
                skipped: 0,
                failed: 0,
                unresolved: 0,
            })
        );

        for peer in &peers {
            let packet = peer.recv().expect("peer should receive the transaction");
            assert_eq!(packet.transaction.hash(), &hash);
            assert!(packet.requested.is_null());
            assert!(peer.recv().is_none(), "exactly one transmission per peer");
        }
        assert!(node.send_log().lookup(&hash).unwrap().was_sent);
    }

    #[test]
    fn test_received_transaction_skips_its_origin() {
        let peers = [Peer::bind(), Peer::bind(), Peer::bind()];
        let node = node_for(&[&peers[0], &peers[1], &peers[2]]);
        let running = node.start().unwrap();

        let tx = TransactionBuilder::new()
            .with_tag("RELAYED")
            .build()
            .unwrap();
        peers[0].send(&tx.encode(), node.local_addr().unwrap());

        for peer in &peers[1..] {
            let packet = peer.recv().expect("other neighbors should get a copy");
            assert_eq!(packet.transaction.hash(), tx.hash());
        }
        assert!(peers[0].recv().is_none(), "origin must not get its own transaction back");

        let record = node.send_log().lookup(tx.hash()).unwrap();
        assert!(record.was_sent);
        assert_eq!(record.senders.len(), 1);

        running.shutdown();
    }

    #[test]
    fn test_missing_trunk_rides_on_forwarded_copy() {
        let peers = [Peer::bind(), Peer::bind()];
        let node = node_for(&[&peers[0], &peers[1]]);
        let running = node.start().unwrap();

        let missing = TxHash::from_trytes(&"Q".repeat(81)).unwrap();
        let tx = TransactionBuilder::new()
            .with_tag("ORPHAN")
            .with_references(missing, TxHash::NULL)
            .build()
            .unwrap();
        peers[0].send(&encode_packet(&tx, &TxHash::NULL), node.local_addr().unwrap());

        let packet = peers[1].recv().expect("forwarded copy");
        assert_eq!(packet.transaction.hash(), tx.hash());
        assert_eq!(packet.requested, missing);
        assert_eq!(node.sender().pending_requests(), 0);

        running.shutdown();
    }
}
