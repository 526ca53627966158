//! # Two-Node Gossip Tests
//!
//! Two real nodes on localhost, each the other's only neighbor:
//!
//! 1. A broadcasts a transaction it created
//! 2. B receives it over UDP and attributes it to A
//! 3. B does not send it back, because A is its only neighbor and already
//!    has it

use std::net::UdpSocket;
use std::thread;
use std::time::{Duration, Instant};

use node_runtime::{GossipNode, NodeConfig};
use tg_01_transaction_codec::TransactionBuilder;
use tg_03_gossip_sender::{GossipSenderApi, SendLog};

fn local_node() -> GossipNode {
    let mut config = NodeConfig::default();
    config.network.bind_host = "127.0.0.1".into();
    config.network.port = 0;
    config.gossip.max_forward_delay_ms = 0;
    GossipNode::new(config).unwrap()
}

fn link(from: &GossipNode, to: &GossipNode) {
    let port = to.local_addr().unwrap().port();
    from.roster().add("127.0.0.1", port, 1000);
    assert_eq!(from.refresh_addresses(), 1);
}

fn wait_until(deadline: Duration, condition: impl Fn() -> bool) -> bool {
    let end = Instant::now() + deadline;
    while Instant::now() < end {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(10));
    }
    condition()
}

#[test]
fn test_transaction_crosses_to_neighbor_once() {
    let a = local_node();
    let b = local_node();
    link(&a, &b);
    link(&b, &a);

    let running_a = a.start().unwrap();
    let running_b = b.start().unwrap();

    let tx = TransactionBuilder::new()
        .with_tag("TWO9NODES")
        .build()
        .unwrap();
    let hash = a.broadcast(tx);

    assert!(wait_until(Duration::from_secs(5), || b.send_log().is_known(&hash)));
    assert!(wait_until(Duration::from_secs(5), || b.sender().stats().declined == 1));

    let from_a = b.roster().snapshot()[0].current_stats();
    assert_eq!(from_a.received_all, 1);
    assert_eq!(from_a.received_new, 1);

    let record = b.send_log().lookup(&hash).unwrap();
    assert!(!record.was_sent);
    assert!(record.senders.contains(&b.roster().snapshot()[0].id()));
    assert_eq!(b.sender().stats().packets_sent, 0);

    running_a.shutdown();
    running_b.shutdown();
}

#[test]
fn test_stranger_is_not_heard() {
    let a = local_node();
    let b = local_node();
    link(&b, &a);
    let running_b = b.start().unwrap();

    let stranger = UdpSocket::bind("127.0.0.1:0").unwrap();
    let tx = TransactionBuilder::new().with_tag("STRANGER").build().unwrap();
    stranger
        .send_to(&tx.encode(), b.local_addr().unwrap())
        .unwrap();

    thread::sleep(Duration::from_millis(300));
    assert!(!b.send_log().is_known(tx.hash()));
    assert_eq!(b.roster().snapshot()[0].current_stats().received_all, 0);

    running_b.shutdown();
}
