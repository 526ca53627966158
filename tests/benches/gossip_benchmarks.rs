//! # Trit Gossip Benchmarks
//!
//! | Path | What is measured |
//! |------|------------------|
//! | codec | packet decode (includes hashing), encode, Curl-P hash |
//! | sender | dispatch of one transaction to N neighbors over a null transport |

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use node_runtime::adapters::InMemorySendLog;
use shared_types::random_trytes;
use tg_01_transaction_codec::{content_hash, GossipPacket, Transaction, TransactionBuilder};
use tg_02_neighbor::{DnsResolver, NeighborRoster};
use tg_03_gossip_sender::{DatagramTransport, GossipSender, SchedulingParams};

// ============================================================================
// CODEC
// ============================================================================

fn sample_transaction() -> Transaction {
    TransactionBuilder::new()
        .with_address(random_trytes(81))
        .with_signature_fragments(random_trytes(2187))
        .with_tag("BENCH")
        .build()
        .unwrap()
}

fn bench_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("tg-01-transaction-codec");
    group.measurement_time(Duration::from_secs(10));

    let tx = sample_transaction();
    let bytes = tx.encode();
    let trits = tx.trits().to_vec();

    group.throughput(Throughput::Bytes(bytes.len() as u64));
    group.bench_function("decode_packet", |b| {
        b.iter(|| black_box(GossipPacket::decode(black_box(&bytes)).unwrap()))
    });
    group.bench_function("encode_packet", |b| b.iter(|| black_box(tx.encode())));
    group.bench_function("curl_hash", |b| {
        b.iter(|| black_box(content_hash(black_box(&trits))))
    });
    group.finish();
}

// ============================================================================
// SENDER
// ============================================================================

struct NullTransport;

impl DatagramTransport for NullTransport {
    fn send_to(&self, payload: &[u8], _destination: SocketAddr) -> io::Result<()> {
        black_box(payload);
        Ok(())
    }
}

fn bench_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("tg-03-gossip-sender");
    let tx = sample_transaction();

    for neighbors in [1u16, 8, 64] {
        let roster = Arc::new(NeighborRoster::new());
        for i in 0..neighbors {
            roster.add("127.0.0.1", 20_000 + i, 1000);
        }
        roster.resolve_all(&DnsResolver);
        let sender = GossipSender::new(
            SchedulingParams::default(),
            roster,
            Arc::new(InMemorySendLog::new()),
            Arc::new(NullTransport),
        )
        .unwrap();

        group.throughput(Throughput::Elements(u64::from(neighbors)));
        group.bench_with_input(
            BenchmarkId::new("dispatch", neighbors),
            &sender,
            |b, sender| b.iter(|| black_box(sender.dispatch(&tx))),
        );
    }
    group.finish();
}

criterion_group!(benches, bench_codec, bench_dispatch);
criterion_main!(benches);
