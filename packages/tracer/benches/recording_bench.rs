// packages/tracer/benches/recording_bench.rs
//! Recording throughput: enqueue + stream + export into memory

use chrono::Utc;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use qlog_tracer::protocol::{
    AckFrame, AckRange, ConnectionId, ExtendedHeader, Frame, Header, Perspective,
};
use qlog_tracer::{MemorySink, Tracer, TracerConfig};
use std::time::Duration;

fn odcid() -> ConnectionId {
    ConnectionId::from_slice(&[0xde, 0xad, 0xbe, 0xef, 0x00, 0x01, 0x02, 0x03]).unwrap()
}

fn bench_sent_packets(c: &mut Criterion) {
    let mut group = c.benchmark_group("sent_packet");
    let hdr = ExtendedHeader::new(Header::short(odcid()), 1);
    let ack = AckFrame {
        ranges: vec![AckRange::new(10, 20), AckRange::new(1, 5)],
        delay: Duration::from_micros(250),
    };
    let frames = vec![
        Frame::Stream {
            stream_id: 4,
            offset: 0,
            data: bytes::Bytes::from_static(&[0u8; 1100]),
            fin: false,
        },
        Frame::Ping,
    ];

    for count in [100u64, 1_000, 10_000] {
        group.throughput(Throughput::Elements(count));
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter(|| {
                let tracer = Tracer::new(MemorySink::new(), Perspective::Client, odcid()).unwrap();
                for _ in 0..count {
                    tracer.sent_packet(Utc::now(), &hdr, 1252, Some(&ack), &frames);
                }
                black_box(tracer.export().unwrap())
            });
        });
    }
    group.finish();
}

fn bench_queue_capacity(c: &mut Criterion) {
    let mut group = c.benchmark_group("queue_capacity");
    group.throughput(Throughput::Elements(5_000));

    for capacity in [1usize, 50, 1_000] {
        group.bench_with_input(
            BenchmarkId::from_parameter(capacity),
            &capacity,
            |b, &capacity| {
                b.iter(|| {
                    let config = TracerConfig::default().with_queue_capacity(capacity);
                    let tracer =
                        Tracer::with_config(MemorySink::new(), Perspective::Server, odcid(), config)
                            .unwrap();
                    for i in 0..5_000 {
                        tracer.updated_pto_count(Utc::now(), i);
                    }
                    black_box(tracer.export().unwrap())
                });
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_sent_packets, bench_queue_capacity);
criterion_main!(benches);
