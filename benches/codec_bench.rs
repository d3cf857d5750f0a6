//! Benchmarks for the packet codec

use brain_config::protocol::{decode_frame, encode_packet, encode_packet_from, DEVICE_SENDER};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn codec_benchmarks(c: &mut Criterion) {
    let write_payload: [u8; 4] = [0xFF, 0x30, 0x55, 0x1E];
    c.bench_function("encode_write_request", |b| {
        b.iter(|| encode_packet(black_box(4), black_box(&write_payload)))
    });

    // Worst case for escaping: every byte reserved
    let reserved: Vec<u8> = [0xC3, 0x3C, 0x55].iter().copied().cycle().take(64).collect();
    let frame = encode_packet_from(DEVICE_SENDER, 1, &reserved);
    c.bench_function("decode_escaped_frame", |b| {
        b.iter(|| decode_frame(black_box(&frame), DEVICE_SENDER))
    });

    let firmware = encode_packet_from(DEVICE_SENDER, 1, b"BRAIN2 3.1.010");
    c.bench_function("decode_version_reply", |b| {
        b.iter(|| decode_frame(black_box(&firmware), DEVICE_SENDER))
    });
}

criterion_group!(benches, codec_benchmarks);
criterion_main!(benches);
