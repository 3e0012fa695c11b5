/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use nanorand::Rng;
use zune_core::bit_depth::BitDepth;
use zune_core::colorspace::ColorSpace;
use zune_core::options::EncoderOptions;
use zune_qoif::QoifEncoder;

const WIDTH: usize = 1024;
const HEIGHT: usize = 768;

fn smooth_rgb() -> Vec<u8> {
    let mut pixels = vec![0_u8; WIDTH * HEIGHT * 3];

    for (i, px) in pixels.chunks_exact_mut(3).enumerate() {
        let (x, y) = (i % WIDTH, i / WIDTH);
        px.copy_from_slice(&[(x / 4) as u8, (y / 3) as u8, ((x + y) / 8) as u8]);
    }
    pixels
}

fn noisy_rgba() -> Vec<u8> {
    let mut pixels = vec![0_u8; WIDTH * HEIGHT * 4];
    nanorand::WyRand::new_seed(0x51_0f).fill(&mut pixels);
    pixels
}

fn encode_zune_qoif(pixels: &[u8], colorspace: ColorSpace, sink: &mut Vec<u8>) -> usize {
    sink.clear();
    let options = EncoderOptions::new(WIDTH, HEIGHT, colorspace, BitDepth::Eight);

    QoifEncoder::new(pixels, options).encode(sink).unwrap()
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("qoif: Simple encode");

    let smooth = smooth_rgb();
    let noisy = noisy_rgba();
    let mut sink = Vec::with_capacity(WIDTH * HEIGHT * 5);

    group.throughput(Throughput::Bytes(smooth.len() as u64));
    group.bench_function("zune-qoif smooth rgb", |b| {
        b.iter(|| black_box(encode_zune_qoif(&smooth, ColorSpace::RGB, &mut sink)))
    });

    group.throughput(Throughput::Bytes(noisy.len() as u64));
    group.bench_function("zune-qoif noisy rgba", |b| {
        b.iter(|| black_box(encode_zune_qoif(&noisy, ColorSpace::RGBA, &mut sink)))
    });
}

criterion_group!(name=benches;
      config={
      let c = Criterion::default();
        c.measurement_time(Duration::from_secs(20))
      };
    targets=bench_encode);

criterion_main!(benches);
