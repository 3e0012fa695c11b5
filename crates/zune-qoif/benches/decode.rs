/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use nanorand::Rng;
use zune_core::bit_depth::BitDepth;
use zune_core::bytestream::ZCursor;
use zune_core::colorspace::ColorSpace;
use zune_core::options::EncoderOptions;
use zune_qoif::{QoifDecoder, QoifEncoder};

const WIDTH: usize = 1024;
const HEIGHT: usize = 768;

/// A gradient with a noisy band and flat areas, exercises
/// every chunk kind
fn synthetic_rgba() -> Vec<u8> {
    let mut rand = nanorand::WyRand::new_seed(0x51_0f);
    let mut pixels = vec![0_u8; WIDTH * HEIGHT * 4];

    for (i, px) in pixels.chunks_exact_mut(4).enumerate() {
        let (x, y) = (i % WIDTH, i / WIDTH);

        if y < HEIGHT / 3 {
            px.copy_from_slice(&[(x / 4) as u8, (y / 2) as u8, 128, 255]);
        } else if y < 2 * HEIGHT / 3 {
            rand.fill(&mut *px);
        } else {
            px.copy_from_slice(&[30, 60, 90, if x < WIDTH / 2 { 255 } else { 128 }]);
        }
    }
    pixels
}

fn encode(pixels: &[u8]) -> Vec<u8> {
    let options = EncoderOptions::new(WIDTH, HEIGHT, ColorSpace::RGBA, BitDepth::Eight);
    let mut stream: Vec<u8> = vec![];

    QoifEncoder::new(pixels, options)
        .encode(&mut stream)
        .unwrap();
    stream
}

fn decode_zune_qoif(data: &[u8]) -> Vec<u8> {
    QoifDecoder::new(ZCursor::new(data)).decode().unwrap()
}

fn bench_decode(c: &mut Criterion) {
    let data = encode(&synthetic_rgba());
    let mut group = c.benchmark_group("qoif: Simple decode");

    group.throughput(Throughput::Bytes(data.len() as u64));

    group.bench_function("zune-qoif", |b| {
        b.iter(|| black_box(decode_zune_qoif(data.as_slice())))
    });
}

criterion_group!(name=benches;
      config={
      let c = Criterion::default();
        c.measurement_time(Duration::from_secs(20))
      };
    targets=bench_decode);

criterion_main!(benches);
