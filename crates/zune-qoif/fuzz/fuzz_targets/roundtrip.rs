/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    use zune_qoif::zune_core::bit_depth::BitDepth;
    use zune_qoif::zune_core::bytestream::ZCursor;
    use zune_qoif::zune_core::colorspace::ColorSpace;
    use zune_qoif::zune_core::options::EncoderOptions;

    if data.len() > 4 {
        // first byte picks the width, the rest are RGBA pixels
        let pixels = &data[1..];
        let count = pixels.len() / 4;
        let width = usize::from(data[0]).clamp(1, count);
        let height = count / width;
        let pixels = &pixels[..width * height * 4];

        let options = EncoderOptions::new(width, height, ColorSpace::RGBA, BitDepth::Eight);
        let mut encoded: Vec<u8> = vec![];
        zune_qoif::QoifEncoder::new(pixels, options)
            .encode(&mut encoded)
            .expect("Failed to encode valid pixels!");

        let decoded = zune_qoif::QoifDecoder::new(ZCursor::new(&encoded))
            .decode()
            .expect("Failed to decode an encoded image!");

        assert!(
            pixels == decoded,
            "The decoded pixels don't match the original pixels!"
        );
    }
});
