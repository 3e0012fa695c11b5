/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    use zune_qoif::zune_core::bytestream::ZCursor;
    use zune_qoif::zune_core::options::DecoderOptions;

    // keep allocations bounded, headers can claim 4 billion pixels
    let options = DecoderOptions::default()
        .set_max_width(1 << 12)
        .set_max_height(1 << 12);

    let mut decoder = zune_qoif::QoifDecoder::new_with_options(ZCursor::new(data), options);
    let _ = decoder.decode();
});
