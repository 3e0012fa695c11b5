/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

// 00xxxxxx
pub const QOIF_INDEX: u8 = 0x00;
// 010xxxxx
pub const QOIF_RUN_8: u8 = 0x40;
// 011xxxxx
pub const QOIF_RUN_16: u8 = 0x60;
// 10xxxxxx
pub const QOIF_DIFF_8: u8 = 0x80;
// 110xxxxx
pub const QOIF_DIFF_16: u8 = 0xc0;
// 1110xxxx
pub const QOIF_DIFF_24: u8 = 0xe0;
// 1111xxxx
pub const QOIF_COLOR: u8 = 0xf0;

pub const QOIF_MASK_2: u8 = 0xc0; // (11)000000
pub const QOIF_MASK_3: u8 = 0xe0; // (111)00000
pub const QOIF_MASK_4: u8 = 0xf0; // (1111)0000

pub const QOIF_MAGIC: [u8; 4] = *b"qoif";
pub const QOIF_HEADER_SIZE: usize = 14;
pub const QOIF_PADDING: usize = 4;

/// Longest run a short run chunk can carry
pub const QOIF_RUN_8_MAX: u16 = 32;
/// Longest run a long run chunk can carry, 13 bits plus the bias of 33
pub const QOIF_RUN_16_MAX: u16 = 0x1fff + 33;

pub const QOIF_CACHE_SIZE: usize = 64;

/// Previous pixel both sides start from
pub const QOIF_START_PIXEL: [u8; 4] = [0, 0, 0, 255];
