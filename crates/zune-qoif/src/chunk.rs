/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! The units a qoif stream is made of
//!
//! Each chunk starts with a tag byte whose high bits select the
//! chunk kind, the remaining bits and up to four following bytes
//! carry the payload.
#![allow(clippy::identity_op)]

use crate::cache::ColorCache;
use crate::constants::{
    QOIF_COLOR, QOIF_DIFF_16, QOIF_DIFF_24, QOIF_DIFF_8, QOIF_INDEX, QOIF_MASK_2, QOIF_MASK_3,
    QOIF_MASK_4, QOIF_RUN_16, QOIF_RUN_8, QOIF_RUN_8_MAX
};

/// Longest chunk, a color tag followed by four channels
pub(crate) const MAX_CHUNK_SIZE: usize = 5;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum Chunk {
    /// Pixel is in the color cache at this slot
    Index(u8),
    /// The previous pixel repeated this many times, 1..=8224
    Run(u16),
    /// R,G,B deltas in -2..=1, alpha unchanged
    Diff8 { dr: i8, dg: i8, db: i8 },
    /// R delta in -16..=15, G,B deltas in -8..=7, alpha unchanged
    Diff16 { dr: i8, dg: i8, db: i8 },
    /// All deltas in -16..=15
    Diff24 { dr: i8, dg: i8, db: i8, da: i8 },
    /// Channels whose flag bit (R=8,G=4,B=2,A=1) is set take their
    /// value from `values`, the rest are kept
    Color { flags: u8, values: [u8; 4] }
}

/// Flag bit of each channel in a color chunk, in stream order
pub(crate) const COLOR_FLAGS: [u8; 4] = [8, 4, 2, 1];

impl Chunk {
    /// Pack this chunk into `out`, returning how many bytes were used
    pub fn pack(&self, out: &mut [u8; MAX_CHUNK_SIZE]) -> usize {
        match *self {
            Chunk::Index(pos) => {
                out[0] = QOIF_INDEX | (pos & 0x3f);
                1
            }
            Chunk::Run(length) => {
                if length <= QOIF_RUN_8_MAX {
                    out[0] = QOIF_RUN_8 | (length - 1) as u8;
                    1
                } else {
                    let stored = length - (QOIF_RUN_8_MAX + 1);
                    out[0] = QOIF_RUN_16 | (stored >> 8) as u8;
                    out[1] = (stored & 0xff) as u8;
                    2
                }
            }
            Chunk::Diff8 { dr, dg, db } => {
                let r = bias(dr, 2);
                let g = bias(dg, 2);
                let b = bias(db, 2);

                out[0] = QOIF_DIFF_8 | (r << 4) | (g << 2) | b;
                1
            }
            Chunk::Diff16 { dr, dg, db } => {
                out[0] = QOIF_DIFF_16 | bias(dr, 16);
                out[1] = (bias(dg, 8) << 4) | bias(db, 8);
                2
            }
            Chunk::Diff24 { dr, dg, db, da } => {
                // 1110rrrr|rgggggbb|bbbaaaaa
                let r = bias(dr, 16);
                let g = bias(dg, 16);
                let b = bias(db, 16);
                let a = bias(da, 16);

                out[0] = QOIF_DIFF_24 | (r >> 1);
                out[1] = (r << 7) | (g << 2) | (b >> 3);
                out[2] = (b << 5) | a;
                3
            }
            Chunk::Color { flags, values } => {
                out[0] = QOIF_COLOR | (flags & 0x0f);
                let mut len = 1;

                for (value, flag) in values.iter().zip(COLOR_FLAGS) {
                    if flags & flag != 0 {
                        out[len] = *value;
                        len += 1;
                    }
                }
                len
            }
        }
    }

    /// Parse a chunk from its tag byte, pulling payload bytes from `next`
    ///
    /// Every byte value is a valid tag so this only fails when `next` does.
    pub fn unpack<F, E>(tag: u8, mut next: F) -> Result<Chunk, E>
    where
        F: FnMut() -> Result<u8, E>
    {
        let chunk = if tag & QOIF_MASK_2 == QOIF_INDEX {
            Chunk::Index(tag & 0x3f)
        } else if tag & QOIF_MASK_3 == QOIF_RUN_8 {
            Chunk::Run(u16::from(tag & 0x1f) + 1)
        } else if tag & QOIF_MASK_3 == QOIF_RUN_16 {
            let b2 = next()?;
            let stored = (u16::from(tag & 0x1f) << 8) | u16::from(b2);

            Chunk::Run(stored + QOIF_RUN_8_MAX + 1)
        } else if tag & QOIF_MASK_2 == QOIF_DIFF_8 {
            Chunk::Diff8 {
                dr: unbias((tag >> 4) & 0x03, 2),
                dg: unbias((tag >> 2) & 0x03, 2),
                db: unbias((tag >> 0) & 0x03, 2)
            }
        } else if tag & QOIF_MASK_3 == QOIF_DIFF_16 {
            let b2 = next()?;

            Chunk::Diff16 {
                dr: unbias(tag & 0x1f, 16),
                dg: unbias(b2 >> 4, 8),
                db: unbias(b2 & 0x0f, 8)
            }
        } else if tag & QOIF_MASK_4 == QOIF_DIFF_24 {
            let b2 = next()?;
            let b3 = next()?;

            Chunk::Diff24 {
                dr: unbias(((tag & 0x0f) << 1) | (b2 >> 7), 16),
                dg: unbias((b2 >> 2) & 0x1f, 16),
                db: unbias(((b2 & 0x03) << 3) | (b3 >> 5), 16),
                da: unbias(b3 & 0x1f, 16)
            }
        } else {
            let flags = tag & 0x0f;
            let mut values = [0; 4];

            for (value, flag) in values.iter_mut().zip(COLOR_FLAGS) {
                if flags & flag != 0 {
                    *value = next()?;
                }
            }
            Chunk::Color { flags, values }
        };
        Ok(chunk)
    }

    /// Pixel this chunk stands for given the previous pixel and cache
    ///
    /// Channel arithmetic wraps, a delta taking a channel below 0
    /// or above 255 comes around the other side.
    pub fn resolve(&self, prev: [u8; 4], cache: &ColorCache) -> [u8; 4] {
        match *self {
            Chunk::Index(pos) => cache.lookup(usize::from(pos)),
            Chunk::Run(_) => prev,
            Chunk::Diff8 { dr, dg, db } | Chunk::Diff16 { dr, dg, db } => [
                prev[0].wrapping_add_signed(dr),
                prev[1].wrapping_add_signed(dg),
                prev[2].wrapping_add_signed(db),
                prev[3]
            ],
            Chunk::Diff24 { dr, dg, db, da } => [
                prev[0].wrapping_add_signed(dr),
                prev[1].wrapping_add_signed(dg),
                prev[2].wrapping_add_signed(db),
                prev[3].wrapping_add_signed(da)
            ],
            Chunk::Color { flags, values } => {
                let mut px = prev;

                for ((channel, value), flag) in px.iter_mut().zip(values).zip(COLOR_FLAGS) {
                    if flags & flag != 0 {
                        *channel = value;
                    }
                }
                px
            }
        }
    }
}

#[inline(always)]
fn bias(delta: i8, offset: i8) -> u8 {
    (delta + offset) as u8
}

#[inline(always)]
fn unbias(stored: u8, offset: i8) -> i8 {
    stored as i8 - offset
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::QOIF_RUN_16_MAX;

    fn packed(chunk: Chunk) -> Vec<u8> {
        let mut out = [0; MAX_CHUNK_SIZE];
        let len = chunk.pack(&mut out);
        out[..len].to_vec()
    }

    fn unpacked(bytes: &[u8]) -> Chunk {
        let mut rest = bytes[1..].iter().copied();
        let chunk = Chunk::unpack(bytes[0], || rest.next().ok_or(())).unwrap();
        assert!(rest.next().is_none(), "chunk left payload bytes unread");
        chunk
    }

    #[test]
    fn short_run_stores_length_minus_one() {
        assert_eq!(packed(Chunk::Run(1)), [0x40]);
        assert_eq!(packed(Chunk::Run(32)), [0x5f]);
        assert_eq!(unpacked(&[0x40]), Chunk::Run(1));
        assert_eq!(unpacked(&[0x5f]), Chunk::Run(32));
    }

    #[test]
    fn long_run_stores_length_minus_33() {
        assert_eq!(packed(Chunk::Run(33)), [0x60, 0x00]);
        assert_eq!(packed(Chunk::Run(33 + 0x123)), [0x61, 0x23]);
        assert_eq!(packed(Chunk::Run(QOIF_RUN_16_MAX)), [0x7f, 0xff]);
        assert_eq!(unpacked(&[0x7f, 0xff]), Chunk::Run(QOIF_RUN_16_MAX));
        assert_eq!(unpacked(&[0x61, 0x23]), Chunk::Run(33 + 0x123));
    }

    #[test]
    fn small_diff_layout() {
        // r+1, g-2, b+0 -> 10 11 00 10
        let chunk = Chunk::Diff8 { dr: 1, dg: -2, db: 0 };
        assert_eq!(packed(chunk), [0b1011_0010]);
        assert_eq!(unpacked(&[0b1011_0010]), chunk);
    }

    #[test]
    fn medium_diff_layout() {
        let chunk = Chunk::Diff16 { dr: -16, dg: 7, db: -8 };
        assert_eq!(packed(chunk), [0xc0, 0xf0]);
        assert_eq!(unpacked(&[0xc0, 0xf0]), chunk);
    }

    #[test]
    fn large_diff_layout() {
        // biased r=31,g=0,b=31,a=0 -> 1110 1111|1 00000 11|111 00000
        let chunk = Chunk::Diff24 { dr: 15, dg: -16, db: 15, da: -16 };
        assert_eq!(packed(chunk), [0xef, 0x83, 0xe0]);
        assert_eq!(unpacked(&[0xef, 0x83, 0xe0]), chunk);

        let chunk = Chunk::Diff24 { dr: -3, dg: 4, db: -5, da: 6 };
        assert_eq!(unpacked(&packed(chunk)), chunk);
    }

    #[test]
    fn color_writes_flagged_channels_in_order() {
        let chunk = Chunk::Color {
            flags:  0b1010,
            values: [200, 0, 100, 0]
        };
        assert_eq!(packed(chunk), [0xfa, 200, 100]);
        assert_eq!(unpacked(&[0xfa, 200, 100]), chunk);

        let all = Chunk::Color {
            flags:  0x0f,
            values: [1, 2, 3, 4]
        };
        assert_eq!(packed(all), [0xff, 1, 2, 3, 4]);
    }

    #[test]
    fn every_tag_byte_parses() {
        for tag in 0..=255_u8 {
            let mut zeros = core::iter::repeat(0_u8);
            assert!(Chunk::unpack(tag, || zeros.next().ok_or(())).is_ok());
        }
    }

    #[test]
    fn missing_payload_propagates_error() {
        let result = Chunk::unpack(QOIF_DIFF_24, || Err::<u8, &str>("eof"));
        assert_eq!(result, Err("eof"));
    }

    #[test]
    fn deltas_wrap_around() {
        let cache = ColorCache::new();

        let up = Chunk::Diff8 { dr: 1, dg: 1, db: 1 };
        assert_eq!(up.resolve([255, 255, 255, 7], &cache), [0, 0, 0, 7]);

        let down = Chunk::Diff24 { dr: -16, dg: 0, db: 0, da: -1 };
        assert_eq!(down.resolve([3, 9, 9, 0], &cache), [243, 9, 9, 255]);
    }

    #[test]
    fn color_keeps_unflagged_channels() {
        let cache = ColorCache::new();
        let chunk = Chunk::Color {
            flags:  0b0001,
            values: [0, 0, 0, 9]
        };
        assert_eq!(chunk.resolve([1, 2, 3, 4], &cache), [1, 2, 3, 9]);
    }
}
