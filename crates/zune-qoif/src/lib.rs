/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! Decoding and encoding the draft Quite Ok Image format (`qoif`)
//!
//! This is the experimental revision of QOI. Both revisions start
//! with the `qoif` magic but the chunk layout differs, streams from
//! libraries implementing the final format will not decode here. The
//! draft has
//! - Two run chunks, up to 32 and up to 8224 pixels
//! - Three delta chunks of one, two and three bytes, the largest one covering alpha
//! - A color chunk carrying only the channels that changed
//! - A four byte zero trailer
//!
//! # Features
//! - Decoding and encoding
//! - `no_std`
//! - Fuzz tested
//!
//! ## `no_std`
//! You can use `no_std` with alloc feature to compile for `no_std` endpoints
//!
//! ## `log`
//! Enabled by default, header fields and recoverable stream
//! problems are reported through the `log` crate facade
//!
//! # Example
//! - Round trip a small image
//!
//! ```
//! use zune_core::bit_depth::BitDepth;
//! use zune_core::bytestream::ZCursor;
//! use zune_core::colorspace::ColorSpace;
//! use zune_core::options::EncoderOptions;
//! use zune_qoif::{QoifDecoder, QoifEncoder};
//!
//! let pixels = [10, 20, 30, 255, 10, 20, 30, 255, 11, 20, 30, 255, 0, 0, 0, 0];
//! let options = EncoderOptions::new(2, 2, ColorSpace::RGBA, BitDepth::Eight);
//!
//! let mut stream: Vec<u8> = vec![];
//! QoifEncoder::new(&pixels, options).encode(&mut stream).unwrap();
//!
//! let mut decoder = QoifDecoder::new(ZCursor::new(&stream));
//! assert_eq!(decoder.decode().unwrap(), pixels);
//! assert_eq!(decoder.dimensions(), Some((2, 2)));
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![macro_use]
extern crate alloc;
extern crate core;

pub use decoder::QoifDecoder;
pub use encoder::{encode_source, PixelSource, QoifEncoder, QoifOptions};
pub use errors::*;
pub use header::{decode_header, encode_header, QoifColorspace, QoifHeader};
pub use zune_core;

mod cache;
mod chunk;
mod constants;
mod decoder;
mod encoder;
mod errors;
mod header;
