/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! The fixed 14 byte preamble of a qoif stream
use crate::constants::{QOIF_HEADER_SIZE, QOIF_MAGIC};
use crate::errors::QoifErrors;

/// Colorspace tag carried in the last header byte
///
/// The tag is metadata only, pixels are never converted
/// based on it.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
pub enum QoifColorspace {
    /// sRGB with sRGB alpha
    #[default]
    Srgb,
    /// sRGB color channels with linear alpha
    SrgbLinearAlpha,
    /// All channels linear
    Linear,
    /// A tag this crate has no name for
    Unknown(u8)
}

impl QoifColorspace {
    pub const fn from_u8(tag: u8) -> QoifColorspace {
        match tag {
            0x00 => QoifColorspace::Srgb,
            0x01 => QoifColorspace::SrgbLinearAlpha,
            0x0f => QoifColorspace::Linear,
            _ => QoifColorspace::Unknown(tag)
        }
    }

    pub const fn to_u8(self) -> u8 {
        match self {
            QoifColorspace::Srgb => 0x00,
            QoifColorspace::SrgbLinearAlpha => 0x01,
            QoifColorspace::Linear => 0x0f,
            QoifColorspace::Unknown(tag) => tag
        }
    }

    pub const fn is_known(self) -> bool {
        !matches!(self, QoifColorspace::Unknown(_))
    }
}

/// A decoded qoif header
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct QoifHeader {
    pub width:      u32,
    pub height:     u32,
    /// Channel count of the source image, either 3 or 4
    pub channels:   u8,
    pub colorspace: QoifColorspace
}

impl QoifHeader {
    /// Serialize this header, see [`encode_header`]
    pub fn to_bytes(&self) -> [u8; QOIF_HEADER_SIZE] {
        encode_header(self.width, self.height, self.channels, self.colorspace.to_u8())
    }
}

/// Write the header fields in stream order, integers big endian
///
/// No validation is done, a zero dimension or a bad channel
/// count is written as is.
pub fn encode_header(
    width: u32, height: u32, channels: u8, colorspace: u8
) -> [u8; QOIF_HEADER_SIZE] {
    let mut out = [0; QOIF_HEADER_SIZE];

    out[0..4].copy_from_slice(&QOIF_MAGIC);
    out[4..8].copy_from_slice(&width.to_be_bytes());
    out[8..12].copy_from_slice(&height.to_be_bytes());
    out[12] = channels;
    out[13] = colorspace;

    out
}

/// Parse and validate a header from the first 14 bytes of `bytes`
///
/// # Errors
/// - [`InsufficientData`](QoifErrors::InsufficientData): fewer than 14 bytes
/// - [`WrongMagicBytes`](QoifErrors::WrongMagicBytes): stream doesn't start with `qoif`
/// - [`ZeroDimensions`](QoifErrors::ZeroDimensions): width or height is zero
/// - [`UnknownChannels`](QoifErrors::UnknownChannels): channels not 3 or 4
///
/// Unknown colorspace tags are accepted here, whether they are
/// an error is left to the decoder options.
pub fn decode_header(bytes: &[u8]) -> Result<QoifHeader, QoifErrors> {
    let Some(header) = bytes.get(..QOIF_HEADER_SIZE) else {
        return Err(QoifErrors::InsufficientData(QOIF_HEADER_SIZE, bytes.len()));
    };

    if header[0..4] != QOIF_MAGIC {
        return Err(QoifErrors::WrongMagicBytes);
    }

    let width = u32::from_be_bytes([header[4], header[5], header[6], header[7]]);
    let height = u32::from_be_bytes([header[8], header[9], header[10], header[11]]);
    let channels = header[12];
    let colorspace = QoifColorspace::from_u8(header[13]);

    if width == 0 || height == 0 {
        return Err(QoifErrors::ZeroDimensions(width as usize, height as usize));
    }
    if !matches!(channels, 3 | 4) {
        return Err(QoifErrors::UnknownChannels(channels));
    }

    Ok(QoifHeader {
        width,
        height,
        channels,
        colorspace
    })
}
