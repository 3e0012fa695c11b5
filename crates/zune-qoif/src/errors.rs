/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Errors possible during decoding and encoding.
use core::fmt::{Debug, Display, Formatter};

use zune_core::bit_depth::BitDepth;
use zune_core::bytestream::ZByteIoError;
use zune_core::colorspace::ColorSpace;

/// Broad classes every codec error falls into
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum QoifErrorKind {
    /// Malformed header or invalid encoding parameters
    Format,
    /// The stream ended before the image and its trailer were complete
    TruncatedStream,
    /// The underlying reader or writer failed
    Io,
    /// The encoder was handed pixels it cannot interpret
    UnsupportedPixel
}

/// Possible Errors that may occur during decoding
#[non_exhaustive]
pub enum QoifErrors {
    /// The image does not start with the magic bytes `qoif`
    ///
    /// Indicates that image is not a qoif file
    WrongMagicBytes,
    /// The input doesn't have enough bytes to hold a header
    ///
    /// # Arguments
    /// - 1st argument is the number of bytes we expected
    /// - 2nd argument is number of bytes actually present
    InsufficientData(usize, usize),
    /// The stream ended inside the header
    ///
    /// The argument is the number of header bytes present
    TruncatedHeader(usize),
    /// The header stores a zero width or height
    ZeroDimensions(usize, usize),
    /// The header contains an invalid channel number
    ///
    /// The only supported types are `3` and `4`
    UnknownChannels(u8),
    /// The header contains an unknown colorspace tag
    ///
    /// Only reported when strict mode is enabled
    UnknownColorspace(u8),
    /// Dimensions exceed the configured limits
    ///
    /// # Arguments
    /// - which dimension
    /// - the limit
    /// - the value found
    TooLargeDimensions(&'static str, usize, usize),
    /// The stream ended while pixels were still expected
    ///
    /// The argument is the number of pixels not yet decoded
    TruncatedStream(usize),
    /// The image was complete but the trailer was cut short
    ///
    /// The argument is the number of trailer bytes present.
    /// Only reported when strict mode is enabled
    MissingTrailer(usize),
    /// The trailer is not four zero bytes
    ///
    /// Only reported when strict mode is enabled
    InvalidTrailer([u8; 4]),
    /// A run continues past the last pixel of the image
    ///
    /// Only reported when strict mode is enabled
    RunOverflow(usize),
    /// A width by height RGBA raster does not fit in memory
    ///
    /// # Arguments
    /// - width
    /// - height
    TooLargeBuffer(usize, usize),
    /// Too small output size
    ///
    /// # Arguments
    /// - expected size
    /// - found size
    TooSmallOutput(usize, usize),
    /// The underlying reader failed for a reason other than
    /// running out of input
    IoErrors(ZByteIoError)
}

impl QoifErrors {
    /// Return the class this error belongs to
    pub const fn kind(&self) -> QoifErrorKind {
        match self {
            QoifErrors::TruncatedHeader(_)
            | QoifErrors::TruncatedStream(_)
            | QoifErrors::MissingTrailer(_) => {
                QoifErrorKind::TruncatedStream
            }
            QoifErrors::IoErrors(_) => QoifErrorKind::Io,
            _ => QoifErrorKind::Format
        }
    }
}

impl Debug for QoifErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            QoifErrors::WrongMagicBytes => {
                writeln!(f, "Wrong magic bytes, expected `qoif` as image start")
            }
            QoifErrors::InsufficientData(expected, found) => {
                writeln!(
                    f,
                    "Insufficient data required {expected} but remaining stream has {found}"
                )
            }
            QoifErrors::TruncatedHeader(found) => {
                writeln!(f, "Stream ended early, found {found} of 14 header bytes")
            }
            QoifErrors::ZeroDimensions(width, height) => {
                writeln!(
                    f,
                    "Invalid image dimensions {width}x{height}, width and height must be non-zero"
                )
            }
            QoifErrors::UnknownChannels(channel) => {
                writeln!(
                    f,
                    "Unknown channel number {channel}, expected either 3 or 4"
                )
            }
            QoifErrors::UnknownColorspace(colorspace) => {
                writeln!(
                    f,
                    "Unknown colorspace tag {colorspace}, expected one of 0, 1 or 15"
                )
            }
            QoifErrors::TooLargeDimensions(dimension, expected, found) => {
                writeln!(
                    f,
                    "Too large dimensions for {dimension}, {found} exceeds {expected}"
                )
            }
            QoifErrors::TruncatedStream(pixels_left) => {
                writeln!(
                    f,
                    "Stream ended early, {pixels_left} pixels were not decoded"
                )
            }
            QoifErrors::MissingTrailer(found) => {
                writeln!(f, "Stream ended early, found {found} of 4 trailer bytes")
            }
            QoifErrors::InvalidTrailer(bytes) => {
                writeln!(f, "Last bytes {bytes:?} do not match the qoif trailer")
            }
            QoifErrors::RunOverflow(extra) => {
                writeln!(f, "Run exceeds image bounds by {extra} pixels")
            }
            QoifErrors::TooLargeBuffer(width, height) => {
                writeln!(
                    f,
                    "Image of {width}x{height} pixels is too large to fit in memory"
                )
            }
            QoifErrors::TooSmallOutput(expected, found) => {
                writeln!(
                    f,
                    "Too small output size, expected {expected}, but found {found}"
                )
            }
            QoifErrors::IoErrors(value) => {
                writeln!(f, "I/O error {:?}", value)
            }
        }
    }
}

impl From<ZByteIoError> for QoifErrors {
    fn from(value: ZByteIoError) -> Self {
        QoifErrors::IoErrors(value)
    }
}

/// Errors encountered during encoding
#[non_exhaustive]
pub enum QoifEncodeErrors {
    /// Unsupported colorspace
    ///
    /// The first argument is the colorspace encountered
    /// The second argument is list of supported colorspaces
    UnsupportedColorspace(ColorSpace, &'static [ColorSpace]),
    /// Only 8 bit images can be encoded
    UnsupportedBitDepth(BitDepth),
    /// Width or height is zero, such images cannot be represented
    ZeroDimensions(usize, usize),
    /// Too large dimensions
    /// The dimensions cannot be correctly encoded to a width
    TooLargeDimensions(usize),
    /// The channel count requested for the header is not 3 or 4
    InvalidChannels(u8),
    /// The pixel buffer size is not same as expected buffer size
    ///
    /// # Arguments
    /// - expected size
    /// - found size
    TooShortInput(usize, usize),
    /// The sink failed or ran out of space
    IoError(ZByteIoError)
}

impl QoifEncodeErrors {
    /// Return the class this error belongs to
    pub const fn kind(&self) -> QoifErrorKind {
        match self {
            QoifEncodeErrors::UnsupportedColorspace(..)
            | QoifEncodeErrors::UnsupportedBitDepth(_) => QoifErrorKind::UnsupportedPixel,
            QoifEncodeErrors::IoError(_) => QoifErrorKind::Io,
            _ => QoifErrorKind::Format
        }
    }
}

impl Debug for QoifEncodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            QoifEncodeErrors::UnsupportedColorspace(found, supported) => {
                writeln!(f, "Cannot encode image with colorspace {found:?} into qoif, supported ones are {supported:?}")
            }
            QoifEncodeErrors::UnsupportedBitDepth(depth) => {
                writeln!(
                    f,
                    "Unsupported bit depth {depth:?}, only 8 bit images can be encoded"
                )
            }
            QoifEncodeErrors::ZeroDimensions(width, height) => {
                writeln!(
                    f,
                    "Cannot encode image with dimensions {width}x{height}, width and height must be non-zero"
                )
            }
            QoifEncodeErrors::TooLargeDimensions(found) => {
                writeln!(
                    f,
                    "Too large image dimensions {found}, qoif can only encode images less than {}",
                    u32::MAX
                )
            }
            QoifEncodeErrors::InvalidChannels(channels) => {
                writeln!(
                    f,
                    "Invalid header channel count {channels}, expected either 3 or 4"
                )
            }
            QoifEncodeErrors::TooShortInput(expected, found) => {
                writeln!(
                    f,
                    "Pixel buffer length mismatch, expected {expected:?}, found {found:?}"
                )
            }
            QoifEncodeErrors::IoError(v) => {
                writeln!(f, "I/O error {:?}", v)
            }
        }
    }
}

impl Display for QoifEncodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "{:?}", self)
    }
}
impl Display for QoifErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "{:?}", self)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for QoifEncodeErrors {}

#[cfg(feature = "std")]
impl std::error::Error for QoifErrors {}

impl From<ZByteIoError> for QoifEncodeErrors {
    fn from(value: ZByteIoError) -> Self {
        Self::IoError(value)
    }
}
