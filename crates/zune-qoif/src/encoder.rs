/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use zune_core::bit_depth::BitDepth;
use zune_core::bytestream::{ZByteWriterTrait, ZWriter};
use zune_core::colorspace::ColorSpace;
use zune_core::log::trace;
use zune_core::options::EncoderOptions;

use crate::cache::{cache_position, ColorCache};
use crate::chunk::{Chunk, COLOR_FLAGS, MAX_CHUNK_SIZE};
use crate::constants::{QOIF_HEADER_SIZE, QOIF_PADDING, QOIF_RUN_16_MAX, QOIF_START_PIXEL};
use crate::header::{QoifColorspace, QoifHeader};
use crate::QoifEncodeErrors;

const SUPPORTED_COLORSPACES: [ColorSpace; 6] = [
    ColorSpace::RGB,
    ColorSpace::RGBA,
    ColorSpace::BGR,
    ColorSpace::BGRA,
    ColorSpace::Luma,
    ColorSpace::LumaA
];

/// Header metadata written by the encoder
///
/// None of these change how pixels are encoded.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct QoifOptions {
    /// Channel count for the header, `None` derives it from the input
    pub channels:   Option<u8>,
    pub colorspace: QoifColorspace
}

impl QoifOptions {
    pub const fn set_channels(mut self, channels: u8) -> Self {
        self.channels = Some(channels);
        self
    }
    pub const fn set_colorspace(mut self, colorspace: QoifColorspace) -> Self {
        self.colorspace = colorspace;
        self
    }
}

/// An image the encoder can pull RGBA pixels from one coordinate at a time
///
/// Pixels are requested in row-major order, `x` in `0..width`
/// and `y` in `0..height`.
pub trait PixelSource {
    /// Width and height of the image
    fn dimensions(&self) -> (usize, usize);
    /// The pixel at column `x`, row `y` as `[R, G, B, A]`
    fn pixel_at(&self, x: usize, y: usize) -> [u8; 4];
}

/// Cross pixel state of an encode pass
#[derive(Clone, Debug)]
pub(crate) struct EncoderState {
    pub cache: ColorCache,
    pub prev:  [u8; 4],
    pub run:   u16
}

impl EncoderState {
    pub const fn new() -> EncoderState {
        EncoderState {
            cache: ColorCache::new(),
            prev:  QOIF_START_PIXEL,
            run:   0
        }
    }

    /// Feed the next pixel, `emit` is called for every chunk this
    /// produces, after the chunk's pixel went into the cache
    ///
    /// Runs are held back until they end, hit the longest encodable
    /// length or `last` is set.
    pub fn push<F, E>(&mut self, px: [u8; 4], last: bool, mut emit: F) -> Result<(), E>
    where
        F: FnMut(&Chunk, &ColorCache) -> Result<(), E>
    {
        if px == self.prev {
            self.run += 1;

            if self.run == QOIF_RUN_16_MAX || last {
                self.flush_run(&mut emit)?;
            }
            return Ok(());
        }
        self.flush_run(&mut emit)?;

        let chunk = select_chunk(px, self.prev, &self.cache);

        self.cache.store(px);
        self.prev = px;

        emit(&chunk, &self.cache)
    }

    fn flush_run<F, E>(&mut self, emit: &mut F) -> Result<(), E>
    where
        F: FnMut(&Chunk, &ColorCache) -> Result<(), E>
    {
        if self.run > 0 {
            let chunk = Chunk::Run(self.run);
            self.run = 0;
            // the decoder stores the pixel a run chunk resolves to
            self.cache.store(self.prev);

            emit(&chunk, &self.cache)?;
        }
        Ok(())
    }
}

/// Cheapest chunk that reproduces `px` after `prev`
///
/// `px` must differ from `prev`, equal pixels are runs.
pub(crate) fn select_chunk(px: [u8; 4], prev: [u8; 4], cache: &ColorCache) -> Chunk {
    if cache.contains(px) {
        return Chunk::Index(cache_position(px) as u8);
    }
    let delta = |i: usize| i16::from(px[i]) - i16::from(prev[i]);

    let (dr, dg, db, da) = (delta(0), delta(1), delta(2), delta(3));

    let large = -16..=15;
    let medium = -8..=7;
    let small = -2..=1;

    if [dr, dg, db, da].iter().all(|d| large.contains(d)) {
        if da == 0 && small.contains(&dr) && small.contains(&dg) && small.contains(&db) {
            Chunk::Diff8 {
                dr: dr as i8,
                dg: dg as i8,
                db: db as i8
            }
        } else if da == 0 && medium.contains(&dg) && medium.contains(&db) {
            Chunk::Diff16 {
                dr: dr as i8,
                dg: dg as i8,
                db: db as i8
            }
        } else {
            Chunk::Diff24 {
                dr: dr as i8,
                dg: dg as i8,
                db: db as i8,
                da: da as i8
            }
        }
    } else {
        let mut flags = 0;
        let mut values = [0; 4];

        for i in 0..4 {
            if px[i] != prev[i] {
                flags |= COLOR_FLAGS[i];
                values[i] = px[i];
            }
        }
        Chunk::Color { flags, values }
    }
}

/// Draft Quite Ok Image Encoder
///
/// # Example
/// - Encode a 100 by 100 RGB image
///
/// ```
/// use zune_core::bit_depth::BitDepth;
/// use zune_core::colorspace::ColorSpace;
/// use zune_core::options::EncoderOptions;
/// use zune_qoif::QoifEncoder;
/// use zune_qoif::QoifEncodeErrors;
///
/// const W:usize=100;
/// const H:usize=100;
///
/// fn main()->Result<(), QoifEncodeErrors>{
///     let pixels = std::array::from_fn::<u8,{W * H * 3},_>(|i| (i%256) as u8);
///     let mut encoder = QoifEncoder::new(&pixels,EncoderOptions::new(W,H,ColorSpace::RGB,BitDepth::Eight));
///     let mut sink: Vec<u8> = vec![];
///     let size = encoder.encode(&mut sink)?;
///     assert_eq!(size, sink.len());
///     Ok(())
///}
/// ```
pub struct QoifEncoder<'a> {
    // raw pixels, in any of the supported colorspaces
    pixel_data:    &'a [u8],
    options:       EncoderOptions,
    qoif_options:  QoifOptions
}

impl<'a> QoifEncoder<'a> {
    /// Create a new encoder which will encode the pixels
    ///
    /// # Arguments
    /// - data: Pixel data, size must be equal to `width*height*colorspace channels`
    /// - options: Encoder details for data, this contains width, height and number of color components
    pub const fn new(data: &'a [u8], options: EncoderOptions) -> QoifEncoder<'a> {
        QoifEncoder {
            pixel_data: data,
            options,
            qoif_options: QoifOptions {
                channels:   None,
                colorspace: QoifColorspace::Srgb
            }
        }
    }

    /// Set the header channel count and colorspace tag
    pub fn set_options(&mut self, options: QoifOptions) {
        self.qoif_options = options;
    }

    /// Return the maximum size for which the encoder can safely
    /// encode the image without fearing for an out of space error
    pub fn max_size(&self) -> usize {
        max_encoded_size(self.options.width(), self.options.height())
    }

    /// Encode the pixels into `sink`
    ///
    /// # Returns
    /// - Ok(size): Actual bytes used for encoding
    /// - Err: The error encountered during encoding
    pub fn encode<T: ZByteWriterTrait>(&mut self, sink: T) -> Result<usize, QoifEncodeErrors> {
        let colorspace = self.options.colorspace();

        if self.options.depth() != BitDepth::Eight {
            return Err(QoifEncodeErrors::UnsupportedBitDepth(self.options.depth()));
        }
        let Some(expand) = pixel_expander(colorspace) else {
            return Err(QoifEncodeErrors::UnsupportedColorspace(
                colorspace,
                &SUPPORTED_COLORSPACES
            ));
        };
        let default_channels = if colorspace.has_alpha() { 4 } else { 3 };

        let header = make_header(
            self.options.width(),
            self.options.height(),
            self.qoif_options,
            default_channels
        )?;

        let components = colorspace.num_components();
        let expected_len = self
            .options
            .width()
            .saturating_mul(self.options.height())
            .saturating_mul(components);

        if self.pixel_data.len() != expected_len {
            return Err(QoifEncodeErrors::TooShortInput(
                expected_len,
                self.pixel_data.len()
            ));
        }

        let pixels = self.pixel_data.chunks_exact(components).map(expand);

        encode_stream(header, pixels, sink, self.max_size())
    }
}

/// Encode an image exposed through [`PixelSource`]
///
/// The header carries 4 channels unless `options` says otherwise.
///
/// # Returns
/// - Ok(size): Actual bytes used for encoding
/// - Err: The error encountered during encoding
pub fn encode_source<S, T>(
    source: &S, options: QoifOptions, sink: T
) -> Result<usize, QoifEncodeErrors>
where
    S: PixelSource + ?Sized,
    T: ZByteWriterTrait
{
    let (width, height) = source.dimensions();
    let header = make_header(width, height, options, 4)?;

    let pixels = (0..height).flat_map(|y| (0..width).map(move |x| source.pixel_at(x, y)));

    encode_stream(header, pixels, sink, max_encoded_size(width, height))
}

fn max_encoded_size(width: usize, height: usize) -> usize {
    width
        .saturating_mul(height)
        .saturating_mul(MAX_CHUNK_SIZE)
        .saturating_add(QOIF_HEADER_SIZE + QOIF_PADDING)
}

fn make_header(
    width: usize, height: usize, options: QoifOptions, default_channels: u8
) -> Result<QoifHeader, QoifEncodeErrors> {
    if width == 0 || height == 0 {
        return Err(QoifEncodeErrors::ZeroDimensions(width, height));
    }
    let Ok(width_u32) = u32::try_from(width) else {
        return Err(QoifEncodeErrors::TooLargeDimensions(width));
    };
    let Ok(height_u32) = u32::try_from(height) else {
        return Err(QoifEncodeErrors::TooLargeDimensions(height));
    };
    let channels = options.channels.unwrap_or(default_channels);

    if !matches!(channels, 3 | 4) {
        return Err(QoifEncodeErrors::InvalidChannels(channels));
    }

    Ok(QoifHeader {
        width: width_u32,
        height: height_u32,
        channels,
        colorspace: options.colorspace
    })
}

fn encode_stream<I, T>(
    header: QoifHeader, pixels: I, sink: T, size_hint: usize
) -> Result<usize, QoifEncodeErrors>
where
    I: Iterator<Item = [u8; 4]>,
    T: ZByteWriterTrait
{
    trace!(
        "Encoding {}x{} image, {} channels",
        header.width,
        header.height,
        header.channels
    );

    let mut stream = ZWriter::new(sink);

    stream.reserve(size_hint)?;
    stream.write_const_bytes(&header.to_bytes())?;

    let total = header.width as usize * header.height as usize;

    let mut state = EncoderState::new();
    let mut buf = [0_u8; MAX_CHUNK_SIZE];

    for (i, px) in pixels.enumerate() {
        state.push(px, i + 1 == total, |chunk, _| {
            let len = chunk.pack(&mut buf);
            stream.write_all(&buf[..len])
        })?;
    }
    // padding
    stream.write_const_bytes(&[0; QOIF_PADDING])?;

    let len = stream.bytes_written();

    trace!("Finished encoding image, {len} bytes");

    Ok(len)
}

type Expander = fn(&[u8]) -> [u8; 4];

/// Widening from an interleaved input pixel to RGBA
fn pixel_expander(colorspace: ColorSpace) -> Option<Expander> {
    let expand: Expander = match colorspace {
        ColorSpace::RGB => |p: &[u8]| [p[0], p[1], p[2], 255],
        ColorSpace::RGBA => |p: &[u8]| [p[0], p[1], p[2], p[3]],
        ColorSpace::BGR => |p: &[u8]| [p[2], p[1], p[0], 255],
        ColorSpace::BGRA => |p: &[u8]| [p[2], p[1], p[0], p[3]],
        ColorSpace::Luma => |p: &[u8]| [p[0], p[0], p[0], 255],
        ColorSpace::LumaA => |p: &[u8]| [p[0], p[0], p[0], p[1]],
        _ => return None
    };
    Some(expand)
}
