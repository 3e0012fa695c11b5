/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use alloc::vec;
use alloc::vec::Vec;

use zune_core::bit_depth::BitDepth;
use zune_core::bytestream::{ZByteIoError, ZByteReaderTrait, ZReader};
use zune_core::colorspace::ColorSpace;
use zune_core::log::{trace, warn};
use zune_core::options::DecoderOptions;

use crate::cache::ColorCache;
use crate::chunk::Chunk;
use crate::constants::{QOIF_HEADER_SIZE, QOIF_PADDING, QOIF_START_PIXEL};
use crate::errors::QoifErrors;
use crate::header::{decode_header, QoifColorspace, QoifHeader};

/// Cross pixel state of a decode pass
#[derive(Clone, Debug)]
pub(crate) struct DecoderState {
    pub cache: ColorCache,
    pub px:    [u8; 4],
    /// Repetitions of `px` still owed by the last run chunk
    pub run:   usize
}

impl DecoderState {
    pub const fn new() -> DecoderState {
        DecoderState {
            cache: ColorCache::new(),
            px:    QOIF_START_PIXEL,
            run:   0
        }
    }

    /// Resolve `chunk` into the next pixel and remember it
    pub fn apply(&mut self, chunk: &Chunk) -> [u8; 4] {
        self.px = chunk.resolve(self.px, &self.cache);

        if let Chunk::Run(length) = chunk {
            self.run = usize::from(*length) - 1;
        }
        self.cache.store(self.px);

        self.px
    }
}

/// A qoif decoder
///
/// The decoder is initialized by calling `new`
/// and either of [`decode_headers`] to decode headers
/// or [`decode`] to return uncompressed pixels
///
/// Decoded pixels are always RGBA, 4 bytes per pixel regardless
/// of the channel count stored in the header.
///
/// [`decode_headers`]:QoifDecoder::decode_headers
/// [`decode`]:QoifDecoder::decode
pub struct QoifDecoder<T>
where
    T: ZByteReaderTrait
{
    header:  Option<QoifHeader>,
    stream:  ZReader<T>,
    options: DecoderOptions
}

impl<T> QoifDecoder<T>
where
    T: ZByteReaderTrait
{
    /// Create a new decoder with the default options
    ///
    /// # Arguments
    /// - `data`: The compressed qoif data
    ///
    /// # Example
    ///
    /// ```no_run
    /// use zune_core::bytestream::ZCursor;
    /// let mut decoder = zune_qoif::QoifDecoder::new(ZCursor::new(b""));
    /// // additional code
    /// ```
    pub fn new(data: T) -> QoifDecoder<T> {
        QoifDecoder::new_with_options(data, DecoderOptions::default())
    }
    /// Create a new decoder that obeys specified restrictions
    ///
    /// E.g can be used to set width and height limits to prevent OOM attacks
    ///
    /// # Example
    /// ```
    /// use zune_core::bytestream::ZCursor;
    /// use zune_core::options::DecoderOptions;
    /// use zune_qoif::QoifDecoder;
    /// // only decode images less than 10 in both width and height
    ///
    /// let options = DecoderOptions::default().set_max_width(10).set_max_height(10);
    ///
    /// let mut decoder = QoifDecoder::new_with_options(ZCursor::new(b""), options);
    /// ```
    pub fn new_with_options(data: T, options: DecoderOptions) -> QoifDecoder<T> {
        QoifDecoder {
            header: None,
            stream: ZReader::new(data),
            options
        }
    }

    /// Decode the header storing needed information into
    /// the decoder instance
    ///
    /// Calling this again after a successful call does nothing.
    pub fn decode_headers(&mut self) -> Result<(), QoifErrors> {
        self.read_header().map(|_| ())
    }

    fn read_header(&mut self) -> Result<QoifHeader, QoifErrors> {
        if let Some(header) = self.header {
            return Ok(header);
        }
        let mut bytes = [0_u8; QOIF_HEADER_SIZE];

        for (found, byte) in bytes.iter_mut().enumerate() {
            *byte = match self.stream.read_u8_err() {
                Ok(value) => value,
                Err(err) => {
                    return Err(match self.classify(err) {
                        ReadFailure::EndOfStream => QoifErrors::TruncatedHeader(found),
                        ReadFailure::Io(err) => QoifErrors::IoErrors(err)
                    });
                }
            };
        }
        let header = decode_header(&bytes)?;

        let width = header.width as usize;
        let height = header.height as usize;

        if width > self.options.max_width() {
            return Err(QoifErrors::TooLargeDimensions(
                "width",
                self.options.max_width(),
                width
            ));
        }
        if height > self.options.max_height() {
            return Err(QoifErrors::TooLargeDimensions(
                "height",
                self.options.max_height(),
                height
            ));
        }
        if let QoifColorspace::Unknown(tag) = header.colorspace {
            if self.options.strict_mode() {
                return Err(QoifErrors::UnknownColorspace(tag));
            }
            warn!("Unknown colorspace tag {tag}, expected 0, 1 or 15");
        }

        trace!("Image width: {:?}", header.width);
        trace!("Image height: {:?}", header.height);
        trace!("Image channels: {:?}", header.channels);
        trace!("Image colorspace: {:?}", header.colorspace);

        self.header = Some(header);

        Ok(header)
    }

    /// Return the number of bytes required to hold a decoded image frame
    ///
    /// # Returns
    ///  - `Some(usize)`: Minimum size for a buffer needed to decode the image
    ///  - `None`: Indicates the headers were not decoded, or the size
    ///     does not fit a usize
    pub fn output_buffer_size(&self) -> Option<usize> {
        let header = self.header?;

        raster_size(header.width, header.height)
    }

    /// Decode the image, returning the RGBA pixels or
    /// the error encountered during decoding
    ///
    /// Nothing is allocated until the header has been validated.
    pub fn decode(&mut self) -> Result<Vec<u8>, QoifErrors> {
        let header = self.read_header()?;

        let size = output_size(&header)?;
        let mut output = vec![0; size];

        self.decode_into(&mut output)?;

        Ok(output)
    }

    /// Decode a compressed image and store the RGBA pixels
    /// into the output buffer
    ///
    /// Returns an error if the buffer cannot hold the image, bytes past
    /// [`output_buffer_size`](Self::output_buffer_size) are left untouched
    pub fn decode_into(&mut self, pixels: &mut [u8]) -> Result<(), QoifErrors> {
        let header = self.read_header()?;

        let size = output_size(&header)?;

        if pixels.len() < size {
            return Err(QoifErrors::TooSmallOutput(size, pixels.len()));
        }
        let pixels = &mut pixels[..size];
        let total = size / 4;

        let mut state = DecoderState::new();

        for (i, pix_chunk) in pixels.chunks_exact_mut(4).enumerate() {
            if state.run > 0 {
                state.run -= 1;
            } else {
                let chunk = self.read_chunk(total - i)?;
                state.apply(&chunk);
            }
            pix_chunk.copy_from_slice(&state.px);
        }

        if state.run > 0 {
            if self.options.strict_mode() {
                return Err(QoifErrors::RunOverflow(state.run));
            }
            warn!("Run exceeds image bounds by {} pixels", state.run);
        }
        self.read_trailer()?;

        trace!("Finished decoding image");

        Ok(())
    }

    fn read_chunk(&mut self, pixels_left: usize) -> Result<Chunk, QoifErrors> {
        let tag = self.next_byte(pixels_left)?;

        Chunk::unpack(tag, || self.next_byte(pixels_left))
    }

    fn next_byte(&mut self, pixels_left: usize) -> Result<u8, QoifErrors> {
        match self.stream.read_u8_err() {
            Ok(byte) => Ok(byte),
            Err(err) => Err(match self.classify(err) {
                ReadFailure::EndOfStream => QoifErrors::TruncatedStream(pixels_left),
                ReadFailure::Io(err) => QoifErrors::IoErrors(err)
            })
        }
    }

    fn read_trailer(&mut self) -> Result<(), QoifErrors> {
        let mut trailer = [0_u8; QOIF_PADDING];

        for (found, byte) in trailer.iter_mut().enumerate() {
            *byte = match self.stream.read_u8_err() {
                Ok(value) => value,
                Err(err) => {
                    return match self.classify(err) {
                        // the raster is complete, ending here is fine
                        ReadFailure::EndOfStream if !self.options.strict_mode() => {
                            warn!("Stream ended after {found} of {QOIF_PADDING} trailer bytes");
                            Ok(())
                        }
                        ReadFailure::EndOfStream => Err(QoifErrors::MissingTrailer(found)),
                        ReadFailure::Io(err) => Err(QoifErrors::IoErrors(err))
                    };
                }
            };
        }
        if trailer != [0; QOIF_PADDING] {
            if self.options.strict_mode() {
                return Err(QoifErrors::InvalidTrailer(trailer));
            }
            warn!("Last bytes {trailer:?} do not match the qoif trailer");
        }
        Ok(())
    }

    /// Tell a read that failed because input ran out apart from a
    /// failing reader
    fn classify(&mut self, err: ZByteIoError) -> ReadFailure {
        let out_of_bytes = match &err {
            ZByteIoError::NotEnoughBytes(..) => true,
            #[cfg(feature = "std")]
            ZByteIoError::StdIoError(e) => e.kind() == std::io::ErrorKind::UnexpectedEof,
            // carries no cause, ask the reader
            ZByteIoError::Generic(_) => matches!(self.stream.eof(), Ok(true)),
            _ => false
        };
        if out_of_bytes {
            ReadFailure::EndOfStream
        } else {
            ReadFailure::Io(err)
        }
    }

    /// Return the decoded header, or none if it hasn't been decoded
    pub const fn header(&self) -> Option<&QoifHeader> {
        self.header.as_ref()
    }

    /// Returns the colorspace of decoded pixels or none if the
    /// headers haven't been decoded
    ///
    /// This is always [RGBA], use [`channels`](Self::channels) for
    /// the channel count the image was stored with
    ///
    /// [RGBA]: zune_core::colorspace::ColorSpace::RGBA
    pub const fn colorspace(&self) -> Option<ColorSpace> {
        if self.header.is_some() {
            Some(ColorSpace::RGBA)
        } else {
            None
        }
    }

    /// Channel count recorded in the header, 3 or 4
    pub fn channels(&self) -> Option<u8> {
        self.header.map(|h| h.channels)
    }

    /// Colorspace tag recorded in the header
    pub fn qoif_colorspace(&self) -> Option<QoifColorspace> {
        self.header.map(|h| h.colorspace)
    }

    /// Return the bit depth, this is always 8
    ///
    /// # Example
    ///
    /// ```
    /// use zune_core::bit_depth::BitDepth;
    /// use zune_core::bytestream::ZCursor;
    /// use zune_qoif::QoifDecoder;
    /// let decoder = QoifDecoder::new(ZCursor::new(b""));
    /// assert_eq!(decoder.bit_depth(), BitDepth::Eight)
    /// ```
    pub const fn bit_depth(&self) -> BitDepth {
        BitDepth::Eight
    }

    /// Return the width and height of the image
    ///
    /// Or none if the headers haven't been decoded
    pub fn dimensions(&self) -> Option<(usize, usize)> {
        self.header
            .map(|h| (h.width as usize, h.height as usize))
    }
}

/// Bytes needed for a `width` by `height` RGBA raster, none if
/// that does not fit a usize
fn raster_size(width: u32, height: u32) -> Option<usize> {
    let size = u64::from(width)
        .checked_mul(u64::from(height))?
        .checked_mul(4)?;

    usize::try_from(size).ok()
}

fn output_size(header: &QoifHeader) -> Result<usize, QoifErrors> {
    raster_size(header.width, header.height).ok_or(QoifErrors::TooLargeBuffer(
        header.width as usize,
        header.height as usize
    ))
}

enum ReadFailure {
    EndOfStream,
    Io(ZByteIoError)
}
