//! The decode/resample/encode services a compression run depends on.
//!
//! The search algorithms only ever talk to a [`Codec`]. [`ImageCodec`] is the
//! implementation backed by the `image` crate; tests substitute synthetic
//! codecs whose size/quality curve is known.

use crate::decode::{self, DecodeError, Dimensions, FilterType, PixelBuffer};
use crate::encode::{self, EncodeError, OutputFormat};

/// External image services used by a compression run.
///
/// Implementations must be deterministic for a given input if callers rely on
/// `compress` being idempotent.
pub trait Codec {
    /// Decode container bytes into a pixel buffer.
    fn decode(&self, bytes: &[u8]) -> Result<PixelBuffer, DecodeError>;

    /// Resample to exactly `size`.
    fn resample(
        &self,
        image: &PixelBuffer,
        size: Dimensions,
        filter: FilterType,
    ) -> Result<PixelBuffer, DecodeError>;

    /// Encode at a normalized quality in `[0, 1]`.
    ///
    /// An `Ok` carrying an empty payload counts as a failed attempt.
    fn encode(
        &self,
        image: &PixelBuffer,
        format: OutputFormat,
        quality: f32,
    ) -> Result<Vec<u8>, EncodeError>;

    /// Whether `quality` has any effect on the output of `format`.
    fn honors_quality(&self, format: OutputFormat) -> bool {
        format.honors_quality()
    }

    /// Sniff the source container, if it is one this codec can also write.
    fn detect_format(&self, bytes: &[u8]) -> Option<OutputFormat> {
        decode::detect_format(bytes).and_then(OutputFormat::from_image_format)
    }
}

/// [`Codec`] implementation backed by the `image` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageCodec;

impl Codec for ImageCodec {
    fn decode(&self, bytes: &[u8]) -> Result<PixelBuffer, DecodeError> {
        decode::decode_image(bytes)
    }

    fn resample(
        &self,
        image: &PixelBuffer,
        size: Dimensions,
        filter: FilterType,
    ) -> Result<PixelBuffer, DecodeError> {
        decode::resize(image, size, filter)
    }

    fn encode(
        &self,
        image: &PixelBuffer,
        format: OutputFormat,
        quality: f32,
    ) -> Result<Vec<u8>, EncodeError> {
        encode::encode(image, format, quality)
    }
}
