//! Encoders backed by the `image` crate.
//!
//! JPEG is the only lossy format; PNG and WebP are written losslessly and
//! ignore the quality argument.

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::ExtendedColorType;
use image::ImageEncoder;
use std::io::Cursor;
use thiserror::Error;

use super::OutputFormat;
use crate::decode::PixelBuffer;

/// Errors that can occur during encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 3), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The underlying encoder failed
    #[error("{format} encoding failed: {reason}")]
    EncodingFailed { format: OutputFormat, reason: String },
}

/// Map a normalized quality in `[0, 1]` onto the JPEG encoder's `1..=100`.
pub fn jpeg_quality(quality: f32) -> u8 {
    let scaled = (quality.clamp(0.0, 1.0) * 100.0).round();
    // NaN falls through clamp and casts to 0
    (scaled as u8).clamp(1, 100)
}

/// Encode a pixel buffer in the given format.
///
/// `quality` is a normalized value in `[0, 1]`; formats that do not honor
/// quality ignore it.
pub fn encode(
    image: &PixelBuffer,
    format: OutputFormat,
    quality: f32,
) -> Result<Vec<u8>, EncodeError> {
    match format {
        OutputFormat::Jpeg => encode_jpeg(&image.pixels, image.width, image.height, jpeg_quality(quality)),
        OutputFormat::Png => encode_png(&image.pixels, image.width, image.height),
        OutputFormat::WebP => encode_webp(&image.pixels, image.width, image.height),
    }
}

/// Encode RGB pixel data to JPEG bytes.
///
/// # Arguments
///
/// * `pixels` - RGB pixel data (3 bytes per pixel, row-major order)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `quality` - JPEG quality (1-100, where 100 is highest quality)
pub fn encode_jpeg(
    pixels: &[u8],
    width: u32,
    height: u32,
    quality: u8,
) -> Result<Vec<u8>, EncodeError> {
    validate(pixels, width, height)?;

    let mut buffer = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100))
        .write_image(pixels, width, height, ExtendedColorType::Rgb8)
        .map_err(|e| failed(OutputFormat::Jpeg, e))?;

    Ok(buffer.into_inner())
}

/// Encode RGB pixel data to PNG bytes.
pub fn encode_png(pixels: &[u8], width: u32, height: u32) -> Result<Vec<u8>, EncodeError> {
    validate(pixels, width, height)?;

    let mut buffer = Vec::new();
    PngEncoder::new(&mut buffer)
        .write_image(pixels, width, height, ExtendedColorType::Rgb8)
        .map_err(|e| failed(OutputFormat::Png, e))?;

    Ok(buffer)
}

/// Encode RGB pixel data to lossless WebP bytes.
pub fn encode_webp(pixels: &[u8], width: u32, height: u32) -> Result<Vec<u8>, EncodeError> {
    validate(pixels, width, height)?;

    let mut buffer = Vec::new();
    WebPEncoder::new_lossless(&mut buffer)
        .write_image(pixels, width, height, ExtendedColorType::Rgb8)
        .map_err(|e| failed(OutputFormat::WebP, e))?;

    Ok(buffer)
}

fn validate(pixels: &[u8], width: u32, height: u32) -> Result<(), EncodeError> {
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let expected = (width as usize) * (height as usize) * 3;
    if pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: pixels.len(),
        });
    }

    Ok(())
}

fn failed(format: OutputFormat, err: image::ImageError) -> EncodeError {
    EncodeError::EncodingFailed {
        format,
        reason: err.to_string(),
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// Strategy for generating image dimensions (keep small for speed).
    fn dimensions_strategy() -> impl Strategy<Value = (u32, u32)> {
        (1u32..=40, 1u32..=40)
    }

    proptest! {
        /// Property: Same input always produces same output (deterministic).
        #[test]
        fn prop_deterministic_output(
            (width, height) in (1u32..=20, 1u32..=20),
            quality in 0.0f32..=1.0,
        ) {
            let image = PixelBuffer::new(width, height, vec![100u8; (width * height * 3) as usize]);

            let first = encode(&image, OutputFormat::Jpeg, quality);
            let second = encode(&image, OutputFormat::Jpeg, quality);

            prop_assert!(first.is_ok() && second.is_ok());
            prop_assert_eq!(first.unwrap(), second.unwrap());
        }

        /// Property: Every format produces non-empty output for valid input.
        #[test]
        fn prop_valid_input_produces_output(
            (width, height) in dimensions_strategy(),
            quality in 0.0f32..=1.0,
        ) {
            let size = (width as usize) * (height as usize) * 3;
            let image = PixelBuffer::new(width, height, (0..size).map(|i| ((i * 37) % 256) as u8).collect());

            for format in OutputFormat::ALL {
                let bytes = encode(&image, format, quality);
                prop_assert!(bytes.is_ok(), "{} failed", format);
                prop_assert!(!bytes.unwrap().is_empty());
            }
        }

        /// Property: Invalid pixel data length always returns error.
        #[test]
        fn prop_invalid_pixel_length_returns_error(
            (width, height) in dimensions_strategy(),
            delta in 1usize..=10,
            shorter in any::<bool>(),
        ) {
            let expected = (width as usize) * (height as usize) * 3;
            let actual = if shorter { expected.saturating_sub(delta) } else { expected + delta };
            prop_assume!(actual != expected);

            let result = encode_png(&vec![128u8; actual], width, height);
            prop_assert!(
                matches!(result, Err(EncodeError::InvalidPixelData { .. })),
                "Mismatched pixel data should return InvalidPixelData error"
            );
        }
    }
}
