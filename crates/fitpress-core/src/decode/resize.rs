//! Image resampling.
//!
//! All functions return new `PixelBuffer` instances without modifying the input.

use super::{DecodeError, Dimensions, FilterType, PixelBuffer};

/// Resize an image to exact dimensions.
///
/// The output always has exactly the requested size, regardless of the
/// source aspect ratio.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` if either requested side is zero, and
/// `DecodeError::CorruptedFile` if the source buffer does not match its
/// declared dimensions.
pub fn resize(
    image: &PixelBuffer,
    size: Dimensions,
    filter: FilterType,
) -> Result<PixelBuffer, DecodeError> {
    if size.width == 0 || size.height == 0 {
        return Err(DecodeError::InvalidFormat);
    }

    // Fast path: if dimensions match, just clone
    if image.dimensions() == size {
        return Ok(image.clone());
    }

    let rgb_image = image
        .to_rgb_image()
        .ok_or_else(|| DecodeError::CorruptedFile("Failed to create RgbImage".to_string()))?;

    let resized = image::imageops::resize(
        &rgb_image,
        size.width,
        size.height,
        filter.to_image_filter(),
    );

    Ok(PixelBuffer::from_rgb_image(resized))
}

/// Resize an image to fit within optional width/height bounds, preserving
/// aspect ratio and never upscaling.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` if a bound is zero.
pub fn resize_to_fit(
    image: &PixelBuffer,
    max_width: Option<u32>,
    max_height: Option<u32>,
    filter: FilterType,
) -> Result<PixelBuffer, DecodeError> {
    if max_width == Some(0) || max_height == Some(0) {
        return Err(DecodeError::InvalidFormat);
    }

    let target = image.dimensions().fit_within(max_width, max_height);
    resize(image, target, filter)
}
