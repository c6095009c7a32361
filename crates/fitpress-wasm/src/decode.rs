//! Image decoding and resizing bindings.
//!
//! # Example
//!
//! ```typescript
//! import { decode_image, resize_to_fit } from '@fitpress/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const image = decode_image(bytes);
//! const preview = resize_to_fit(image, 1920, 1920, 1);
//! console.log(`Preview: ${preview.width}x${preview.height}`);
//! ```

use crate::types::{filter_from_u8, JsPixelBuffer};
use fitpress_core::decode::{self, Dimensions};
use fitpress_core::encode::OutputFormat;
use wasm_bindgen::prelude::*;

/// Decode JPEG, PNG or WebP bytes, applying EXIF orientation.
#[wasm_bindgen]
pub fn decode_image(bytes: &[u8]) -> Result<JsPixelBuffer, JsValue> {
    decode::decode_image(bytes)
        .map(JsPixelBuffer::from_buffer)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// MIME type of the source container if fitpress can also write it.
#[wasm_bindgen]
pub fn detect_mime_type(bytes: &[u8]) -> Option<String> {
    detect_output_format(bytes).map(|f| f.mime_type().to_string())
}

pub(crate) fn detect_output_format(bytes: &[u8]) -> Option<OutputFormat> {
    decode::detect_format(bytes).and_then(OutputFormat::from_image_format)
}

/// Resize to exact dimensions.
///
/// `filter`: 0 = Nearest, 1 = Bilinear, 2 = Lanczos3.
#[wasm_bindgen]
pub fn resize(
    image: &JsPixelBuffer,
    width: u32,
    height: u32,
    filter: u8,
) -> Result<JsPixelBuffer, JsValue> {
    decode::resize(&image.to_buffer(), Dimensions::new(width, height), filter_from_u8(filter))
        .map(JsPixelBuffer::from_buffer)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Shrink to fit within `max_width` × `max_height`, keeping aspect ratio.
/// A zero bound leaves that side unconstrained.
#[wasm_bindgen]
pub fn resize_to_fit(
    image: &JsPixelBuffer,
    max_width: u32,
    max_height: u32,
    filter: u8,
) -> Result<JsPixelBuffer, JsValue> {
    decode::resize_to_fit(
        &image.to_buffer(),
        (max_width > 0).then_some(max_width),
        (max_height > 0).then_some(max_height),
        filter_from_u8(filter),
    )
    .map(JsPixelBuffer::from_buffer)
    .map_err(|e| JsValue::from_str(&e.to_string()))
}
