//! Image encoding bindings.
//!
//! `format` accepts a MIME type (`"image/jpeg"`) or a short name (`"png"`).
//! `quality` is normalized to `[0, 1]` and only affects JPEG.

use crate::types::JsPixelBuffer;
use fitpress_core::encode::{self, OutputFormat};
use fitpress_core::ConfigError;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub fn encode_image(image: &JsPixelBuffer, format: &str, quality: f32) -> Result<Vec<u8>, JsValue> {
    encode_buffer(image, format, quality).map_err(|e| JsValue::from_str(&e))
}

pub(crate) fn encode_buffer(image: &JsPixelBuffer, format: &str, quality: f32) -> Result<Vec<u8>, String> {
    let format: OutputFormat = format.parse().map_err(|e: ConfigError| e.to_string())?;
    encode::encode(&image.to_buffer(), format, quality).map_err(|e| e.to_string())
}

/// Whether the encoder for `format` responds to the quality setting.
#[wasm_bindgen]
pub fn format_honors_quality(format: &str) -> bool {
    format
        .parse::<OutputFormat>()
        .is_ok_and(OutputFormat::honors_quality)
}
