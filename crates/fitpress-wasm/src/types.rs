//! WASM-compatible wrapper types for image data.
//!
//! This module provides JavaScript-friendly types that wrap the core fitpress
//! types, handling the conversion between Rust and JavaScript representations.

use fitpress_core::decode::{FilterType, PixelBuffer};
use wasm_bindgen::prelude::*;

/// A decoded RGB image for JavaScript.
///
/// # Memory Management
///
/// The pixel data lives in WASM memory. `pixels()` copies it out as a
/// `Uint8Array`; call `free()` to release a large image early, otherwise the
/// wasm-bindgen finalizer handles it.
#[wasm_bindgen]
pub struct JsPixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

#[wasm_bindgen]
impl JsPixelBuffer {
    /// Create a buffer from RGB pixel data (3 bytes per pixel, row-major).
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> JsPixelBuffer {
        JsPixelBuffer {
            width,
            height,
            pixels,
        }
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.pixels.len()
    }

    /// Returns RGB pixel data as a `Uint8Array` (copied).
    pub fn pixels(&self) -> Vec<u8> {
        self.pixels.clone()
    }

    pub fn free(self) {}
}

impl JsPixelBuffer {
    pub(crate) fn from_buffer(buffer: PixelBuffer) -> Self {
        Self {
            width: buffer.width,
            height: buffer.height,
            pixels: buffer.pixels,
        }
    }

    /// Copy into a core buffer for resize/encode calls.
    pub(crate) fn to_buffer(&self) -> PixelBuffer {
        PixelBuffer::new(self.width, self.height, self.pixels.clone())
    }
}

/// Map a filter code from JavaScript to a [`FilterType`].
///
/// 0 = Nearest, 2 = Lanczos3, anything else = Bilinear.
pub(crate) fn filter_from_u8(value: u8) -> FilterType {
    match value {
        0 => FilterType::Nearest,
        2 => FilterType::Lanczos3,
        _ => FilterType::Bilinear,
    }
}
