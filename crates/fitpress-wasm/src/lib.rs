//! Fitpress WASM - WebAssembly bindings for fitpress
//!
//! This crate exposes the fitpress-core compression pipeline to
//! JavaScript/TypeScript. Batching and debouncing are left to the caller;
//! each call compresses one image synchronously.
//!
//! # Module Structure
//!
//! - `compress` - Budget-driven compression plus size formatting helpers
//! - `decode` - Decoding and resizing
//! - `encode` - Single-shot encoding at a fixed quality
//! - `types` - WASM-compatible wrapper types for image data
//!
//! # Usage
//!
//! ```typescript
//! import init, { compress_image } from '@fitpress/wasm';
//!
//! await init();
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const result = compress_image(bytes, file.name, { targetSize: 200, targetUnit: 'KB' });
//! console.log(`${result.width}x${result.height}, ${result.size} bytes`);
//! ```

use wasm_bindgen::prelude::*;

// Browser console logging. Skipped on native targets, where the imported
// console functions panic.
macro_rules! console_log {
    ($($arg:tt)*) => {
        if cfg!(target_arch = "wasm32") {
            web_sys::console::log_1(&format!($($arg)*).into());
        }
    };
}

macro_rules! console_warn {
    ($($arg:tt)*) => {
        if cfg!(target_arch = "wasm32") {
            web_sys::console::warn_1(&format!($($arg)*).into());
        }
    };
}

macro_rules! console_debug {
    ($($arg:tt)*) => {
        if cfg!(target_arch = "wasm32") {
            web_sys::console::debug_1(&format!($($arg)*).into());
        }
    };
}

mod compress;
mod decode;
mod encode;
mod types;

pub use compress::{compress_image, compressed_file_name, format_bytes, parse_target_size, JsCompressResult};
pub use decode::{decode_image, detect_mime_type, resize, resize_to_fit};
pub use encode::{encode_image, format_honors_quality};
pub use types::JsPixelBuffer;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    console_debug!("fitpress {} initialized", version());
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
