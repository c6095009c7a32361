//! Budget-driven compression bindings.
//!
//! # Example
//!
//! ```typescript
//! import { compress_image, format_bytes } from '@fitpress/wasm';
//!
//! const result = compress_image(bytes, file.name, {
//!   format: 'original',
//!   targetSize: 500,
//!   targetUnit: 'KB',
//!   maxWidth: 1920,
//! });
//! console.log(`${result.file_name}: ${format_bytes(result.size)} ${result.note}`);
//! const blob = new Blob([result.bytes()], { type: result.mime_type });
//! ```

use fitpress_core::{
    compress, format_bytes as core_format_bytes, output_file_name, parse_target_size as core_parse_target_size,
    ImageCodec, SearchOutcome, Settings, SizeUnit,
};
use wasm_bindgen::prelude::*;

/// Outcome of [`compress_image`].
#[wasm_bindgen]
#[derive(Debug)]
pub struct JsCompressResult {
    bytes: Vec<u8>,
    width: u32,
    height: u32,
    reached: bool,
    quality: Option<f32>,
    attempts: u32,
    note: String,
    mime_type: String,
    file_name: String,
}

#[wasm_bindgen]
impl JsCompressResult {
    /// Encoded bytes as a `Uint8Array` (copied).
    pub fn bytes(&self) -> Vec<u8> {
        self.bytes.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Whether the target size was met (always true without one).
    #[wasm_bindgen(getter)]
    pub fn reached(&self) -> bool {
        self.reached
    }

    #[wasm_bindgen(getter)]
    pub fn quality(&self) -> Option<f32> {
        self.quality
    }

    #[wasm_bindgen(getter)]
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Advisory text such as "resized to 640x480, target not reached".
    #[wasm_bindgen(getter)]
    pub fn note(&self) -> String {
        self.note.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn mime_type(&self) -> String {
        self.mime_type.clone()
    }

    /// Suggested download name, `"<stem>-compressed.<ext>"`.
    #[wasm_bindgen(getter)]
    pub fn file_name(&self) -> String {
        self.file_name.clone()
    }
}

impl JsCompressResult {
    fn from_outcome(outcome: SearchOutcome, source_name: &str) -> Self {
        let note = outcome.note();
        let format = outcome.format;
        Self {
            width: outcome.width(),
            height: outcome.height(),
            reached: outcome.reached,
            quality: outcome.quality,
            attempts: outcome.attempts,
            note,
            mime_type: format.mime_type().to_string(),
            file_name: output_file_name(source_name, format),
            bytes: outcome.into_bytes().unwrap_or_default(),
        }
    }
}

/// Compress `bytes` using settings shaped like [`Settings`]
/// (`format`, `targetSize`, `targetUnit`, `maxWidth`, `maxHeight`,
/// `maxQuality`, `filter`). `undefined` or `null` settings use defaults.
#[wasm_bindgen]
pub fn compress_image(bytes: &[u8], name: &str, settings: JsValue) -> Result<JsCompressResult, JsValue> {
    let settings: Settings = if settings.is_undefined() || settings.is_null() {
        Settings::default()
    } else {
        serde_wasm_bindgen::from_value(settings).map_err(|e| JsValue::from_str(&e.to_string()))?
    };

    console_log!("Compressing {} ({})", name, core_format_bytes(bytes.len() as u64));
    console_debug!("Settings: {:?}", settings);

    match compress_with_settings(bytes, name, &settings) {
        Ok(result) => {
            console_log!(
                "{}: {} at {}x{} after {} attempts",
                result.file_name,
                core_format_bytes(result.size() as u64),
                result.width,
                result.height,
                result.attempts
            );
            if !result.note.is_empty() {
                console_warn!("{}: {}", result.file_name, result.note);
            }
            Ok(result)
        }
        Err(e) => {
            console_warn!("Compression failed for {}: {}", name, e);
            Err(JsValue::from_str(&e))
        }
    }
}

pub(crate) fn compress_with_settings(
    bytes: &[u8],
    name: &str,
    settings: &Settings,
) -> Result<JsCompressResult, String> {
    let request = settings.to_request().map_err(|e| e.to_string())?;
    let outcome = compress(&ImageCodec, bytes, &request).map_err(|e| e.to_string())?;
    Ok(JsCompressResult::from_outcome(outcome, name))
}

/// Human-readable size, e.g. `"1.50 KB"`.
#[wasm_bindgen]
pub fn format_bytes(bytes: f64) -> String {
    if !bytes.is_finite() || bytes <= 0.0 {
        return core_format_bytes(0);
    }
    core_format_bytes(bytes as u64)
}

/// Target size in bytes for a settings field, or 0 for "no target".
///
/// `unit` is one of `KB`, `MB`, `KiB`, `MiB`; unknown units fall back to KB.
#[wasm_bindgen]
pub fn parse_target_size(value: &str, unit: &str) -> f64 {
    let unit = unit.parse::<SizeUnit>().unwrap_or_default();
    core_parse_target_size(value, unit).map_or(0.0, |bytes| bytes as f64)
}

/// Download name for a compressed file.
#[wasm_bindgen]
pub fn compressed_file_name(source_name: &str, mime_type: &str) -> Result<String, JsValue> {
    mime_type
        .parse()
        .map(|format| output_file_name(source_name, format))
        .map_err(|e: fitpress_core::ConfigError| JsValue::from_str(&e.to_string()))
}
