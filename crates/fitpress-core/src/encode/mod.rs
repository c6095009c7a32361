//! Image encoding for fitpress.
//!
//! This module provides functionality for:
//! - Choosing an output format (fixed, or following the source container)
//! - Encoding pixel buffers to JPEG (lossy), PNG and WebP (lossless)
//!
//! # Examples
//!
//! ```ignore
//! use fitpress_core::encode::{encode, OutputFormat};
//!
//! let jpeg_bytes = encode(&image, OutputFormat::Jpeg, 0.9).unwrap();
//! println!("Encoded {} bytes", jpeg_bytes.len());
//! ```

mod encoder;
mod format;

pub use encoder::{encode, encode_jpeg, encode_png, encode_webp, jpeg_quality, EncodeError};
pub use format::{FormatChoice, OutputFormat};
