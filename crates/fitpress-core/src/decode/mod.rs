//! Image decoding and resampling for fitpress.
//!
//! This module provides functionality for:
//! - Decoding JPEG, PNG and WebP sources into RGB pixel buffers
//! - Correcting EXIF orientation at decode time
//! - Resampling buffers to exact dimensions
//!
//! # Architecture
//!
//! All operations are synchronous and single-threaded. Callers that need to
//! keep an async runtime responsive (see `batch`) move whole compression runs
//! onto blocking threads instead of parallelizing inside these functions.
//!
//! # Examples
//!
//! ```ignore
//! use fitpress_core::decode::{decode_image, resize, Dimensions, FilterType};
//!
//! let bytes = std::fs::read("photo.jpg").unwrap();
//! let image = decode_image(&bytes).unwrap();
//! let small = resize(&image, Dimensions::new(640, 480), FilterType::Bilinear).unwrap();
//! ```

mod reader;
mod resize;
mod types;

pub use reader::{decode_image, detect_format};
pub use resize::{resize, resize_to_fit};
pub use types::{DecodeError, Dimensions, FilterType, Orientation, PixelBuffer};
