//! Fitpress Core - budget-driven image compression
//!
//! This crate finds the highest-quality encoding of an image that fits a byte
//! budget: a bounded binary search over encoder quality, wrapped in a
//! resolution ladder that shrinks the image when quality alone is not enough.
//! Decoding, resampling and encoding go through the [`Codec`] trait, with
//! [`ImageCodec`] as the `image`-backed implementation.
//!
//! The `batch` feature (on by default) adds a Tokio-based controller for
//! compressing many images with shared, debounced settings.

pub mod budget;
pub mod codec;
pub mod compress;
pub mod decode;
pub mod encode;
pub mod search;
pub mod settings;
pub mod summary;

#[cfg(feature = "batch")]
pub mod batch;

pub use budget::{Budget, CompressRequest, DEFAULT_MAX_QUALITY};
pub use codec::{Codec, ImageCodec};
pub use compress::{compress, output_file_name, CompressError};
pub use decode::{Dimensions, FilterType, PixelBuffer};
pub use encode::{FormatChoice, OutputFormat};
pub use search::{Note, SearchOutcome};
pub use settings::{parse_target_size, ConfigError, Settings, SizeUnit, TargetSize};
pub use summary::{format_bytes, BatchSummary};
