//! Compression budgets and requests.

use serde::{Deserialize, Serialize};

use crate::decode::FilterType;
use crate::encode::FormatChoice;
use crate::settings::ConfigError;

/// Quality ceiling used when the caller does not supply one.
pub const DEFAULT_MAX_QUALITY: f32 = 0.92;

/// Constraints a compression run tries to satisfy.
///
/// Zero byte/dimension limits mean "no limit", matching an empty input field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Budget {
    /// Maximum encoded size in bytes.
    pub max_bytes: Option<u64>,
    /// Maximum output width in pixels.
    pub max_width: Option<u32>,
    /// Maximum output height in pixels.
    pub max_height: Option<u32>,
    /// Highest quality the search may use, in `(0, 1]`.
    pub max_quality: f32,
}

impl Default for Budget {
    fn default() -> Self {
        Self {
            max_bytes: None,
            max_width: None,
            max_height: None,
            max_quality: DEFAULT_MAX_QUALITY,
        }
    }
}

impl Budget {
    /// A budget with no limits and the default quality ceiling.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_bytes(mut self, bytes: u64) -> Self {
        self.max_bytes = (bytes > 0).then_some(bytes);
        self
    }

    pub fn with_max_width(mut self, width: u32) -> Self {
        self.max_width = (width > 0).then_some(width);
        self
    }

    pub fn with_max_height(mut self, height: u32) -> Self {
        self.max_height = (height > 0).then_some(height);
        self
    }

    /// Set the quality ceiling.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidQuality` unless `quality` is in `(0, 1]`.
    pub fn with_max_quality(mut self, quality: f32) -> Result<Self, ConfigError> {
        if !valid_quality(quality) {
            return Err(ConfigError::InvalidQuality(quality));
        }
        self.max_quality = quality;
        Ok(self)
    }

    /// The byte target, if any. A zero limit counts as none.
    pub fn target_bytes(&self) -> Option<u64> {
        self.max_bytes.filter(|bytes| *bytes > 0)
    }

    /// Width bound, treating zero as unbounded.
    pub fn width_bound(&self) -> Option<u32> {
        self.max_width.filter(|w| *w > 0)
    }

    /// Height bound, treating zero as unbounded.
    pub fn height_bound(&self) -> Option<u32> {
        self.max_height.filter(|h| *h > 0)
    }

    /// The quality ceiling, falling back to the default when the stored value
    /// is outside `(0, 1]`.
    pub fn quality_ceiling(&self) -> f32 {
        if valid_quality(self.max_quality) {
            self.max_quality
        } else {
            DEFAULT_MAX_QUALITY
        }
    }
}

fn valid_quality(quality: f32) -> bool {
    quality > 0.0 && quality <= 1.0
}

/// Everything a single compression run needs besides the source bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompressRequest {
    /// Output format selection.
    pub format: FormatChoice,
    /// Size, dimension and quality limits.
    pub budget: Budget,
    /// Resampling filter for every resize.
    pub filter: FilterType,
}

impl CompressRequest {
    pub fn new(format: impl Into<FormatChoice>, budget: Budget) -> Self {
        Self {
            format: format.into(),
            budget,
            filter: FilterType::default(),
        }
    }
}
