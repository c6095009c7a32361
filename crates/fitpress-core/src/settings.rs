//! User-facing compression settings and target size parsing.
//!
//! `Settings` is the shape a settings panel or command line hands over: a
//! target size as a number plus a unit, optional dimension caps, and a format
//! choice. [`Settings::to_request`] validates it into a [`CompressRequest`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::budget::{Budget, CompressRequest};
use crate::decode::FilterType;
use crate::encode::FormatChoice;

/// Errors produced while turning settings into a request.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Quality ceiling outside `(0, 1]`.
    #[error("Invalid quality {0}: expected a value in (0, 1]")]
    InvalidQuality(f32),

    /// A target size that is not a positive number.
    #[error("Invalid target size: {0:?}")]
    InvalidTargetSize(String),

    /// A size unit other than KB, MB, KiB or MiB.
    #[error("Unknown size unit: {0:?}")]
    UnknownUnit(String),

    /// A format name that is neither "original" nor a supported encoding.
    #[error("Unknown output format: {0:?}")]
    UnknownFormat(String),
}

/// Unit for a target size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SizeUnit {
    /// 1000 bytes.
    #[default]
    #[serde(rename = "KB")]
    Kb,
    /// 1000 × 1000 bytes.
    #[serde(rename = "MB")]
    Mb,
    /// 1024 bytes.
    #[serde(rename = "KiB")]
    KiB,
    /// 1024 × 1024 bytes.
    #[serde(rename = "MiB")]
    MiB,
}

impl SizeUnit {
    /// Bytes per unit.
    pub fn multiplier(self) -> f64 {
        match self {
            SizeUnit::Kb => 1000.0,
            SizeUnit::Mb => 1000.0 * 1000.0,
            SizeUnit::KiB => 1024.0,
            SizeUnit::MiB => 1024.0 * 1024.0,
        }
    }

    /// Convert an amount in this unit to whole bytes.
    ///
    /// Non-finite and non-positive amounts yield `None` (no byte budget).
    /// Fractional byte counts round down, since sizes are integral.
    pub fn to_bytes(self, amount: f64) -> Option<u64> {
        if !amount.is_finite() || amount <= 0.0 {
            return None;
        }
        let bytes = (amount * self.multiplier()).floor();
        (bytes >= 1.0).then_some(bytes as u64)
    }
}

impl fmt::Display for SizeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SizeUnit::Kb => "KB",
            SizeUnit::Mb => "MB",
            SizeUnit::KiB => "KiB",
            SizeUnit::MiB => "MiB",
        })
    }
}

impl FromStr for SizeUnit {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "kb" | "k" => Ok(SizeUnit::Kb),
            "mb" | "m" => Ok(SizeUnit::Mb),
            "kib" => Ok(SizeUnit::KiB),
            "mib" => Ok(SizeUnit::MiB),
            _ => Err(ConfigError::UnknownUnit(s.to_string())),
        }
    }
}

/// Parse a target size field the way a settings panel would.
///
/// Empty, non-numeric and non-positive values mean "no target".
pub fn parse_target_size(value: &str, unit: SizeUnit) -> Option<u64> {
    let amount: f64 = value.trim().parse().ok()?;
    unit.to_bytes(amount)
}

/// A target size with its unit, e.g. `500KB` or `1.5 MiB`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetSize {
    pub amount: f64,
    pub unit: SizeUnit,
}

impl TargetSize {
    /// Size in whole bytes.
    pub fn bytes(&self) -> Option<u64> {
        self.unit.to_bytes(self.amount)
    }
}

impl FromStr for TargetSize {
    type Err = ConfigError;

    /// A bare number is read as kilobytes.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let split = trimmed
            .find(|c: char| c.is_ascii_alphabetic())
            .unwrap_or(trimmed.len());
        let (number, unit) = trimmed.split_at(split);

        let amount: f64 = number
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidTargetSize(s.to_string()))?;
        if !amount.is_finite() || amount <= 0.0 {
            return Err(ConfigError::InvalidTargetSize(s.to_string()));
        }

        let unit = if unit.is_empty() {
            SizeUnit::default()
        } else {
            unit.parse()?
        };

        Ok(TargetSize { amount, unit })
    }
}

impl fmt::Display for TargetSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.unit)
    }
}

/// Settings as entered by a user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// `"original"`, a MIME type, or a short format name.
    pub format: FormatChoice,
    /// Target size amount in `target_unit`; absent or non-positive means none.
    pub target_size: Option<f64>,
    pub target_unit: SizeUnit,
    pub max_width: Option<u32>,
    pub max_height: Option<u32>,
    /// Quality ceiling; the default applies when absent.
    pub max_quality: Option<f32>,
    pub filter: FilterType,
}

impl Settings {
    /// Validate into a request.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidQuality` for a quality ceiling outside
    /// `(0, 1]`.
    pub fn to_request(&self) -> Result<CompressRequest, ConfigError> {
        let mut budget = Budget::new();
        if let Some(bytes) = self.target_size.and_then(|a| self.target_unit.to_bytes(a)) {
            budget = budget.with_max_bytes(bytes);
        }
        if let Some(width) = self.max_width {
            budget = budget.with_max_width(width);
        }
        if let Some(height) = self.max_height {
            budget = budget.with_max_height(height);
        }
        if let Some(quality) = self.max_quality {
            budget = budget.with_max_quality(quality)?;
        }

        Ok(CompressRequest {
            format: self.format,
            budget,
            filter: self.filter,
        })
    }
}
