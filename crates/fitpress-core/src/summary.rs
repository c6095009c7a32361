//! Human-readable byte counts and batch totals.

use std::fmt;

use serde::Serialize;

const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

/// Format a byte count with binary multiples and two decimals.
///
/// `format_bytes(0)` is `"0 B"`, `format_bytes(1536)` is `"1.50 KB"`. Values
/// past the gigabyte range stay in GB.
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }
    let mut exponent = 0;
    while exponent < UNITS.len() - 1 && bytes >= 1u64 << (10 * (exponent + 1)) {
        exponent += 1;
    }
    let value = bytes as f64 / (1u64 << (10 * exponent)) as f64;
    format!("{value:.2} {}", UNITS[exponent])
}

/// Percentage saved going from `original` to `output`, or `None` if either
/// is zero. Negative when the output grew.
pub fn saved_percent(original: u64, output: u64) -> Option<f64> {
    if original == 0 || output == 0 {
        return None;
    }
    Some((1.0 - output as f64 / original as f64) * 100.0)
}

/// Totals over a batch of compressed items.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub total_original: u64,
    /// Sum of output sizes; items without output count as zero.
    pub total_output: u64,
}

impl BatchSummary {
    /// Sum `(original_size, output_size)` pairs.
    pub fn from_sizes(sizes: impl IntoIterator<Item = (u64, Option<u64>)>) -> Self {
        sizes
            .into_iter()
            .fold(Self::default(), |mut summary, (original, output)| {
                summary.total_original += original;
                summary.total_output += output.unwrap_or(0);
                summary
            })
    }

    /// Bytes saved; negative when outputs are larger in total.
    pub fn saved_bytes(&self) -> Option<i64> {
        (self.total_original > 0 && self.total_output > 0)
            .then(|| self.total_original as i64 - self.total_output as i64)
    }

    pub fn saved_percent(&self) -> Option<f64> {
        saved_percent(self.total_original, self.total_output)
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.saved_bytes(), self.saved_percent()) {
            (Some(saved), Some(percent)) => {
                let sign = if saved < 0 { "-" } else { "" };
                write!(
                    f,
                    "{sign}{} saved ({percent:.1}%)",
                    format_bytes(saved.unsigned_abs())
                )
            }
            _ => f.write_str("0 KB saved"),
        }
    }
}
