//! The result of a quality search or a full ladder run.

use std::fmt;

use serde::Serialize;

use crate::decode::Dimensions;
use crate::encode::OutputFormat;

/// Advisory remark attached to an outcome for user feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Note {
    /// A byte budget was set but the format's encoder has no quality knob.
    IgnoresQuality { format: OutputFormat },
    /// The ladder had to shrink the image below its initial working size.
    Resized { dimensions: Dimensions },
    /// The final output is still larger than the byte budget.
    TargetNotReached,
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Note::IgnoresQuality { format } => write!(f, "{format} ignores quality"),
            Note::Resized { dimensions } => write!(f, "resized to {dimensions}"),
            Note::TargetNotReached => f.write_str("target not reached"),
        }
    }
}

/// What a compression run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    /// The chosen payload; `None` if every attempt failed.
    pub bytes: Option<Vec<u8>>,
    /// Payload length in bytes (0 without a payload).
    pub size: usize,
    /// Whether the byte budget was met.
    pub reached: bool,
    pub format: OutputFormat,
    /// Dimensions the payload was encoded at.
    pub dimensions: Dimensions,
    /// Encoder quality of the payload, for formats that honor it.
    pub quality: Option<f32>,
    /// Number of encode calls spent.
    pub attempts: u32,
    pub notes: Vec<Note>,
}

impl SearchOutcome {
    /// An outcome carrying the given payload.
    pub(crate) fn with_payload(
        bytes: Vec<u8>,
        format: OutputFormat,
        dimensions: Dimensions,
        quality: Option<f32>,
        reached: bool,
    ) -> Self {
        Self {
            size: bytes.len(),
            bytes: Some(bytes),
            reached,
            format,
            dimensions,
            quality,
            attempts: 0,
            notes: Vec::new(),
        }
    }

    /// An outcome with no payload.
    pub(crate) fn empty(format: OutputFormat, dimensions: Dimensions) -> Self {
        Self {
            bytes: None,
            size: 0,
            reached: false,
            format,
            dimensions,
            quality: None,
            attempts: 0,
            notes: Vec::new(),
        }
    }

    /// Whether any payload was produced.
    pub fn has_output(&self) -> bool {
        self.bytes.is_some()
    }

    pub fn width(&self) -> u32 {
        self.dimensions.width
    }

    pub fn height(&self) -> u32 {
        self.dimensions.height
    }

    /// Take ownership of the payload.
    pub fn into_bytes(self) -> Option<Vec<u8>> {
        self.bytes
    }

    /// Add a note unless it is already present.
    pub(crate) fn push_note(&mut self, note: Note) {
        if !self.notes.contains(&note) {
            self.notes.push(note);
        }
    }

    /// All notes joined with ", ", or an empty string.
    pub fn note(&self) -> String {
        self.notes
            .iter()
            .map(Note::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_strings() {
        assert_eq!(
            Note::IgnoresQuality {
                format: OutputFormat::Png
            }
            .to_string(),
            "PNG ignores quality"
        );
        assert_eq!(
            Note::Resized {
                dimensions: Dimensions::new(640, 480)
            }
            .to_string(),
            "resized to 640x480"
        );
        assert_eq!(Note::TargetNotReached.to_string(), "target not reached");
    }

    #[test]
    fn test_note_joins_in_order() {
        let mut outcome =
            SearchOutcome::with_payload(vec![1, 2, 3], OutputFormat::Png, Dimensions::new(8, 8), None, false);
        assert_eq!(outcome.note(), "");

        outcome.push_note(Note::IgnoresQuality {
            format: OutputFormat::Png,
        });
        outcome.push_note(Note::TargetNotReached);
        outcome.push_note(Note::TargetNotReached);

        assert_eq!(outcome.note(), "PNG ignores quality, target not reached");
    }

    #[test]
    fn test_payload_accessors() {
        let outcome =
            SearchOutcome::with_payload(vec![0; 42], OutputFormat::Jpeg, Dimensions::new(3, 2), Some(0.5), true);
        assert!(outcome.has_output());
        assert_eq!(outcome.size, 42);
        assert_eq!((outcome.width(), outcome.height()), (3, 2));
        assert_eq!(outcome.into_bytes().map(|b| b.len()), Some(42));

        let empty = SearchOutcome::empty(OutputFormat::Jpeg, Dimensions::new(3, 2));
        assert!(!empty.has_output());
        assert_eq!(empty.size, 0);
    }
}
