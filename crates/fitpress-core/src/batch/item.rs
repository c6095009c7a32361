use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::compress::output_file_name;
use crate::search::SearchOutcome;
use crate::summary::saved_percent;

/// Identifier handed out by [`BatchController::add`](super::BatchController::add).
pub type ItemId = u64;

/// Where an item is in its compression lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    /// Added, not compressed yet.
    Ready,
    /// A compression run is in flight.
    Working,
    /// The last run produced output.
    Done,
    /// The last run failed; any earlier output is kept.
    Failed,
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ItemStatus::Ready => "Ready",
            ItemStatus::Working => "Compressing",
            ItemStatus::Done => "Done",
            ItemStatus::Failed => "Failed",
        })
    }
}

/// One source image in a batch.
#[derive(Debug, Clone)]
pub struct BatchItem {
    pub id: ItemId,
    /// Source file name, used to derive the output name.
    pub name: String,
    pub(crate) source: Arc<[u8]>,
    pub status: ItemStatus,
    /// Most recent successful outcome.
    pub outcome: Option<SearchOutcome>,
    /// Error text of the most recent failed run.
    pub error: Option<String>,
}

impl BatchItem {
    pub(crate) fn new(id: ItemId, name: String, source: Arc<[u8]>) -> Self {
        Self {
            id,
            name,
            source,
            status: ItemStatus::Ready,
            outcome: None,
            error: None,
        }
    }

    pub fn source(&self) -> &[u8] {
        &self.source
    }

    pub fn original_size(&self) -> u64 {
        self.source.len() as u64
    }

    pub fn output_size(&self) -> Option<u64> {
        self.outcome.as_ref().map(|o| o.size as u64)
    }

    /// `"<stem>-compressed.<ext>"` for the current output, if any.
    pub fn output_name(&self) -> Option<String> {
        self.outcome
            .as_ref()
            .map(|o| output_file_name(&self.name, o.format))
    }

    pub fn saved_percent(&self) -> Option<f64> {
        saved_percent(self.original_size(), self.output_size()?)
    }
}
