//! Bounded binary search over encoder quality at a fixed resolution.
//!
//! Encoded size is assumed to be non-decreasing in quality, so each probe
//! halves the interval that can still contain the quality/size boundary.

use tracing::{debug, warn};

use super::SearchOutcome;
use crate::codec::Codec;
use crate::decode::PixelBuffer;
use crate::encode::OutputFormat;

/// Lower end of the searched quality interval.
pub const MIN_QUALITY: f32 = 0.1;

/// Maximum number of probes in one search.
pub const MAX_ITERATIONS: u32 = 8;

struct Candidate {
    bytes: Vec<u8>,
    quality: f32,
}

/// Counts encode calls and folds failed/empty results into `None`.
struct Prober<'a, C: ?Sized> {
    codec: &'a C,
    image: &'a PixelBuffer,
    format: OutputFormat,
    attempts: u32,
}

impl<C: Codec + ?Sized> Prober<'_, C> {
    fn probe(&mut self, quality: f32) -> Option<Candidate> {
        self.attempts += 1;
        match self.codec.encode(self.image, self.format, quality) {
            Ok(bytes) if !bytes.is_empty() => Some(Candidate { bytes, quality }),
            Ok(_) => {
                warn!(format = %self.format, quality, "encoder returned an empty payload");
                None
            }
            Err(e) => {
                warn!(format = %self.format, quality, error = %e, "encode attempt failed");
                None
            }
        }
    }
}

/// Find the highest quality whose encoding fits `target_bytes`.
///
/// Without a target, or for formats whose encoder ignores quality, this is a
/// single encode at `max_quality` reported as reached. Otherwise at most
/// [`MAX_ITERATIONS`] probes are made over `[min(0.1, max_quality), max_quality]`.
/// The first failed probe ends the search early.
///
/// The returned payload is the best fitting candidate; when nothing fit it is
/// the last probe (the lowest quality tried) with `reached == false`.
pub fn search<C: Codec + ?Sized>(
    codec: &C,
    image: &PixelBuffer,
    format: OutputFormat,
    max_quality: f32,
    target_bytes: Option<u64>,
) -> SearchOutcome {
    let dimensions = image.dimensions();
    let honors_quality = codec.honors_quality(format);
    let mut prober = Prober {
        codec,
        image,
        format,
        attempts: 0,
    };

    let target = match target_bytes.filter(|t| *t > 0) {
        Some(target) if honors_quality => target,
        _ => {
            let mut outcome = match prober.probe(max_quality) {
                Some(c) => SearchOutcome::with_payload(
                    c.bytes,
                    format,
                    dimensions,
                    honors_quality.then_some(c.quality),
                    true,
                ),
                None => SearchOutcome::empty(format, dimensions),
            };
            outcome.attempts = prober.attempts;
            return outcome;
        }
    };

    let mut low = MIN_QUALITY.min(max_quality);
    let mut high = max_quality;
    let mut best: Option<Candidate> = None;
    let mut last_over: Option<Candidate> = None;

    for _ in 0..MAX_ITERATIONS {
        let mid = (low + high) / 2.0;
        let Some(candidate) = prober.probe(mid) else {
            break;
        };

        let size = candidate.bytes.len() as u64;
        debug!(%dimensions, quality = mid, size, target, "quality probe");

        if size > target {
            high = mid;
            last_over = Some(candidate);
        } else {
            low = mid;
            best = Some(candidate);
        }
    }

    let (chosen, reached) = match (best, last_over) {
        (Some(fit), _) => (Some(fit), true),
        // Every over-budget probe lowered `high` to its own quality.
        (None, Some(over)) => (Some(over), false),
        (None, None) => {
            let fallback = prober.probe(high);
            let reached = fallback
                .as_ref()
                .is_some_and(|c| c.bytes.len() as u64 <= target);
            (fallback, reached)
        }
    };

    let mut outcome = match chosen {
        Some(c) => {
            SearchOutcome::with_payload(c.bytes, format, dimensions, Some(c.quality), reached)
        }
        None => SearchOutcome::empty(format, dimensions),
    };
    outcome.attempts = prober.attempts;
    outcome
}
