//! Resolution ladder: shrink the image when quality alone cannot meet the
//! byte budget.

use std::borrow::Cow;

use tracing::{debug, warn};

use super::{quality, Note, SearchOutcome};
use crate::budget::Budget;
use crate::codec::Codec;
use crate::decode::{Dimensions, FilterType, PixelBuffer};
use crate::encode::OutputFormat;

/// Maximum number of resolutions tried, including the initial one.
pub const MAX_ROUNDS: u32 = 6;

/// Smallest side length the ladder shrinks to.
pub const MIN_SIDE: u32 = 32;

/// Strongest per-round shrink.
pub const MIN_SHRINK: f64 = 0.35;

/// Gentlest per-round shrink.
pub const MAX_SHRINK: f64 = 0.85;

/// Per-side scale for the next round, from how far the last result missed.
///
/// Encoded size scales roughly with area, hence the square root.
pub fn shrink_factor(target_bytes: u64, achieved_bytes: usize) -> f64 {
    if achieved_bytes == 0 {
        return MAX_SHRINK;
    }
    (target_bytes as f64 / achieved_bytes as f64)
        .sqrt()
        .clamp(MIN_SHRINK, MAX_SHRINK)
}

/// Dimensions for the next round, or `None` if shrinking changes nothing.
pub fn next_dimensions(current: Dimensions, factor: f64) -> Option<Dimensions> {
    let shrink = |side: u32| {
        let scaled = (f64::from(side) * factor).floor() as u32;
        scaled.max(MIN_SIDE).min(side)
    };
    let next = Dimensions::new(shrink(current.width), shrink(current.height));
    (next != current).then_some(next)
}

/// Whether either side has reached the ladder's floor.
pub fn at_floor(dimensions: Dimensions) -> bool {
    dimensions.width <= MIN_SIDE || dimensions.height <= MIN_SIDE
}

/// Run quality searches at decreasing resolutions until the budget is met.
///
/// The first round uses `source` scaled to fit the budget's dimension caps
/// (never upscaled). Each later round resamples from `source` again. The
/// returned outcome sums the encode attempts of every round.
pub fn run<C: Codec + ?Sized>(
    codec: &C,
    source: &PixelBuffer,
    format: OutputFormat,
    budget: &Budget,
    filter: FilterType,
) -> SearchOutcome {
    let source_dims = source.dimensions();
    let initial = source_dims.fit_within(budget.width_bound(), budget.height_bound());
    let target = budget.target_bytes();
    let max_quality = budget.quality_ceiling();

    let mut dims = initial;
    let mut best: Option<SearchOutcome> = None;
    let mut attempts = 0;

    for round in 1..=MAX_ROUNDS {
        let working = if dims == source_dims {
            Cow::Borrowed(source)
        } else {
            match codec.resample(source, dims, filter) {
                Ok(resized) => Cow::Owned(resized),
                Err(e) => {
                    warn!(%dims, error = %e, "resample failed");
                    break;
                }
            }
        };

        let outcome = quality::search(codec, &working, format, max_quality, target);
        attempts += outcome.attempts;
        debug!(
            round,
            %dims,
            size = outcome.size,
            reached = outcome.reached,
            attempts = outcome.attempts,
            "ladder round"
        );

        if !outcome.has_output() {
            if best.is_none() {
                best = Some(outcome);
            }
            break;
        }

        let size = outcome.size;
        let reached = outcome.reached;
        let keep_prior = best
            .as_ref()
            .is_some_and(|prior| prior.has_output() && !reached && size > prior.size);
        if !keep_prior {
            best = Some(outcome);
        }

        let Some(target) = target else { break };
        if reached || at_floor(dims) {
            break;
        }

        let factor = shrink_factor(target, size);
        match next_dimensions(dims, factor) {
            Some(next) => dims = next,
            None => break,
        }
    }

    let mut outcome = best.unwrap_or_else(|| SearchOutcome::empty(format, initial));
    outcome.attempts = attempts;
    if outcome.has_output() && outcome.dimensions != initial {
        outcome.push_note(Note::Resized {
            dimensions: outcome.dimensions,
        });
    }
    outcome
}
