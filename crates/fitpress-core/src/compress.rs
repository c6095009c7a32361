//! Single-image entry point: decode, pick a format, search, reconcile notes.

use thiserror::Error;
use tracing::{debug, info};

use crate::budget::CompressRequest;
use crate::codec::Codec;
use crate::decode::DecodeError;
use crate::encode::OutputFormat;
use crate::search::{ladder, Note, SearchOutcome};

/// Errors that end a compression run without output.
#[derive(Debug, Error)]
pub enum CompressError {
    /// The source bytes could not be decoded.
    #[error("Failed to decode source image: {0}")]
    Decode(#[from] DecodeError),

    /// Every encode attempt failed.
    #[error("Encoder produced no {format} output")]
    NoOutput { format: OutputFormat },
}

/// Compress `source` to fit `request` as closely as possible.
///
/// Missing the byte budget is not an error: the smallest payload found is
/// returned with `reached == false` and a "target not reached" note.
///
/// # Errors
///
/// Returns `CompressError::Decode` if the source cannot be decoded and
/// `CompressError::NoOutput` if no encode attempt produced bytes.
pub fn compress<C: Codec + ?Sized>(
    codec: &C,
    source: &[u8],
    request: &CompressRequest,
) -> Result<SearchOutcome, CompressError> {
    let image = codec.decode(source)?;
    let format = request.format.resolve(codec.detect_format(source));
    debug!(
        dimensions = %image.dimensions(),
        %format,
        source_bytes = source.len(),
        "decoded source"
    );

    let budget = &request.budget;
    let mut outcome = ladder::run(codec, &image, format, budget, request.filter);
    if !outcome.has_output() {
        return Err(CompressError::NoOutput { format });
    }

    if let Some(target) = budget.target_bytes() {
        outcome.reached = outcome.size as u64 <= target;
        if !codec.honors_quality(format) {
            outcome.push_note(Note::IgnoresQuality { format });
        }
        if !outcome.reached {
            outcome.push_note(Note::TargetNotReached);
        }
    }

    info!(
        %format,
        dimensions = %outcome.dimensions,
        size = outcome.size,
        reached = outcome.reached,
        attempts = outcome.attempts,
        "compressed image"
    );
    Ok(outcome)
}

/// Download name for a compressed file: `"<stem>-compressed.<ext>"`.
///
/// The last extension of `source_name` is replaced. A name that is nothing
/// but an extension keeps it as the stem.
pub fn output_file_name(source_name: &str, format: OutputFormat) -> String {
    let stem = match source_name.rfind('.') {
        Some(dot) if dot > 0 && !source_name[dot + 1..].contains('/') => &source_name[..dot],
        _ => source_name,
    };
    format!("{stem}-compressed.{}", format.extension())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::budget::Budget;
    use crate::codec::ImageCodec;
    use crate::decode::{Dimensions, PixelBuffer};
    use crate::encode::{encode_png, FormatChoice};
    use crate::search::test_support::SyntheticCodec;

    fn jpeg_request(bytes: u64) -> CompressRequest {
        CompressRequest::new(OutputFormat::Jpeg, Budget::new().with_max_bytes(bytes))
    }

    #[test]
    fn test_compress_is_idempotent() {
        let request = jpeg_request(4_000);
        let first = compress(&SyntheticCodec::new(300, 200, 1.5), b"source", &request).unwrap();
        let second = compress(&SyntheticCodec::new(300, 200, 1.5), b"source", &request).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_unreachable_budget_ends_at_floor() {
        let codec = SyntheticCodec::new(100, 100, 1.0);
        let outcome = compress(&codec, b"source", &jpeg_request(10)).unwrap();

        assert!(!outcome.reached);
        assert_eq!(outcome.dimensions, Dimensions::new(32, 32));
        assert!(outcome.note().contains("target not reached"));
        assert!(outcome.has_output());
    }

    #[test]
    fn test_reachable_budget_has_no_notes() {
        let codec = SyntheticCodec::new(100, 100, 1.0);
        let outcome = compress(&codec, b"source", &jpeg_request(8_000)).unwrap();

        assert!(outcome.reached);
        assert!(outcome.size <= 8_000);
        assert!(outcome.notes.is_empty());
    }

    #[test]
    fn test_lossless_reconciles_against_budget() {
        let codec = SyntheticCodec::new(100, 100, 1.0);
        let request = CompressRequest::new(OutputFormat::Png, Budget::new().with_max_bytes(500));
        let outcome = compress(&codec, b"source", &request).unwrap();

        assert_eq!(codec.encode_calls(), 1);
        assert!(!outcome.reached);
        assert_eq!(outcome.note(), "PNG ignores quality, target not reached");
    }

    #[test]
    fn test_lossless_without_budget_has_no_notes() {
        let codec = SyntheticCodec::new(100, 100, 1.0);
        let request = CompressRequest::new(OutputFormat::WebP, Budget::new());
        let outcome = compress(&codec, b"source", &request).unwrap();

        assert!(outcome.reached);
        assert_eq!(outcome.note(), "");
    }

    #[test]
    fn test_decode_failure() {
        let codec = SyntheticCodec::new(10, 10, 1.0);
        let result = compress(&codec, b"corrupt", &jpeg_request(100));
        assert!(matches!(result, Err(CompressError::Decode(_))));
        assert_eq!(codec.encode_calls(), 0);
    }

    #[test]
    fn test_no_output() {
        let codec = SyntheticCodec::new(10, 10, 1.0).failing_from(0);
        let result = compress(&codec, b"source", &jpeg_request(100));
        assert!(matches!(
            result,
            Err(CompressError::NoOutput {
                format: OutputFormat::Jpeg
            })
        ));
    }

    #[test]
    fn test_original_format_falls_back_to_jpeg() {
        // Synthetic sources are not a known container
        let codec = SyntheticCodec::new(10, 10, 1.0);
        let request = CompressRequest::new(FormatChoice::Original, Budget::new());
        let outcome = compress(&codec, b"source", &request).unwrap();
        assert_eq!(outcome.format, OutputFormat::Jpeg);
    }

    #[test]
    fn test_image_codec_keeps_png_source_format() {
        let pixels: Vec<u8> = (0..64 * 48 * 3).map(|i| (i % 251) as u8).collect();
        let png = encode_png(&pixels, 64, 48).unwrap();

        let request = CompressRequest::new(FormatChoice::Original, Budget::new().with_max_width(32));
        let outcome = compress(&ImageCodec, &png, &request).unwrap();

        assert_eq!(outcome.format, OutputFormat::Png);
        assert_eq!(outcome.dimensions, Dimensions::new(32, 24));
        assert!(outcome.notes.is_empty());

        let decoded = ImageCodec.decode(&outcome.into_bytes().unwrap()).unwrap();
        assert_eq!(decoded.dimensions(), Dimensions::new(32, 24));
    }

    #[test]
    fn test_image_codec_jpeg_meets_budget() {
        // Smooth gradient, compresses well
        let (w, h) = (256u32, 192u32);
        let mut pixels = Vec::with_capacity((w * h * 3) as usize);
        for y in 0..h {
            for x in 0..w {
                pixels.extend_from_slice(&[x as u8, y as u8, ((x + y) / 2) as u8]);
            }
        }
        let source = ImageCodec
            .encode(&PixelBuffer::new(w, h, pixels), OutputFormat::Png, 1.0)
            .unwrap();

        let outcome = compress(&ImageCodec, &source, &jpeg_request(20_000)).unwrap();
        assert_eq!(outcome.format, OutputFormat::Jpeg);
        assert!(outcome.reached, "got {} bytes", outcome.size);
        assert!(outcome.size <= 20_000);
        assert_eq!(ImageCodec.detect_format(&outcome.into_bytes().unwrap()), Some(OutputFormat::Jpeg));
    }

    #[test]
    fn test_output_file_name() {
        assert_eq!(
            output_file_name("holiday.png", OutputFormat::Jpeg),
            "holiday-compressed.jpeg"
        );
        assert_eq!(
            output_file_name("scan.v2.tiff", OutputFormat::WebP),
            "scan.v2-compressed.webp"
        );
        assert_eq!(output_file_name("noext", OutputFormat::Png), "noext-compressed.png");
        assert_eq!(output_file_name(".hidden", OutputFormat::Png), ".hidden-compressed.png");
    }
}
