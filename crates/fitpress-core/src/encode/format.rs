//! Output format selection.

use std::fmt;
use std::str::FromStr;

use image::ImageFormat;
use serde::{Deserialize, Serialize};

use crate::settings::ConfigError;

/// An encoding the bundled encoder can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Lossy JPEG; honors the quality parameter.
    Jpeg,
    /// Lossless PNG; quality is ignored.
    Png,
    /// WebP. The bundled encoder is lossless, so quality is ignored.
    #[serde(rename = "webp")]
    WebP,
}

impl OutputFormat {
    /// Every supported output format.
    pub const ALL: [OutputFormat; 3] = [OutputFormat::Jpeg, OutputFormat::Png, OutputFormat::WebP];

    /// Whether the quality parameter changes the encoder's output.
    #[inline]
    pub fn honors_quality(self) -> bool {
        matches!(self, OutputFormat::Jpeg)
    }

    /// MIME type, e.g. `image/jpeg`.
    pub fn mime_type(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Png => "image/png",
            OutputFormat::WebP => "image/webp",
        }
    }

    /// File extension without the leading dot (the MIME subtype).
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpeg",
            OutputFormat::Png => "png",
            OutputFormat::WebP => "webp",
        }
    }

    /// Map a sniffed container onto an encodable format, if there is one.
    pub fn from_image_format(format: ImageFormat) -> Option<Self> {
        match format {
            ImageFormat::Jpeg => Some(OutputFormat::Jpeg),
            ImageFormat::Png => Some(OutputFormat::Png),
            ImageFormat::WebP => Some(OutputFormat::WebP),
            _ => None,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OutputFormat::Jpeg => "JPEG",
            OutputFormat::Png => "PNG",
            OutputFormat::WebP => "WebP",
        })
    }
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    /// Accepts MIME types (`image/png`) and short names (`png`, `jpg`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let name = lower.strip_prefix("image/").unwrap_or(&lower);
        match name {
            "jpeg" | "jpg" => Ok(OutputFormat::Jpeg),
            "png" => Ok(OutputFormat::Png),
            "webp" => Ok(OutputFormat::WebP),
            _ => Err(ConfigError::UnknownFormat(s.to_string())),
        }
    }
}

/// Which format a compression run should produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FormatChoice {
    /// Keep the source's format when it can be encoded, otherwise JPEG.
    #[default]
    Original,
    /// Always produce this format.
    Fixed(OutputFormat),
}

impl FormatChoice {
    /// Pick the concrete output format given the sniffed source format.
    pub fn resolve(self, source: Option<OutputFormat>) -> OutputFormat {
        match self {
            FormatChoice::Fixed(format) => format,
            FormatChoice::Original => source.unwrap_or(OutputFormat::Jpeg),
        }
    }
}

impl From<OutputFormat> for FormatChoice {
    fn from(format: OutputFormat) -> Self {
        FormatChoice::Fixed(format)
    }
}

impl FromStr for FormatChoice {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("original") {
            Ok(FormatChoice::Original)
        } else {
            s.parse().map(FormatChoice::Fixed)
        }
    }
}

impl TryFrom<String> for FormatChoice {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FormatChoice> for String {
    fn from(choice: FormatChoice) -> Self {
        match choice {
            FormatChoice::Original => "original".to_string(),
            FormatChoice::Fixed(format) => format.mime_type().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_jpeg_honors_quality() {
        assert!(OutputFormat::Jpeg.honors_quality());
        assert!(!OutputFormat::Png.honors_quality());
        assert!(!OutputFormat::WebP.honors_quality());
    }

    #[test]
    fn test_parse_mime_and_short_names() {
        assert_eq!("image/jpeg".parse::<OutputFormat>().unwrap(), OutputFormat::Jpeg);
        assert_eq!("JPG".parse::<OutputFormat>().unwrap(), OutputFormat::Jpeg);
        assert_eq!(" png ".parse::<OutputFormat>().unwrap(), OutputFormat::Png);
        assert_eq!("image/webp".parse::<OutputFormat>().unwrap(), OutputFormat::WebP);
        assert!(matches!(
            "image/gif".parse::<OutputFormat>(),
            Err(ConfigError::UnknownFormat(_))
        ));
    }

    #[test]
    fn test_mime_round_trip() {
        for format in OutputFormat::ALL {
            assert_eq!(format.mime_type().parse::<OutputFormat>().unwrap(), format);
        }
    }

    #[test]
    fn test_from_image_format() {
        assert_eq!(
            OutputFormat::from_image_format(ImageFormat::Png),
            Some(OutputFormat::Png)
        );
        assert_eq!(OutputFormat::from_image_format(ImageFormat::Gif), None);
    }

    #[test]
    fn test_format_choice_resolve() {
        assert_eq!(
            FormatChoice::Original.resolve(Some(OutputFormat::Png)),
            OutputFormat::Png
        );
        assert_eq!(FormatChoice::Original.resolve(None), OutputFormat::Jpeg);
        assert_eq!(
            FormatChoice::Fixed(OutputFormat::WebP).resolve(Some(OutputFormat::Png)),
            OutputFormat::WebP
        );
    }

    #[test]
    fn test_format_choice_parse() {
        assert_eq!("Original".parse::<FormatChoice>().unwrap(), FormatChoice::Original);
        assert_eq!(
            "image/png".parse::<FormatChoice>().unwrap(),
            FormatChoice::Fixed(OutputFormat::Png)
        );
        assert!("bmp".parse::<FormatChoice>().is_err());
    }

    #[test]
    fn test_display_names() {
        assert_eq!(OutputFormat::Png.to_string(), "PNG");
        assert_eq!(OutputFormat::WebP.to_string(), "WebP");
    }
}
