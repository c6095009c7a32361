use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use fitpress_core::batch::{BatchController, ItemStatus};
use fitpress_core::{
    format_bytes, FilterType, FormatChoice, ImageCodec, Settings, TargetSize, DEFAULT_MAX_QUALITY,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "fitpress")]
#[command(about = "Compress images to fit a file size and dimension budget")]
struct Cli {
    /// Images to compress (JPEG, PNG or WebP)
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Output format: original, jpeg, png or webp
    #[arg(short, long, default_value = "original")]
    format: FormatChoice,

    /// Target size per file, e.g. 500KB, 1.5MB, 800KiB (bare numbers are KB)
    #[arg(short, long)]
    target: Option<TargetSize>,

    /// Maximum output width in pixels
    #[arg(long)]
    max_width: Option<u32>,

    /// Maximum output height in pixels
    #[arg(long)]
    max_height: Option<u32>,

    /// Highest quality the search may use, in (0, 1]
    #[arg(short = 'q', long, default_value_t = DEFAULT_MAX_QUALITY)]
    max_quality: f32,

    /// Resampling filter: nearest, bilinear or lanczos3
    #[arg(long, default_value = "bilinear", value_parser = parse_filter)]
    filter: FilterType,

    /// Directory for compressed files (defaults to each source's directory)
    #[arg(short, long)]
    out_dir: Option<PathBuf>,
}

fn parse_filter(value: &str) -> Result<FilterType, String> {
    match value.to_ascii_lowercase().as_str() {
        "nearest" => Ok(FilterType::Nearest),
        "bilinear" => Ok(FilterType::Bilinear),
        "lanczos3" | "lanczos" => Ok(FilterType::Lanczos3),
        other => Err(format!("unknown filter {other:?}")),
    }
}

impl Cli {
    fn settings(&self) -> Settings {
        Settings {
            format: self.format,
            target_size: self.target.map(|t| t.amount),
            target_unit: self.target.map(|t| t.unit).unwrap_or_default(),
            max_width: self.max_width,
            max_height: self.max_height,
            max_quality: Some(self.max_quality),
            filter: self.filter,
        }
    }

    fn output_dir<'a>(&'a self, source: &'a Path) -> &'a Path {
        self.out_dir
            .as_deref()
            .or_else(|| source.parent())
            .unwrap_or_else(|| Path::new("."))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fitpress=warn,fitpress_core=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    let request = cli.settings().to_request()?;
    if let Some(dir) = &cli.out_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }

    let controller = BatchController::new(ImageCodec, request);
    let mut sources = Vec::with_capacity(cli.files.len());
    for path in &cli.files {
        let bytes =
            std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let id = controller.add(name, bytes).await;
        sources.push((id, path));
    }

    controller.compress_all().await;

    let mut failures = 0;
    for (id, path) in sources {
        let Some(item) = controller.item(id).await else {
            continue;
        };

        match (item.status, &item.outcome) {
            (ItemStatus::Done, Some(outcome)) => {
                let name = item.output_name().unwrap_or_else(|| item.name.clone());
                let out_path = cli.output_dir(path).join(&name);
                let bytes = outcome.bytes.as_deref().unwrap_or_default();
                std::fs::write(&out_path, bytes)
                    .with_context(|| format!("Failed to write {}", out_path.display()))?;

                let saved = item
                    .saved_percent()
                    .map(|p| format!(" | Saved: {p:.1}%"))
                    .unwrap_or_default();
                let note = outcome.note();
                let note = if note.is_empty() {
                    String::new()
                } else {
                    format!(" ({note})")
                };
                println!(
                    "{} -> {} | {} -> {} | {}{}{}",
                    item.name,
                    out_path.display(),
                    format_bytes(item.original_size()),
                    format_bytes(outcome.size as u64),
                    outcome.dimensions,
                    saved,
                    note
                );
            }
            _ => {
                failures += 1;
                eprintln!(
                    "{}: {}",
                    item.name,
                    item.error.as_deref().unwrap_or("not compressed")
                );
            }
        }
    }

    let summary = controller.summary().await;
    println!(
        "Total: {} -> {} | {}",
        format_bytes(summary.total_original),
        format_bytes(summary.total_output),
        summary
    );

    if failures > 0 {
        anyhow::bail!("{failures} file(s) failed to compress");
    }
    Ok(())
}
