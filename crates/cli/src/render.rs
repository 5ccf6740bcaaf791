//! Output rendering: human-readable lines on a terminal, JSON when piped.

use std::io::{self, IsTerminal};

use batch_label_core::LabelConfig;
use batch_label_preview::PreviewImage;

use crate::station::PrintReport;

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Format {
    /// Plain sentences for people.
    Pretty,
    /// Machine-readable JSON.
    Json,
}

impl Format {
    /// Use the explicit choice, or detect from whether stdout is a TTY.
    pub(crate) fn resolve_or_detect(explicit: Option<&str>) -> Self {
        match explicit {
            Some("json") => Format::Json,
            Some("pretty") => Format::Pretty,
            _ => {
                if io::stdout().is_terminal() {
                    Format::Pretty
                } else {
                    Format::Json
                }
            }
        }
    }
}

pub(crate) fn print_report(report: &PrintReport, format: Format) {
    match format {
        Format::Pretty => {
            println!("{}", report.message());
            match &report.preview {
                Some(image) => println!("preview: {} bytes", image.bytes.len()),
                None => println!("preview: unavailable"),
            }
        }
        Format::Json => {
            let out = serde_json::json!({
                "success": report.is_success(),
                "message": report.message(),
                "sku": report.sku,
                "batch": report.batch,
                "copies": report.copies,
                "preview": report.preview.as_ref().map(PreviewImage::to_data_url),
            });
            println!("{out}");
        }
    }
}

/// Report a preview written to `path`, or print the data URL when no path
/// was given.
pub(crate) fn print_preview(image: &PreviewImage, path: Option<&str>, format: Format) {
    match (format, path) {
        (Format::Pretty, Some(path)) => println!("wrote {} byte preview to {path}", image.bytes.len()),
        (Format::Pretty, None) => println!("{}", image.to_data_url()),
        (Format::Json, _) => {
            let out = serde_json::json!({
                "success": true,
                "bytes": image.bytes.len(),
                "path": path,
                "data_url": path.is_none().then(|| image.to_data_url()),
            });
            println!("{out}");
        }
    }
}

pub(crate) fn print_config(config: &LabelConfig) -> serde_json::Result<()> {
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}
