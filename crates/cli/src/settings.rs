//! Startup configuration: command-line flags backed by environment
//! variables (and a `.env` file, loaded before parsing).
//!
//! Everything here is read once and turned into immutable values; nothing
//! downstream reads the environment again.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use batch_label_core::{FieldKind, FieldSource, LabelConfig, LabelSpec, Padding, load_profile};
use batch_label_preview::{DEFAULT_PREVIEW_URL, PreviewConfig, PreviewStrategy};
use batch_label_print_client::{DEFAULT_PORT, PrinterConfig, PrinterEndpoint, TcpConnector};
use clap::{Args, ValueEnum};

/// Built-in label layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum LayoutPreset {
    /// SKU text on top, right-justified batch at the bottom.
    Plain,
    /// SKU text, Code 128 SKU barcode, batch.
    Barcode,
}

/// Preview strategy names accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum PreviewMode {
    /// Labelary-compatible HTTP service.
    Remote,
    /// In-process rasterizer.
    Local,
}

impl From<PreviewMode> for PreviewStrategy {
    fn from(mode: PreviewMode) -> Self {
        match mode {
            PreviewMode::Remote => PreviewStrategy::Remote,
            PreviewMode::Local => PreviewStrategy::Local,
        }
    }
}

#[derive(Args, Debug, Clone)]
#[command(next_help_heading = "Configuration")]
pub(crate) struct Settings {
    /// Printer host name or IP address.
    #[arg(long, env = "PRINTER_HOST", default_value = "192.168.1.100", global = true)]
    pub(crate) printer_host: String,

    /// Printer raw TCP port.
    #[arg(long, env = "PRINTER_PORT", default_value_t = DEFAULT_PORT, global = true)]
    pub(crate) printer_port: u16,

    /// Connect and write timeout for the printer, in seconds.
    #[arg(long, env = "PRINT_TIMEOUT_SECS", default_value_t = 5, global = true)]
    pub(crate) print_timeout_secs: u64,

    /// Built-in layout. Ignored when a label profile is given.
    #[arg(long, env = "LABEL_LAYOUT", value_enum, default_value_t = LayoutPreset::Plain, global = true)]
    pub(crate) layout: LayoutPreset,

    /// JSON label profile; replaces the built-in layout and every LABEL_*/SKU_*/BATCH_* setting.
    #[arg(long, env = "LABEL_PROFILE", global = true)]
    pub(crate) profile: Option<PathBuf>,

    /// Label width in millimetres.
    #[arg(long, env = "LABEL_WIDTH_MM", default_value_t = 70.0, global = true)]
    pub(crate) label_width_mm: f64,

    /// Label height in millimetres.
    #[arg(long, env = "LABEL_HEIGHT_MM", default_value_t = 36.0, global = true)]
    pub(crate) label_height_mm: f64,

    /// Print resolution in dots per inch.
    #[arg(long, env = "LABEL_DPI", default_value_t = 203, global = true)]
    pub(crate) label_dpi: u32,

    /// Printer font selector for every text field.
    #[arg(long, env = "LABEL_FONT", default_value_t = '0', global = true)]
    pub(crate) label_font: char,

    /// SKU character height in millimetres.
    #[arg(long, env = "SKU_CHAR_HEIGHT_MM", global = true, hide_short_help = true)]
    pub(crate) sku_char_height_mm: Option<f64>,

    /// SKU character width in millimetres.
    #[arg(long, env = "SKU_CHAR_WIDTH_MM", global = true, hide_short_help = true)]
    pub(crate) sku_char_width_mm: Option<f64>,

    /// SKU padding from the left edge in millimetres.
    #[arg(long, env = "SKU_PADDING_LEFT_MM", global = true, hide_short_help = true)]
    pub(crate) sku_padding_left_mm: Option<f64>,

    /// SKU padding from the top edge in millimetres.
    #[arg(long, env = "SKU_PADDING_TOP_MM", global = true, hide_short_help = true)]
    pub(crate) sku_padding_top_mm: Option<f64>,

    /// Batch character height in millimetres.
    #[arg(long, env = "BATCH_CHAR_HEIGHT_MM", global = true, hide_short_help = true)]
    pub(crate) batch_char_height_mm: Option<f64>,

    /// Batch character width in millimetres.
    #[arg(long, env = "BATCH_CHAR_WIDTH_MM", global = true, hide_short_help = true)]
    pub(crate) batch_char_width_mm: Option<f64>,

    /// Padding of the batch field from the left, right and bottom edges.
    #[arg(long, env = "BATCH_PADDING_MM", global = true, hide_short_help = true)]
    pub(crate) batch_padding_mm: Option<f64>,

    /// How previews are produced.
    #[arg(long, env = "PREVIEW_STRATEGY", value_enum, default_value_t = PreviewMode::Remote, global = true)]
    pub(crate) preview_strategy: PreviewMode,

    /// Base URL of the remote preview service.
    #[arg(long, env = "PREVIEW_URL", default_value = DEFAULT_PREVIEW_URL, global = true)]
    pub(crate) preview_url: String,

    /// TrueType font used by the local preview renderer.
    #[arg(long, env = "PREVIEW_FONT", global = true)]
    pub(crate) preview_font: Option<PathBuf>,

    /// Remote preview timeout in seconds.
    #[arg(long, env = "PREVIEW_TIMEOUT_SECS", default_value_t = 5, global = true)]
    pub(crate) preview_timeout_secs: u64,
}

impl Settings {
    /// The validated label configuration.
    pub(crate) fn label_config(&self) -> Result<LabelConfig> {
        if let Some(path) = &self.profile {
            return load_profile(path)
                .with_context(|| format!("failed to load label profile {}", path.display()));
        }

        let mut config = match self.layout {
            LayoutPreset::Plain => LabelConfig::default(),
            LayoutPreset::Barcode => LabelConfig::with_barcode(),
        };
        config.label = LabelSpec {
            width_mm: self.label_width_mm,
            height_mm: self.label_height_mm,
            dpi: self.label_dpi,
        };
        for field in &mut config.fields {
            field.font = self.label_font;
            if matches!(field.kind, FieldKind::Barcode(_)) {
                continue;
            }
            match field.source {
                FieldSource::Sku => {
                    override_with(&mut field.char_height_mm, self.sku_char_height_mm);
                    override_with(&mut field.char_width_mm, self.sku_char_width_mm);
                    override_with(&mut field.padding.left, self.sku_padding_left_mm);
                    override_with(&mut field.padding.top, self.sku_padding_top_mm);
                }
                FieldSource::Batch => {
                    override_with(&mut field.char_height_mm, self.batch_char_height_mm);
                    override_with(&mut field.char_width_mm, self.batch_char_width_mm);
                    if let Some(mm) = self.batch_padding_mm {
                        field.padding = Padding {
                            top: field.padding.top,
                            ..Padding::uniform(mm)
                        };
                    }
                }
            }
        }

        config.validate().context("invalid label configuration")?;
        Ok(config)
    }

    /// The printer connector.
    pub(crate) fn connector(&self) -> TcpConnector {
        let endpoint = PrinterEndpoint::new(self.printer_host.clone(), self.printer_port);
        let config =
            PrinterConfig::default().with_timeout(Duration::from_secs(self.print_timeout_secs));
        TcpConnector::new(endpoint, config)
    }

    /// Preview settings.
    pub(crate) fn preview_config(&self) -> PreviewConfig {
        PreviewConfig {
            strategy: self.preview_strategy.into(),
            remote_url: self.preview_url.clone(),
            font_path: self.preview_font.clone(),
            timeout: Duration::from_secs(self.preview_timeout_secs),
        }
    }
}

fn override_with(slot: &mut f64, value: Option<f64>) {
    if let Some(v) = value {
        *slot = v;
    }
}
