//! Label preview rendering.
//!
//! Two interchangeable strategies turn a [`RenderedLabel`] into a PNG:
//! [`LocalRenderer`] rasterizes the layout in-process, [`RemoteRenderer`]
//! posts the markup to a Labelary-compatible HTTP service. [`Previewer`]
//! picks one from configuration.
//!
//! Previews are decorative. [`PreviewRenderer::preview`] logs and swallows
//! every failure so callers only ever see "an image" or "no image".

pub mod code128;
mod local;
mod remote;

use std::path::PathBuf;
use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use batch_label_core::RenderedLabel;
use serde::{Deserialize, Serialize};
use tracing::warn;

pub use local::LocalRenderer;
pub use remote::{DEFAULT_PREVIEW_URL, RemoteRenderer};

/// An encoded PNG preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewImage {
    /// PNG bytes.
    pub bytes: Vec<u8>,
}

impl PreviewImage {
    /// Wrap already-encoded PNG bytes.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// `data:image/png;base64,...` form for embedding in a page.
    pub fn to_data_url(&self) -> String {
        format!("data:image/png;base64,{}", STANDARD.encode(&self.bytes))
    }
}

/// Why a preview could not be produced.
#[derive(Debug, thiserror::Error)]
pub enum PreviewError {
    /// The layout has text but no font was loaded.
    #[error("no font loaded for local text rendering")]
    FontUnavailable,

    /// The font file could not be parsed.
    #[error("invalid font data in {0}")]
    Font(String),

    /// A barcode could not be drawn or the image could not be encoded.
    #[error("rasterization failed: {0}")]
    Raster(String),

    /// Temporary file or font file I/O failed.
    #[error("preview I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The blocking render task panicked or was cancelled.
    #[error("preview task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// The HTTP request failed (connect, timeout, body).
    #[error("preview request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The rendering service answered with a non-200 status.
    #[error("preview service returned status {0}")]
    Status(u16),
}

impl From<image::ImageError> for PreviewError {
    fn from(e: image::ImageError) -> Self {
        Self::Raster(e.to_string())
    }
}

/// A preview strategy.
#[allow(async_fn_in_trait)]
pub trait PreviewRenderer {
    /// Render a PNG for the label.
    async fn render(&self, label: &RenderedLabel) -> Result<PreviewImage, PreviewError>;

    /// Render a PNG, degrading any failure to `None`.
    async fn preview(&self, label: &RenderedLabel) -> Option<PreviewImage> {
        match self.render(label).await {
            Ok(image) => Some(image),
            Err(e) => {
                warn!(error = %e, "label preview unavailable");
                None
            }
        }
    }
}

// ── Configuration ───────────────────────────────────────────────────────

/// Which preview strategy to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreviewStrategy {
    /// Post the markup to an HTTP rendering service.
    #[default]
    Remote,
    /// Rasterize in-process.
    Local,
}

/// Preview settings, read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewConfig {
    /// Strategy to build.
    pub strategy: PreviewStrategy,
    /// Base URL of the rendering service.
    pub remote_url: String,
    /// TrueType font for local text rendering.
    pub font_path: Option<PathBuf>,
    /// Request timeout for the remote strategy.
    pub timeout: Duration,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            strategy: PreviewStrategy::default(),
            remote_url: DEFAULT_PREVIEW_URL.to_string(),
            font_path: None,
            timeout: Duration::from_secs(5),
        }
    }
}

/// The configured preview strategy.
#[derive(Debug, Clone)]
pub enum Previewer {
    /// In-process rasterizer.
    Local(LocalRenderer),
    /// HTTP rendering service.
    Remote(RemoteRenderer),
}

impl Previewer {
    /// Build the strategy named by `config`.
    ///
    /// A local renderer without a usable font still builds; it previews
    /// barcode-only layouts and reports [`PreviewError::FontUnavailable`]
    /// for text. A font path that exists but cannot be read or parsed is an
    /// error.
    pub fn from_config(config: &PreviewConfig) -> Result<Self, PreviewError> {
        Ok(match config.strategy {
            PreviewStrategy::Local => {
                let renderer = match &config.font_path {
                    Some(path) => LocalRenderer::from_font_file(path)?,
                    None => LocalRenderer::new(),
                };
                if !renderer.has_font() {
                    warn!("no preview font configured; only barcode-only labels can be previewed");
                }
                Self::Local(renderer)
            }
            PreviewStrategy::Remote => {
                Self::Remote(RemoteRenderer::new(&config.remote_url, config.timeout)?)
            }
        })
    }
}

impl PreviewRenderer for Previewer {
    async fn render(&self, label: &RenderedLabel) -> Result<PreviewImage, PreviewError> {
        match self {
            Self::Local(r) => r.render(label).await,
            Self::Remote(r) => r.render(label).await,
        }
    }
}
