//! HTTP rendering service client (Labelary API shape).

use std::time::Duration;

use batch_label_core::{LabelSpec, RenderedLabel, Resolution};
use reqwest::StatusCode;
use reqwest::header::ACCEPT;
use tracing::{debug, instrument};

use crate::{PreviewError, PreviewImage, PreviewRenderer};

/// Public Labelary endpoint.
pub const DEFAULT_PREVIEW_URL: &str = "http://api.labelary.com";

/// Posts markup to a rendering service and returns the PNG it answers with.
#[derive(Debug, Clone)]
pub struct RemoteRenderer {
    client: reqwest::Client,
    base_url: String,
}

impl RemoteRenderer {
    /// Client for `base_url` with a whole-request timeout. No retries.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, PreviewError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Render URL for a label: density in dots per millimetre, size in inches.
    ///
    /// The density segment is `{dpmm}dpmm` (for example `8dpmm` at 203 dpi),
    /// not the label's raw dpi: Labelary only accepts the `6dpmm`, `8dpmm`,
    /// `12dpmm` and `24dpmm` forms.
    pub fn endpoint(&self, label: &LabelSpec) -> String {
        let dpmm = Resolution::from_dpi(label.dpi).dpmm();
        format!(
            "{}/v1/printers/{dpmm}dpmm/labels/{}x{}/0/",
            self.base_url,
            inches(label.width_in()),
            inches(label.height_in())
        )
    }
}

/// Two decimals, trailing zeros dropped (`2.76`, `4`).
fn inches(value: f64) -> String {
    let s = format!("{value:.2}");
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

impl PreviewRenderer for RemoteRenderer {
    #[instrument(skip_all, fields(url = tracing::field::Empty))]
    async fn render(&self, label: &RenderedLabel) -> Result<PreviewImage, PreviewError> {
        let url = self.endpoint(&label.label);
        tracing::Span::current().record("url", url.as_str());

        let response = self
            .client
            .post(&url)
            .header(ACCEPT, "image/png")
            .body(label.markup.clone())
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(PreviewError::Status(status.as_u16()));
        }
        let bytes = response.bytes().await?;
        debug!(bytes = bytes.len(), "remote preview received");
        Ok(PreviewImage::new(bytes.to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(width_mm: f64, height_mm: f64, dpi: u32) -> LabelSpec {
        LabelSpec {
            width_mm,
            height_mm,
            dpi,
        }
    }

    #[test]
    fn endpoint_for_default_label() {
        let r = RemoteRenderer::new(DEFAULT_PREVIEW_URL, Duration::from_secs(5)).unwrap();
        assert_eq!(
            r.endpoint(&spec(70.0, 36.0, 203)),
            "http://api.labelary.com/v1/printers/8dpmm/labels/2.76x1.42/0/"
        );
    }

    #[test]
    fn endpoint_trims_base_slash_and_whole_inches() {
        let r = RemoteRenderer::new("http://localhost:8080/", Duration::from_secs(1)).unwrap();
        assert_eq!(
            r.endpoint(&spec(101.6, 50.8, 300)),
            "http://localhost:8080/v1/printers/12dpmm/labels/4x2/0/"
        );
    }

    #[test]
    fn inch_formatting() {
        assert_eq!(inches(2.755_905), "2.76");
        assert_eq!(inches(1.5), "1.5");
        assert_eq!(inches(3.0), "3");
    }
}
