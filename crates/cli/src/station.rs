//! The request boundary: one print station bound to a fixed label
//! configuration, printer, and preview strategy.
//!
//! Nothing returned from here is an error. Print failures become a
//! [`PrintOutcome::Failed`] report and preview failures become `None`.

use std::sync::Arc;

use batch_label_core::{LabelConfig, MarkupError, PrintJob, RenderedLabel, render_label};
use batch_label_preview::{PreviewImage, PreviewRenderer};
use batch_label_print_client::{Connector, print_document};
use tracing::{info, instrument, warn};

/// Whether the document reached the printer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PrintOutcome {
    Sent,
    Failed(String),
}

/// What a print request produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PrintReport {
    pub(crate) sku: String,
    pub(crate) batch: String,
    pub(crate) copies: u32,
    pub(crate) outcome: PrintOutcome,
    pub(crate) preview: Option<PreviewImage>,
}

impl PrintReport {
    pub(crate) fn is_success(&self) -> bool {
        self.outcome == PrintOutcome::Sent
    }

    /// User-facing confirmation or failure line.
    pub(crate) fn message(&self) -> String {
        match &self.outcome {
            PrintOutcome::Sent => format!(
                "Sent {} label(s) for SKU {}, batch {}",
                self.copies, self.sku, self.batch
            ),
            PrintOutcome::Failed(reason) => format!("Print failed: {reason}"),
        }
    }
}

pub(crate) struct Station<C, P> {
    config: LabelConfig,
    connector: Arc<C>,
    previewer: P,
}

impl<C, P> Station<C, P>
where
    C: Connector + 'static,
    P: PreviewRenderer,
{
    pub(crate) fn new(config: LabelConfig, connector: C, previewer: P) -> Self {
        Self {
            config,
            connector: Arc::new(connector),
            previewer,
        }
    }

    /// Lay out the job and generate its markup.
    pub(crate) fn render(&self, job: &PrintJob) -> Result<RenderedLabel, MarkupError> {
        render_label(&self.config, job)
    }

    /// Best-effort preview of the job's label.
    pub(crate) async fn preview(&self, job: &PrintJob) -> Option<PreviewImage> {
        let label = self.render(job).ok()?;
        self.previewer.preview(&label).await
    }

    /// Send the job to the printer, previewing it at the same time.
    #[instrument(skip_all, fields(sku = job.sku(), batch = job.batch(), copies = job.copies()))]
    pub(crate) async fn print(&self, job: &PrintJob) -> PrintReport {
        let mut report = PrintReport {
            sku: job.sku().to_string(),
            batch: job.batch().to_string(),
            copies: job.copies(),
            outcome: PrintOutcome::Sent,
            preview: None,
        };

        let label = match self.render(job) {
            Ok(label) => label,
            Err(e) => {
                warn!(error = %e, "label could not be rendered");
                report.outcome = PrintOutcome::Failed(e.to_string());
                return report;
            }
        };

        let connector = Arc::clone(&self.connector);
        let markup = label.markup.clone();
        let copies = job.copies();
        let transmit =
            tokio::task::spawn_blocking(move || print_document(connector.as_ref(), &markup, copies));

        let (sent, preview) = tokio::join!(transmit, self.previewer.preview(&label));
        report.preview = preview;
        report.outcome = match sent {
            Ok(Ok(_)) => PrintOutcome::Sent,
            Ok(Err(e)) => PrintOutcome::Failed(e.to_string()),
            Err(e) => PrintOutcome::Failed(format!("print task failed: {e}")),
        };
        info!(success = report.is_success(), "print request finished");
        report
    }
}
