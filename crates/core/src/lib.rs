//! Batch label core library.
//!
//! Maps a [`PrintJob`] (SKU, batch, copies) and an immutable
//! [`LabelConfig`] to device-space placements ([`layout`]) and a ZPL
//! document ([`generate`]). Everything here is pure: no I/O beyond profile
//! loading, no global state.

#![warn(missing_docs)]

/// Label, field, and barcode configuration types.
pub mod config;
/// Print job values and input validation.
pub mod job;
/// Millimetre to dot layout engine.
pub mod layout;
/// ZPL document generation.
pub mod markup;
/// JSON label profiles.
pub mod profile;

// ── Convenience re-exports ──────────────────────────────────────────────────

pub use config::{
    Anchor, BarcodeSpec, ConfigError, FieldKind, FieldSource, FieldSpec, Justification,
    LabelConfig, LabelSpec, Padding,
};
pub use job::{JobError, MAX_COPIES, PrintJob};
pub use layout::{Layout, Placement, PlacementKind, Resolution, layout};
pub use markup::{END_MARKER, MarkupError, START_MARKER, generate};
pub use profile::{load_profile, load_profile_from_str};

/// A label ready for transmission or preview: the stock it targets, the
/// resolved layout, and the markup document.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedLabel {
    /// Physical label stock.
    pub label: LabelSpec,
    /// Device-space placements.
    pub layout: Layout,
    /// The ZPL document (one copy).
    pub markup: String,
}

/// Lay out and generate markup for one job.
pub fn render_label(config: &LabelConfig, job: &PrintJob) -> Result<RenderedLabel, MarkupError> {
    let layout = layout(config, job);
    let markup = generate(&layout)?;
    Ok(RenderedLabel {
        label: config.label,
        layout,
        markup,
    })
}
