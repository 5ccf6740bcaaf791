//! Layout engine: millimetre configuration to device-space placements.
//!
//! Dots-per-millimetre is rounded to the nearest whole dot (203 dpi gives 8),
//! and every millimetre quantity is converted with [`Resolution::dots`], which
//! rounds to the nearest dot. Compound offsets (for example the distance of a
//! bottom-anchored field from the top edge) are computed in millimetres first
//! and rounded once.
//!
//! Nothing is clipped: text that overflows its box is left to the printer or
//! renderer.

use serde::Serialize;

use crate::config::{Anchor, FieldKind, FieldSource, FieldSpec, Justification, LabelConfig};
use crate::config::MM_PER_INCH;
use crate::job::PrintJob;

/// Device resolution expressed in whole dots per millimetre.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Resolution {
    dpmm: u32,
}

impl Resolution {
    /// Derive the resolution from dots per inch.
    pub fn from_dpi(dpi: u32) -> Self {
        Self {
            dpmm: (f64::from(dpi) / MM_PER_INCH).round() as u32,
        }
    }

    /// Dots per millimetre.
    pub fn dpmm(self) -> u32 {
        self.dpmm
    }

    /// Convert a length in millimetres to the nearest whole dot. Negative
    /// lengths clamp to zero.
    pub fn dots(self, mm: f64) -> u32 {
        (mm * f64::from(self.dpmm)).round().max(0.0) as u32
    }
}

/// Kind-specific geometry of a placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlacementKind {
    /// Text at the origin.
    Text,
    /// Text inside a single-line box starting at the origin.
    WrappedText {
        /// Box width in dots.
        box_width: u32,
        /// Justification inside the box.
        justification: Justification,
    },
    /// Code 128 barcode at the origin.
    Barcode {
        /// Narrow bar width in dots.
        module_width: u32,
        /// Bar height in dots.
        height: u32,
        /// Human-readable line under the bars.
        interpretation_line: bool,
    },
}

/// One field resolved to device coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Placement {
    /// Which job value this field prints.
    pub source: FieldSource,
    /// The literal text.
    pub text: String,
    /// Left edge in dots.
    pub origin_x: u32,
    /// Top edge in dots.
    pub origin_y: u32,
    /// Character cell height in dots.
    pub char_height: u32,
    /// Character cell width in dots.
    pub char_width: u32,
    /// Printer font selector.
    pub font: char,
    /// Kind-specific geometry.
    #[serde(flatten)]
    pub kind: PlacementKind,
}

/// A label resolved to device space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Layout {
    /// Label width in dots.
    pub width_dots: u32,
    /// Label height in dots.
    pub height_dots: u32,
    /// Resolution used for every conversion.
    pub resolution: Resolution,
    /// Fields in drawing order.
    pub placements: Vec<Placement>,
}

/// Compute placements for every configured field.
///
/// Pure: the same configuration and job always yield the same layout. The
/// configuration is assumed to have passed [`LabelConfig::validate`].
pub fn layout(config: &LabelConfig, job: &PrintJob) -> Layout {
    let res = Resolution::from_dpi(config.label.dpi);
    let placements = config
        .fields
        .iter()
        .map(|field| place(config, res, field, job.text(field.source)))
        .collect();

    Layout {
        width_dots: res.dots(config.label.width_mm),
        height_dots: res.dots(config.label.height_mm),
        resolution: res,
        placements,
    }
}

fn place(config: &LabelConfig, res: Resolution, field: &FieldSpec, text: &str) -> Placement {
    let label = &config.label;
    let pad = &field.padding;

    let origin_y = match field.anchor {
        Anchor::Top => res.dots(pad.top),
        Anchor::Bottom => res.dots(label.height_mm - field.extent_mm() - pad.bottom),
    };

    let kind = match field.kind {
        FieldKind::Text => PlacementKind::Text,
        FieldKind::WrappedText { justification } => PlacementKind::WrappedText {
            box_width: res.dots(label.width_mm - pad.left - pad.right),
            justification,
        },
        FieldKind::Barcode(bc) => PlacementKind::Barcode {
            module_width: u32::from(bc.module_width_dots),
            height: res.dots(bc.height_mm),
            interpretation_line: bc.interpretation_line,
        },
    };

    Placement {
        source: field.source,
        text: text.to_string(),
        origin_x: res.dots(pad.left),
        origin_y,
        char_height: res.dots(field.char_height_mm),
        char_width: res.dots(field.char_width_mm),
        font: field.font,
        kind,
    }
}
