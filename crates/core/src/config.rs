//! Label and field configuration.
//!
//! A [`LabelConfig`] is built once at startup (from defaults, environment
//! overrides, or a JSON label profile) and is read-only afterwards. Every
//! physical measure is in millimetres; conversion to printer dots happens in
//! [`crate::layout`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Smallest supported resolution: one dot per millimetre after rounding.
pub const MIN_DPI: u32 = 13;

/// Highest print resolution of a real label printer (24 dots per mm).
pub const MAX_DPI: u32 = 600;

/// Errors raised when a configuration cannot describe a printable label.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// JSON deserialization of a label profile failed.
    #[error("invalid label profile JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// Reading a label profile from disk failed.
    #[error("cannot read label profile {path}: {source}")]
    Read {
        /// Path that was attempted.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A value is out of its valid range.
    #[error("invalid {field}: {reason}")]
    InvalidField {
        /// Dotted path of the offending value (e.g. `fields[1].padding.bottom`).
        field: String,
        /// Why the value was rejected.
        reason: String,
    },
}

impl ConfigError {
    fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Physical description of the label stock.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabelSpec {
    /// Label width in millimetres.
    pub width_mm: f64,
    /// Label height in millimetres.
    pub height_mm: f64,
    /// Print resolution in dots per inch.
    pub dpi: u32,
}

impl Default for LabelSpec {
    /// 70 × 36 mm landscape at 203 dpi.
    fn default() -> Self {
        Self {
            width_mm: 70.0,
            height_mm: 36.0,
            dpi: 203,
        }
    }
}

impl LabelSpec {
    /// Width in inches.
    pub fn width_in(&self) -> f64 {
        self.width_mm / MM_PER_INCH
    }

    /// Height in inches.
    pub fn height_in(&self) -> f64 {
        self.height_mm / MM_PER_INCH
    }
}

/// Millimetres per inch.
pub const MM_PER_INCH: f64 = 25.4;

/// Which print job value feeds a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldSource {
    /// The product SKU.
    Sku,
    /// The batch identifier.
    Batch,
}

impl std::fmt::Display for FieldSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldSource::Sku => write!(f, "sku"),
            FieldSource::Batch => write!(f, "batch"),
        }
    }
}

/// Label edge a field is vertically padded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Anchor {
    /// Offset from the top edge by `padding.top`.
    #[default]
    Top,
    /// Offset from the bottom edge by `padding.bottom`.
    Bottom,
}

/// Horizontal justification inside a field box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Justification {
    /// Flush with the left edge of the box.
    #[default]
    Left,
    /// Flush with the right edge of the box.
    Right,
}

impl Justification {
    /// The ZPL `^FB` justification letter.
    pub fn code(self) -> char {
        match self {
            Justification::Left => 'L',
            Justification::Right => 'R',
        }
    }
}

/// Offsets from the label edges, in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Padding {
    /// Distance from the left edge.
    pub left: f64,
    /// Distance from the top edge (top-anchored fields).
    pub top: f64,
    /// Distance from the right edge (wrapped fields).
    pub right: f64,
    /// Distance from the bottom edge (bottom-anchored fields).
    pub bottom: f64,
}

impl Padding {
    /// The same offset on every edge.
    pub fn uniform(mm: f64) -> Self {
        Self {
            left: mm,
            top: mm,
            right: mm,
            bottom: mm,
        }
    }
}

/// Code 128 barcode parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BarcodeSpec {
    /// Narrow bar width in dots (`^BY`, 1..=10).
    pub module_width_dots: u8,
    /// Bar height in millimetres.
    pub height_mm: f64,
    /// Print the human-readable line under the bars.
    #[serde(default = "default_true")]
    pub interpretation_line: bool,
}

fn default_true() -> bool {
    true
}

/// How a field is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldKind {
    /// Plain text starting at the field origin.
    #[default]
    Text,
    /// Text laid into a box spanning the label width between the left and
    /// right paddings, justified inside it.
    WrappedText {
        /// Justification inside the box.
        justification: Justification,
    },
    /// A Code 128 barcode of the source text.
    Barcode(BarcodeSpec),
}

/// One field on the label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// The job value printed by this field.
    pub source: FieldSource,
    /// Drawing mode.
    #[serde(flatten)]
    pub kind: FieldKind,
    /// Vertical anchor edge.
    #[serde(default)]
    pub anchor: Anchor,
    /// Character cell height in millimetres.
    pub char_height_mm: f64,
    /// Character cell width in millimetres.
    pub char_width_mm: f64,
    /// Printer font selector (`^A` font name, `A`-`Z` or `0`-`9`).
    #[serde(default = "default_font")]
    pub font: char,
    /// Edge offsets.
    #[serde(default)]
    pub padding: Padding,
}

fn default_font() -> char {
    '0'
}

impl FieldSpec {
    /// Vertical extent used for anchoring: the bar height for barcodes, the
    /// character height otherwise.
    pub fn extent_mm(&self) -> f64 {
        match self.kind {
            FieldKind::Barcode(bc) => bc.height_mm,
            _ => self.char_height_mm,
        }
    }
}

/// The complete, immutable label configuration: stock plus ordered fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelConfig {
    /// Label stock.
    pub label: LabelSpec,
    /// Fields in drawing order.
    pub fields: Vec<FieldSpec>,
}

impl Default for LabelConfig {
    /// SKU top-left (20 mm tall), batch bottom-right (8 mm tall), 5 mm padding.
    fn default() -> Self {
        Self {
            label: LabelSpec::default(),
            fields: vec![
                FieldSpec {
                    source: FieldSource::Sku,
                    kind: FieldKind::Text,
                    anchor: Anchor::Top,
                    char_height_mm: 20.0,
                    char_width_mm: 10.0,
                    font: '0',
                    padding: Padding::uniform(5.0),
                },
                FieldSpec {
                    source: FieldSource::Batch,
                    kind: FieldKind::WrappedText {
                        justification: Justification::Right,
                    },
                    anchor: Anchor::Bottom,
                    char_height_mm: 8.0,
                    char_width_mm: 6.0,
                    font: '0',
                    padding: Padding::uniform(5.0),
                },
            ],
        }
    }
}

impl LabelConfig {
    /// SKU text, SKU barcode, batch text.
    pub fn with_barcode() -> Self {
        Self {
            label: LabelSpec::default(),
            fields: vec![
                FieldSpec {
                    source: FieldSource::Sku,
                    kind: FieldKind::Text,
                    anchor: Anchor::Top,
                    char_height_mm: 8.0,
                    char_width_mm: 5.0,
                    font: '0',
                    padding: Padding::uniform(4.0),
                },
                FieldSpec {
                    source: FieldSource::Sku,
                    kind: FieldKind::Barcode(BarcodeSpec {
                        module_width_dots: 2,
                        height_mm: 10.0,
                        interpretation_line: false,
                    }),
                    anchor: Anchor::Top,
                    char_height_mm: 3.0,
                    char_width_mm: 2.0,
                    font: '0',
                    padding: Padding {
                        left: 4.0,
                        top: 14.0,
                        right: 4.0,
                        bottom: 0.0,
                    },
                },
                FieldSpec {
                    source: FieldSource::Batch,
                    kind: FieldKind::WrappedText {
                        justification: Justification::Right,
                    },
                    anchor: Anchor::Bottom,
                    char_height_mm: 6.0,
                    char_width_mm: 4.0,
                    font: '0',
                    padding: Padding::uniform(4.0),
                },
            ],
        }
    }

    /// Check every invariant the layout engine relies on.
    ///
    /// A configuration that passes always yields non-negative origins that
    /// lie on the label.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let label = &self.label;

        check_positive("label.width_mm", label.width_mm)?;
        check_positive("label.height_mm", label.height_mm)?;
        if !(MIN_DPI..=MAX_DPI).contains(&label.dpi) {
            return Err(ConfigError::invalid(
                "label.dpi",
                format!("{} is outside {MIN_DPI}..={MAX_DPI} dpi", label.dpi),
            ));
        }

        if self.fields.is_empty() {
            return Err(ConfigError::invalid("fields", "at least one field is required"));
        }

        for (i, field) in self.fields.iter().enumerate() {
            validate_field(label, field, &format!("fields[{i}]"))?;
        }

        Ok(())
    }
}

fn validate_field(label: &LabelSpec, field: &FieldSpec, path: &str) -> Result<(), ConfigError> {
    check_positive(&format!("{path}.char_height_mm"), field.char_height_mm)?;
    check_positive(&format!("{path}.char_width_mm"), field.char_width_mm)?;

    if !(field.font.is_ascii_uppercase() || field.font.is_ascii_digit()) {
        return Err(ConfigError::invalid(
            format!("{path}.font"),
            format!("{:?} is not a printer font name (A-Z, 0-9)", field.font),
        ));
    }

    let p = &field.padding;
    for (edge, value) in [
        ("left", p.left),
        ("top", p.top),
        ("right", p.right),
        ("bottom", p.bottom),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(ConfigError::invalid(
                format!("{path}.padding.{edge}"),
                format!("{value} must be a non-negative length"),
            ));
        }
    }

    if p.left >= label.width_mm {
        return Err(ConfigError::invalid(
            format!("{path}.padding.left"),
            format!("{} mm leaves no room on a {} mm wide label", p.left, label.width_mm),
        ));
    }

    if let FieldKind::Barcode(bc) = field.kind {
        check_positive(&format!("{path}.height_mm"), bc.height_mm)?;
        if !(1..=10).contains(&bc.module_width_dots) {
            return Err(ConfigError::invalid(
                format!("{path}.module_width_dots"),
                format!("{} is outside 1..=10", bc.module_width_dots),
            ));
        }
    }

    let extent = field.extent_mm();
    let used = match field.anchor {
        Anchor::Top => p.top + extent,
        Anchor::Bottom => p.bottom + extent,
    };
    if used > label.height_mm {
        return Err(ConfigError::invalid(
            format!("{path}.padding"),
            format!(
                "field needs {used} mm but the label is {} mm tall",
                label.height_mm
            ),
        ));
    }

    if let FieldKind::WrappedText { .. } = field.kind
        && label.width_mm - p.left - p.right <= 0.0
    {
        return Err(ConfigError::invalid(
            format!("{path}.padding"),
            "left and right padding leave no box width",
        ));
    }

    Ok(())
}

fn check_positive(field: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("{value} must be > 0")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_are_valid() {
        LabelConfig::default().validate().unwrap();
        LabelConfig::with_barcode().validate().unwrap();
    }

    #[test]
    fn zero_width_rejected() {
        let mut cfg = LabelConfig::default();
        cfg.label.width_mm = 0.0;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("label.width_mm"), "{err}");
    }

    #[test]
    fn nan_height_rejected() {
        let mut cfg = LabelConfig::default();
        cfg.label.height_mm = f64::NAN;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn tiny_dpi_rejected() {
        let mut cfg = LabelConfig::default();
        cfg.label.dpi = 12;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("label.dpi"), "{err}");
    }

    #[test]
    fn dpi_above_printer_range_rejected() {
        let mut cfg = LabelConfig::with_barcode();
        cfg.label.dpi = MAX_DPI;
        cfg.validate().unwrap();

        cfg.label.dpi = 1_000_000;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("label.dpi"), "{err}");
    }

    #[test]
    fn empty_fields_rejected() {
        let cfg = LabelConfig {
            label: LabelSpec::default(),
            fields: Vec::new(),
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn lowercase_font_rejected() {
        let mut cfg = LabelConfig::default();
        cfg.fields[0].font = 'a';
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("fields[0].font"), "{err}");
    }

    #[test]
    fn negative_padding_rejected() {
        let mut cfg = LabelConfig::default();
        cfg.fields[1].padding.bottom = -1.0;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("fields[1].padding.bottom"), "{err}");
    }

    #[test]
    fn field_taller_than_label_rejected() {
        let mut cfg = LabelConfig::default();
        cfg.fields[1].char_height_mm = 40.0;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("fields[1].padding"), "{err}");
    }

    #[test]
    fn wrapped_box_without_width_rejected() {
        let mut cfg = LabelConfig::default();
        cfg.fields[1].padding.left = 40.0;
        cfg.fields[1].padding.right = 30.0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn barcode_module_width_out_of_range() {
        let mut cfg = LabelConfig::with_barcode();
        if let FieldKind::Barcode(ref mut bc) = cfg.fields[1].kind {
            bc.module_width_dots = 11;
        }
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("module_width_dots"), "{err}");
    }

    #[test]
    fn label_size_in_inches() {
        let spec = LabelSpec::default();
        assert!((spec.width_in() - 2.7559).abs() < 1e-3);
        assert!((spec.height_in() - 1.4173).abs() < 1e-3);
    }
}
