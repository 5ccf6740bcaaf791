//! ZPL markup generation from a resolved [`Layout`].
//!
//! The output is a single self-terminated document with no whitespace:
//!
//! ```text
//! ^XA
//! ^FO{x},{y}^A{font}N,{h},{w}[^FB{box},1,,{J}]^FD{text}^FS   (text fields)
//! ^FO{x},{y}^BY{module}^BCN,{h},{Y|N},N,N^FD{text}^FS       (barcodes)
//! ^XZ
//! ```
//!
//! Field text is inserted verbatim. Text that would break out of `^FD`
//! (a `^` or `~` prefix, or an ASCII control byte) is rejected rather than
//! escaped.

use std::fmt::Write as _;

use thiserror::Error;

use crate::config::FieldSource;
use crate::job::is_markup_control;
use crate::layout::{Layout, Placement, PlacementKind};

/// Start-of-label marker.
pub const START_MARKER: &str = "^XA";
/// End-of-label marker.
pub const END_MARKER: &str = "^XZ";

/// Reasons a layout cannot be turned into markup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarkupError {
    /// A field has no text.
    #[error("{field} field is empty")]
    EmptyField {
        /// The field's job value.
        field: FieldSource,
    },

    /// A field's text contains a character that collides with ZPL syntax.
    #[error("{field} field contains {ch:?}, which collides with ZPL control syntax")]
    ControlCharacter {
        /// The field's job value.
        field: FieldSource,
        /// The first offending character.
        ch: char,
    },
}

/// Render the markup document for a layout.
///
/// Identical layouts always produce byte-identical documents.
pub fn generate(layout: &Layout) -> Result<String, MarkupError> {
    let mut out = String::with_capacity(32 + layout.placements.len() * 48);
    out.push_str(START_MARKER);
    for placement in &layout.placements {
        check_text(placement)?;
        push_field(&mut out, placement);
    }
    out.push_str(END_MARKER);
    Ok(out)
}

fn check_text(p: &Placement) -> Result<(), MarkupError> {
    if p.text.is_empty() {
        return Err(MarkupError::EmptyField { field: p.source });
    }
    if let Some(ch) = p.text.chars().find(|c| is_markup_control(*c)) {
        return Err(MarkupError::ControlCharacter {
            field: p.source,
            ch,
        });
    }
    Ok(())
}

// Writing into a String cannot fail.
fn push_field(out: &mut String, p: &Placement) {
    let _ = write!(out, "^FO{},{}", p.origin_x, p.origin_y);
    match p.kind {
        PlacementKind::Text => {
            let _ = write!(out, "^A{}N,{},{}", p.font, p.char_height, p.char_width);
        }
        PlacementKind::WrappedText {
            box_width,
            justification,
        } => {
            let _ = write!(
                out,
                "^A{}N,{},{}^FB{},1,,{}",
                p.font,
                p.char_height,
                p.char_width,
                box_width,
                justification.code()
            );
        }
        PlacementKind::Barcode {
            module_width,
            height,
            interpretation_line,
        } => {
            let line = if interpretation_line { 'Y' } else { 'N' };
            let _ = write!(out, "^BY{module_width}^BCN,{height},{line},N,N");
        }
    }
    out.push_str("^FD");
    out.push_str(&p.text);
    out.push_str("^FS");
}
