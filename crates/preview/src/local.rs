//! In-process rasterizer: draws a [`Layout`] onto a white 8-bit canvas.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use batch_label_core::{Justification, Layout, Placement, PlacementKind, RenderedLabel};
use image::{GrayImage, ImageFormat, Luma};
use rusttype::{Font, Scale, point};
use tracing::{debug, instrument};

use crate::code128;
use crate::{PreviewError, PreviewImage, PreviewRenderer};

const WHITE: Luma<u8> = Luma([255]);
const BLACK: Luma<u8> = Luma([0]);

/// Coverage above which a glyph pixel is inked. Labels are 1-bit.
const INK_THRESHOLD: f32 = 0.5;

/// Largest canvas the renderer will allocate, in pixels. A 600 dpi label
/// 250 mm on a side stays well inside it.
const MAX_CANVAS_PIXELS: u64 = 64 * 1024 * 1024;

/// Gap between barcode bars and the interpretation line, in dots.
const INTERPRETATION_GAP: u32 = 4;

/// Rasterizes labels locally with a TrueType font.
///
/// The printer's own fonts are not available here, so text is drawn with the
/// loaded font scaled to each field's character cell. Rendering is blocking
/// and runs on tokio's blocking pool.
#[derive(Clone, Default)]
pub struct LocalRenderer {
    font: Option<Arc<Font<'static>>>,
}

impl fmt::Debug for LocalRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalRenderer")
            .field("font_loaded", &self.font.is_some())
            .finish()
    }
}

impl LocalRenderer {
    /// A renderer with no font. Only barcode-only layouts can be drawn.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a TrueType/OpenType font from disk.
    pub fn from_font_file(path: &Path) -> Result<Self, PreviewError> {
        let bytes = std::fs::read(path)?;
        Self::from_font_bytes(bytes).map_err(|_| PreviewError::Font(path.display().to_string()))
    }

    /// Use an in-memory font.
    pub fn from_font_bytes(bytes: Vec<u8>) -> Result<Self, PreviewError> {
        let font = Font::try_from_vec(bytes).ok_or_else(|| PreviewError::Font("<memory>".into()))?;
        Ok(Self {
            font: Some(Arc::new(font)),
        })
    }

    /// `true` when text fields can be drawn.
    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }
}

impl PreviewRenderer for LocalRenderer {
    #[instrument(skip_all, fields(w = label.layout.width_dots, h = label.layout.height_dots))]
    async fn render(&self, label: &RenderedLabel) -> Result<PreviewImage, PreviewError> {
        let layout = label.layout.clone();
        let font = self.font.as_ref().map(Arc::clone);
        let bytes =
            tokio::task::spawn_blocking(move || rasterize(&layout, font.as_deref()).and_then(encode_png))
                .await??;
        debug!(bytes = bytes.len(), "local preview rendered");
        Ok(PreviewImage::new(bytes))
    }
}

// ── Rasterization ──────────────────────────────────────────────────────

fn rasterize(layout: &Layout, font: Option<&Font<'static>>) -> Result<GrayImage, PreviewError> {
    let (w, h) = (layout.width_dots.max(1), layout.height_dots.max(1));
    if u64::from(w) * u64::from(h) > MAX_CANVAS_PIXELS {
        return Err(PreviewError::Raster(format!(
            "{w}x{h} dot canvas exceeds the {MAX_CANVAS_PIXELS} pixel preview budget"
        )));
    }
    let mut canvas = GrayImage::from_pixel(w, h, WHITE);
    for p in &layout.placements {
        match p.kind {
            PlacementKind::Text => {
                let font = font.ok_or(PreviewError::FontUnavailable)?;
                draw_text(&mut canvas, font, p, p.origin_x, p.origin_y);
            }
            PlacementKind::WrappedText {
                box_width,
                justification,
            } => {
                let font = font.ok_or(PreviewError::FontUnavailable)?;
                let x = match justification {
                    Justification::Left => p.origin_x,
                    Justification::Right => {
                        let w = text_width(font, &p.text, scale(p));
                        (p.origin_x + box_width).saturating_sub(w)
                    }
                };
                draw_text(&mut canvas, font, p, x, p.origin_y);
            }
            PlacementKind::Barcode {
                module_width,
                height,
                interpretation_line,
            } => {
                let width = draw_barcode(&mut canvas, p, module_width, height)?;
                // The human-readable line is decoration; without a font it is omitted.
                if interpretation_line && let Some(font) = font {
                    let text_w = text_width(font, &p.text, scale(p));
                    let x = p.origin_x + width.saturating_sub(text_w) / 2;
                    draw_text(&mut canvas, font, p, x, p.origin_y + height + INTERPRETATION_GAP);
                }
            }
        }
    }
    Ok(canvas)
}

/// Scale a placement's character cell to font units. Printer fonts are
/// roughly half as wide as they are tall at equal nominal size.
fn scale(p: &Placement) -> Scale {
    Scale {
        x: 2.0 * p.char_width as f32,
        y: p.char_height as f32,
    }
}

fn text_width(font: &Font<'_>, text: &str, scale: Scale) -> u32 {
    font.layout(text, scale, point(0.0, 0.0))
        .last()
        .map_or(0.0, |g| g.position().x + g.unpositioned().h_metrics().advance_width)
        .ceil() as u32
}

fn draw_text(canvas: &mut GrayImage, font: &Font<'_>, p: &Placement, x: u32, y: u32) {
    let scale = scale(p);
    let ascent = font.v_metrics(scale).ascent;
    let (w, h) = canvas.dimensions();
    for glyph in font.layout(&p.text, scale, point(x as f32, y as f32 + ascent)) {
        let Some(bb) = glyph.pixel_bounding_box() else {
            continue;
        };
        glyph.draw(|gx, gy, coverage| {
            if coverage < INK_THRESHOLD {
                return;
            }
            let px = bb.min.x + gx as i32;
            let py = bb.min.y + gy as i32;
            if px >= 0 && py >= 0 && (px as u32) < w && (py as u32) < h {
                canvas.put_pixel(px as u32, py as u32, BLACK);
            }
        });
    }
}

/// Draw Code 128 bars at the placement origin; returns the drawn width.
fn draw_barcode(
    canvas: &mut GrayImage,
    p: &Placement,
    module_width: u32,
    height: u32,
) -> Result<u32, PreviewError> {
    let widths = code128::modules(&p.text)
        .map_err(|ch| PreviewError::Raster(format!("{ch:?} cannot be encoded in Code 128")))?;
    let (w, h) = canvas.dimensions();
    let mut x = p.origin_x;
    for (i, modules) in widths.iter().enumerate() {
        let run = u32::from(*modules) * module_width;
        if i % 2 == 0 {
            for px in x..(x + run).min(w) {
                for py in p.origin_y..(p.origin_y + height).min(h) {
                    canvas.put_pixel(px, py, BLACK);
                }
            }
        }
        x += run;
    }
    Ok(code128::total_modules(&widths) * module_width)
}

/// Encode through a temporary file; it is removed when dropped, on every path.
fn encode_png(canvas: GrayImage) -> Result<Vec<u8>, PreviewError> {
    let file = tempfile::Builder::new()
        .prefix("label-preview-")
        .suffix(".png")
        .tempfile()?;
    canvas.save_with_format(file.path(), ImageFormat::Png)?;
    Ok(std::fs::read(file.path())?)
}
