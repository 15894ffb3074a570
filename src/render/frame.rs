use crate::foundation::core::Canvas;
use crate::render::glyph;

/// Separator between the art column and an overlay line.
const OVERLAY_SEPARATOR: &str = "   ";

/// Per-frame rendering options shared by every worker.
#[derive(Clone, Copy, Debug)]
pub struct RenderOpts {
    /// Target width in characters.
    pub width: usize,
    /// Target height in characters.
    pub height: usize,
    /// Emit true-color escapes around each glyph.
    pub color: bool,
    /// Sensitivity multiplier applied to every luminance threshold.
    pub multiplier: f32,
    /// Blank lines before the first overlay line.
    pub overlay_offset: usize,
}

/// Render one composed canvas to ordered text lines.
///
/// Produces `max(opts.height, overlay.len() + opts.overlay_offset)` lines.
/// Rows within the image height sample the canvas with nearest-neighbor
/// scaling and map each pixel through the glyph ramp; rows past the image are
/// blank-padded to the image width. Rows whose index (minus the overlay
/// offset) falls within the overlay get the corresponding overlay line
/// appended after a fixed separator, producing the side-by-side
/// art-plus-info layout.
pub fn render_frame(canvas: &Canvas, opts: &RenderOpts, overlay: &[String]) -> Vec<String> {
    let total_height = opts.height.max(overlay.len() + opts.overlay_offset);
    let src_w = canvas.width() as usize;
    let src_h = canvas.height() as usize;
    let scale_x = src_w as f64 / opts.width as f64;
    let scale_y = src_h as f64 / opts.height as f64;

    let mut lines = Vec::with_capacity(total_height);
    let mut line = String::new();

    for y in 0..total_height {
        line.clear();

        if y < opts.height {
            let py = ((y as f64 * scale_y) as usize).min(src_h.saturating_sub(1));
            for x in 0..opts.width {
                let px = ((x as f64 * scale_x) as usize).min(src_w.saturating_sub(1));
                let pixel = canvas.pixel(px as u32, py as u32);
                glyph::write_pixel(&mut line, pixel, opts.multiplier, opts.color);
            }
        } else {
            for _ in 0..opts.width {
                line.push(' ');
            }
        }

        if let Some(overlay_idx) = y.checked_sub(opts.overlay_offset)
            && let Some(text) = overlay.get(overlay_idx)
        {
            line.push_str(OVERLAY_SEPARATOR);
            line.push_str(text);
        }

        lines.push(line.clone());
    }

    lines
}
