use crate::assets::decode::{Disposal, RawFrame};
use crate::compose::blend;
use crate::foundation::core::{Canvas, PixelRect};

/// Sequential frame compositor.
///
/// Walks the animation's raw frames in order and maintains the cumulative
/// visible picture, applying each frame's disposal method *before* the next
/// frame is drawn. The canvas after frame `i` depends only on frames
/// `0..=i`, never on later ones, so the sequence of composed canvases can be
/// snapshotted and rendered out of order downstream.
///
/// Must not be driven from more than one thread: the current canvas and the
/// restore snapshot are a single chain of mutable state.
pub struct Compositor {
    canvas: Canvas,
    snapshot: Canvas,
    last_disposal: Disposal,
    last_rect: PixelRect,
}

impl Compositor {
    /// Compositor over a fully transparent canvas of the animation's
    /// logical size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            canvas: Canvas::new(width, height),
            snapshot: Canvas::new(width, height),
            last_disposal: Disposal::Keep,
            last_rect: PixelRect::default(),
        }
    }

    /// Composite the next frame and return the resulting full canvas.
    ///
    /// Order of operations:
    /// 1. Dispose of the previous frame's effect per its recorded tag:
    ///    `Previous` restores the snapshot, `Keep` leaves the canvas as-is,
    ///    anything else clears the previous frame's rectangle.
    /// 2. If this frame is itself `Previous`-tagged, snapshot the canvas so
    ///    step 1 can restore it at the next call.
    /// 3. Alpha-over blend this frame's pixels at its rectangle, clipped to
    ///    the canvas.
    /// 4. Record this frame's rectangle and disposal tag.
    pub fn advance(&mut self, frame: &RawFrame) -> &Canvas {
        match self.last_disposal {
            Disposal::Previous => self.canvas.copy_from(&self.snapshot),
            Disposal::Keep => {}
            Disposal::Background | Disposal::Unspecified => {
                self.canvas.clear_rect(self.last_rect);
            }
        }

        if frame.disposal == Disposal::Previous {
            self.snapshot.copy_from(&self.canvas);
        }

        self.blend_frame(frame);

        self.last_disposal = frame.disposal;
        self.last_rect = frame.rect;
        &self.canvas
    }

    /// The composed canvas as of the most recent [`advance`](Self::advance).
    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    fn blend_frame(&mut self, frame: &RawFrame) {
        let rect = frame.rect;
        let cw = self.canvas.width();
        let ch = self.canvas.height();
        let x_end = rect.x.saturating_add(rect.w).min(cw);
        let y_end = rect.y.saturating_add(rect.h).min(ch);

        for cy in rect.y.min(ch)..y_end {
            let fy = (cy - rect.y) as usize;
            for cx in rect.x.min(cw)..x_end {
                let fx = (cx - rect.x) as usize;
                let off = (fy * rect.w as usize + fx) * 4;
                let Some(src) = frame.rgba.get(off..off + 4) else {
                    continue;
                };
                let src = [src[0], src[1], src[2], src[3]];
                let dst = self.canvas.pixel(cx, cy);
                self.canvas.set_pixel(cx, cy, blend::over(dst, src));
            }
        }
    }
}
