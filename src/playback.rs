use std::io::Write;
use std::time::Duration;

use crossterm::{cursor, queue};

use crate::foundation::core::CancelFlag;
use crate::foundation::error::{GlyphcastError, GlyphcastResult};
use crate::render::pipeline::RenderedAnimation;

/// Replay the rendered animation until cancelled.
///
/// Each frame: home the cursor, write every line top-to-bottom, flush, then
/// sleep for `delay`. Lines end with `\r\n` since the surrounding binary runs
/// the terminal in raw mode. The cancel flag is checked at every frame
/// boundary so teardown code always gets to run; the caller prints
/// [`RenderedAnimation::first_frame`] after restoring the terminal.
pub fn play(
    out: &mut impl Write,
    animation: &RenderedAnimation,
    delay: Duration,
    cancel: &CancelFlag,
) -> GlyphcastResult<()> {
    if animation.is_empty() {
        return Err(GlyphcastError::render("nothing to play: no frames"));
    }

    loop {
        for frame in &animation.frames {
            if cancel.is_set() {
                return Ok(());
            }
            queue!(out, cursor::MoveTo(0, 0))
                .map_err(|e| GlyphcastError::render(format!("cursor move failed: {e}")))?;
            for line in frame {
                out.write_all(line.as_bytes())
                    .and_then(|()| out.write_all(b"\r\n"))
                    .map_err(|e| GlyphcastError::render(format!("write frame failed: {e}")))?;
            }
            out.flush()
                .map_err(|e| GlyphcastError::render(format!("flush failed: {e}")))?;
            std::thread::sleep(delay);
        }
    }
}
