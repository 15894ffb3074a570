//! Glyphcast turns an animated GIF into a looping terminal animation of
//! colored (or monochrome) text glyphs, with an optional overlay of
//! system-information lines beside the art.
//!
//! The pipeline is:
//!
//! - Decode the GIF into raw sub-frames with disposal tags ([`decode_animation`])
//! - Sequentially composite full canvases per frame ([`Compositor`])
//! - Render composed canvases to text lines in parallel ([`prerender`])
//! - Replay the rendered frames forever ([`play`])
//!
//! Compositing is inherently serial (each frame's canvas depends on the
//! previous one through its disposal method); rendering of already-composed
//! frames is embarrassingly parallel. [`prerender`] parallelizes the latter
//! while a bounded [`CanvasPool`] keeps memory use fixed.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod compose;
mod foundation;
mod overlay;
mod playback;
mod render;

pub use crate::foundation::core::{CancelFlag, Canvas, FrameIndex, PixelRect};
pub use crate::foundation::error::{GlyphcastError, GlyphcastResult};

pub use crate::assets::decode::{AnimationSource, Disposal, RawFrame, decode_animation};
pub use crate::compose::compositor::Compositor;
pub use crate::overlay::capture_lines;
pub use crate::playback::play;
pub use crate::render::canvas_pool::CanvasPool;
pub use crate::render::frame::{RenderOpts, render_frame};
pub use crate::render::glyph::{glyph_for, write_pixel};
pub use crate::render::pipeline::{RenderThreading, RenderedAnimation, prerender};
