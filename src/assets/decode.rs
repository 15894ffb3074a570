use std::fs::File;
use std::path::Path;

use crate::foundation::core::PixelRect;
use crate::foundation::error::{GlyphcastError, GlyphcastResult};

/// How the canvas region a frame occupied is treated once that frame's
/// display time ends, before the next frame is composited.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Disposal {
    /// No disposal specified. Treated as a background clear.
    Unspecified,
    /// Leave the canvas as this frame left it; frames accumulate.
    Keep,
    /// Clear the frame's rectangle back to transparent.
    Background,
    /// Restore the canvas to its state before this frame was composited.
    Previous,
}

impl From<gif::DisposalMethod> for Disposal {
    fn from(d: gif::DisposalMethod) -> Self {
        match d {
            gif::DisposalMethod::Any => Disposal::Unspecified,
            gif::DisposalMethod::Keep => Disposal::Keep,
            gif::DisposalMethod::Background => Disposal::Background,
            gif::DisposalMethod::Previous => Disposal::Previous,
        }
    }
}

/// One decoded sub-frame: its bounding rectangle within the logical canvas,
/// straight-alpha RGBA pixels covering only that rectangle, and the disposal
/// tag to apply after the frame's display time.
#[derive(Clone, Debug)]
pub struct RawFrame {
    /// Bounding rectangle in canvas coordinates. May extend past the canvas;
    /// the compositor clips.
    pub rect: PixelRect,
    /// RGBA bytes, `rect.w * rect.h * 4`, row-major.
    pub rgba: Vec<u8>,
    /// Disposal tag recorded for this frame.
    pub disposal: Disposal,
}

/// A fully decoded animation: logical canvas size plus every raw frame in
/// presentation order.
#[derive(Clone, Debug)]
pub struct AnimationSource {
    /// Logical canvas width from the GIF header.
    pub width: u32,
    /// Logical canvas height from the GIF header.
    pub height: u32,
    /// Frames in presentation order. Never empty.
    pub frames: Vec<RawFrame>,
}

/// Decode an animated GIF from disk into raw frames with disposal metadata.
///
/// Fatal on any I/O or container error; an animation with no frames or a
/// zero-sized canvas is also rejected, since nothing downstream can render it.
#[tracing::instrument]
pub fn decode_animation(path: &Path) -> GlyphcastResult<AnimationSource> {
    let file = File::open(path)
        .map_err(|e| GlyphcastError::decode(format!("open '{}': {e}", path.display())))?;

    let mut options = gif::DecodeOptions::new();
    options.set_color_output(gif::ColorOutput::RGBA);
    let mut decoder = options
        .read_info(file)
        .map_err(|e| GlyphcastError::decode(format!("read gif '{}': {e}", path.display())))?;

    let width = u32::from(decoder.width());
    let height = u32::from(decoder.height());
    if width == 0 || height == 0 {
        return Err(GlyphcastError::decode(format!(
            "gif '{}' has a zero-sized canvas",
            path.display()
        )));
    }

    let mut frames = Vec::new();
    while let Some(frame) = decoder
        .read_next_frame()
        .map_err(|e| GlyphcastError::decode(format!("decode gif frame: {e}")))?
    {
        frames.push(RawFrame {
            rect: PixelRect {
                x: u32::from(frame.left),
                y: u32::from(frame.top),
                w: u32::from(frame.width),
                h: u32::from(frame.height),
            },
            rgba: frame.buffer.to_vec(),
            disposal: Disposal::from(frame.dispose),
        });
    }

    if frames.is_empty() {
        return Err(GlyphcastError::decode(format!(
            "gif '{}' contains no frames",
            path.display()
        )));
    }

    tracing::debug!(frames = frames.len(), width, height, "decoded animation");
    Ok(AnimationSource {
        width,
        height,
        frames,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use gif::{Encoder, Frame, Repeat};

    fn write_two_frame_gif(path: &Path) {
        let mut out = File::create(path).unwrap();
        // Global palette: black, red.
        let palette = &[0, 0, 0, 255, 0, 0];
        let mut enc = Encoder::new(&mut out, 4, 4, palette).unwrap();
        enc.set_repeat(Repeat::Infinite).unwrap();

        let mut full = Frame::default();
        full.width = 4;
        full.height = 4;
        full.buffer = std::borrow::Cow::Owned(vec![1u8; 16]);
        full.dispose = gif::DisposalMethod::Keep;
        enc.write_frame(&full).unwrap();

        let mut partial = Frame::default();
        partial.left = 1;
        partial.top = 2;
        partial.width = 2;
        partial.height = 1;
        partial.buffer = std::borrow::Cow::Owned(vec![0u8; 2]);
        partial.dispose = gif::DisposalMethod::Background;
        enc.write_frame(&partial).unwrap();
    }

    #[test]
    fn decodes_frames_with_rects_and_disposal() {
        let dir = std::env::temp_dir();
        let path = dir.join(format!("glyphcast_decode_{}.gif", std::process::id()));
        write_two_frame_gif(&path);

        let anim = decode_animation(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!((anim.width, anim.height), (4, 4));
        assert_eq!(anim.frames.len(), 2);

        let full = &anim.frames[0];
        assert_eq!(full.rect, PixelRect::from_size(4, 4));
        assert_eq!(full.disposal, Disposal::Keep);
        assert_eq!(full.rgba.len(), 4 * 4 * 4);
        assert_eq!(&full.rgba[0..4], &[255, 0, 0, 255]);

        let partial = &anim.frames[1];
        assert_eq!(
            partial.rect,
            PixelRect {
                x: 1,
                y: 2,
                w: 2,
                h: 1
            }
        );
        assert_eq!(partial.disposal, Disposal::Background);
        assert_eq!(partial.rgba.len(), 2 * 4);
    }

    #[test]
    fn missing_file_is_a_decode_error() {
        let err = decode_animation(Path::new("/nonexistent/glyphcast.gif")).unwrap_err();
        assert!(matches!(err, GlyphcastError::Decode(_)));
    }
}
