use std::sync::atomic::{AtomicBool, Ordering};

/// Zero-based frame position within the source animation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameIndex(pub usize);

/// Axis-aligned pixel rectangle, `x`/`y` at the top-left corner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PixelRect {
    /// Left edge in canvas coordinates.
    pub x: u32,
    /// Top edge in canvas coordinates.
    pub y: u32,
    /// Width in pixels.
    pub w: u32,
    /// Height in pixels.
    pub h: u32,
}

impl PixelRect {
    /// Rectangle at the origin covering `w × h` pixels.
    pub fn from_size(w: u32, h: u32) -> Self {
        Self { x: 0, y: 0, w, h }
    }
}

/// Full-size straight-alpha RGBA8 pixel buffer.
///
/// `data` holds `width * height * 4` bytes in row-major order. A freshly
/// constructed canvas is fully transparent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Canvas {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Canvas {
    /// Allocate a fully transparent canvas.
    pub fn new(width: u32, height: u32) -> Self {
        let len = (width as usize) * (height as usize) * 4;
        Self {
            width,
            height,
            data: vec![0u8; len],
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA bytes, row-major.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutable raw RGBA bytes, row-major.
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// RGBA at `(x, y)`. Both coordinates must be in bounds.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let off = self.offset(x, y);
        [
            self.data[off],
            self.data[off + 1],
            self.data[off + 2],
            self.data[off + 3],
        ]
    }

    /// Overwrite the RGBA value at `(x, y)`.
    pub fn set_pixel(&mut self, x: u32, y: u32, px: [u8; 4]) {
        let off = self.offset(x, y);
        self.data[off..off + 4].copy_from_slice(&px);
    }

    /// Copy every pixel byte from `src`, which must have identical dimensions.
    pub fn copy_from(&mut self, src: &Canvas) {
        debug_assert_eq!((self.width, self.height), (src.width, src.height));
        self.data.copy_from_slice(&src.data);
    }

    /// Set the intersection of `rect` with the canvas to fully transparent.
    pub fn clear_rect(&mut self, rect: PixelRect) {
        let x0 = rect.x.min(self.width) as usize;
        let x1 = rect.x.saturating_add(rect.w).min(self.width) as usize;
        let y0 = rect.y.min(self.height) as usize;
        let y1 = rect.y.saturating_add(rect.h).min(self.height) as usize;
        let stride = self.width as usize * 4;
        for y in y0..y1 {
            let row = y * stride;
            self.data[row + x0 * 4..row + x1 * 4].fill(0);
        }
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        debug_assert!(x < self.width && y < self.height);
        (y as usize * self.width as usize + x as usize) * 4
    }
}

/// Cooperative cancellation flag shared between the interrupt watcher, the
/// prerender producer, and the playback loop.
#[derive(Debug, Default)]
pub struct CancelFlag(AtomicBool);

impl CancelFlag {
    /// A flag that is not yet set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn set(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Whether cancellation has been requested.
    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}
