use std::sync::{Condvar, Mutex, PoisonError};

use crate::foundation::core::Canvas;

/// Bounded pool of preallocated full-size canvases.
///
/// The pool is the single synchronization primitive bounding pipeline memory:
/// the compositor blocks in [`acquire`](Self::acquire) whenever every canvas
/// is checked out, so a fast producer cannot outrun the render workers.
/// Canvases in flight never exceed the configured capacity.
pub struct CanvasPool {
    state: Mutex<PoolState>,
    available: Condvar,
    capacity: usize,
}

struct PoolState {
    canvases: Vec<Canvas>,
    closed: bool,
}

impl CanvasPool {
    /// Preallocate `capacity` transparent canvases of `width × height`.
    pub fn new(width: u32, height: u32, capacity: usize) -> Self {
        let canvases = (0..capacity).map(|_| Canvas::new(width, height)).collect();
        Self {
            state: Mutex::new(PoolState {
                canvases,
                closed: false,
            }),
            available: Condvar::new(),
            capacity,
        }
    }

    /// Take a canvas, blocking while the pool is empty.
    ///
    /// Returns `None` once the pool has been [`close`](Self::close)d, which
    /// is how a blocked producer is unhooked on cancellation.
    pub fn acquire(&self) -> Option<Canvas> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        loop {
            if state.closed {
                return None;
            }
            if let Some(canvas) = state.canvases.pop() {
                return Some(canvas);
            }
            state = self
                .available
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Return a canvas to the pool and wake one waiter.
    ///
    /// The caller must not retain any handle to the canvas afterwards.
    pub fn release(&self, canvas: Canvas) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.canvases.len() < self.capacity {
            state.canvases.push(canvas);
        }
        drop(state);
        self.available.notify_one();
    }

    /// Close the pool, waking every blocked acquirer.
    pub fn close(&self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.closed = true;
        drop(state);
        self.available.notify_all();
    }

    /// Configured capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Canvases currently in the pool (not checked out).
    pub fn available(&self) -> usize {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .canvases
            .len()
    }
}
