use std::num::NonZeroUsize;
use std::sync::mpsc;
use std::sync::{Mutex, PoisonError};

use crate::assets::decode::AnimationSource;
use crate::compose::compositor::Compositor;
use crate::foundation::core::{CancelFlag, Canvas, FrameIndex};
use crate::foundation::error::{GlyphcastError, GlyphcastResult};
use crate::render::canvas_pool::CanvasPool;
use crate::render::frame::{RenderOpts, render_frame};

/// Canvases preallocated per render worker. Two keeps workers fed while the
/// compositor prepares the next frame without unbounded buffering.
const POOL_CANVASES_PER_WORKER: usize = 2;

/// Threading controls for [`prerender`].
#[derive(Clone, Copy, Debug, Default)]
pub struct RenderThreading {
    /// Explicit worker count. `None` uses the machine's available
    /// parallelism; `Some(0)` is rejected.
    pub threads: Option<usize>,
}

/// Every frame of the animation rendered to text lines, in source order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedAnimation {
    /// Dense, frame-indexed line sets. `frames[i]` is the full rendering of
    /// source frame `i`.
    pub frames: Vec<Vec<String>>,
}

impl RenderedAnimation {
    /// Number of rendered frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether no frames were rendered.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Lines of the first frame, for the static print after playback ends.
    pub fn first_frame(&self) -> Option<&[String]> {
        self.frames.first().map(Vec::as_slice)
    }
}

struct RenderJob {
    index: FrameIndex,
    canvas: Canvas,
}

struct RenderResult {
    index: FrameIndex,
    lines: Vec<String>,
}

/// Composite and render every frame of `source`, in parallel, preserving
/// source frame order in the result.
///
/// One sequential producer (the [`Compositor`], whose disposal chain cannot
/// be parallelized) copies each composed canvas into a pooled buffer and
/// enqueues it; a fixed set of workers renders frames to text lines in
/// whatever order they complete; results are reassembled into a dense array
/// by frame index before returning. The canvas pool provides backpressure:
/// when rendering falls behind, the producer blocks in `acquire` instead of
/// growing memory.
///
/// `cancel` is polled at each produced frame; a cancelled run returns
/// [`GlyphcastError::Cancelled`].
#[tracing::instrument(skip_all, fields(frames = source.frames.len()))]
pub fn prerender(
    source: &AnimationSource,
    opts: &RenderOpts,
    overlay: &[String],
    threading: &RenderThreading,
    cancel: &CancelFlag,
) -> GlyphcastResult<RenderedAnimation> {
    let frame_count = source.frames.len();
    if frame_count == 0 {
        return Err(GlyphcastError::config("animation has no frames"));
    }

    let workers = worker_count(threading.threads)?;
    let canvas_pool = CanvasPool::new(
        source.width,
        source.height,
        workers * POOL_CANVASES_PER_WORKER,
    );
    let thread_pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()
        .map_err(|e| GlyphcastError::render(format!("failed to build worker pool: {e}")))?;

    // Jobs are buffered for the whole animation so the only backpressure is
    // the canvas pool; results are unbounded and drained after the barrier.
    let (job_tx, job_rx) = mpsc::sync_channel::<RenderJob>(frame_count);
    let job_rx = Mutex::new(job_rx);
    let (result_tx, result_rx) = mpsc::channel::<RenderResult>();

    thread_pool.in_place_scope(|scope| {
        for _ in 0..workers {
            let result_tx = result_tx.clone();
            let job_rx = &job_rx;
            let canvas_pool = &canvas_pool;
            scope.spawn(move |_| worker_loop(job_rx, result_tx, canvas_pool, opts, overlay));
        }

        // Producer: strictly sequential composition on the calling thread.
        let mut compositor = Compositor::new(source.width, source.height);
        for (i, raw) in source.frames.iter().enumerate() {
            if cancel.is_set() {
                canvas_pool.close();
                break;
            }
            let composed = compositor.advance(raw);
            let Some(mut pooled) = canvas_pool.acquire() else {
                break;
            };
            pooled.copy_from(composed);
            let job = RenderJob {
                index: FrameIndex(i),
                canvas: pooled,
            };
            if job_tx.send(job).is_err() {
                break;
            }
        }
        drop(job_tx);
        // Scope exit joins every worker: the barrier before collection.
    });

    drop(result_tx);
    if cancel.is_set() {
        return Err(GlyphcastError::Cancelled);
    }

    collect_results(result_rx, frame_count)
}

fn worker_loop(
    jobs: &Mutex<mpsc::Receiver<RenderJob>>,
    results: mpsc::Sender<RenderResult>,
    canvas_pool: &CanvasPool,
    opts: &RenderOpts,
    overlay: &[String],
) {
    loop {
        // Hold the receiver lock only for the dequeue, never while rendering.
        let job = {
            let rx = jobs.lock().unwrap_or_else(PoisonError::into_inner);
            rx.recv()
        };
        let Ok(job) = job else {
            break;
        };

        let lines = render_frame(&job.canvas, opts, overlay);
        canvas_pool.release(job.canvas);

        let result = RenderResult {
            index: job.index,
            lines,
        };
        if results.send(result).is_err() {
            break;
        }
    }
}

/// Index results into a dense array. Gaps, duplicates, and out-of-range
/// indices all violate the one-job-per-index contract and surface as
/// internal errors rather than silently corrupt output.
fn collect_results(
    results: mpsc::Receiver<RenderResult>,
    frame_count: usize,
) -> GlyphcastResult<RenderedAnimation> {
    let mut slots: Vec<Option<Vec<String>>> = (0..frame_count).map(|_| None).collect();
    for result in results {
        let FrameIndex(i) = result.index;
        let slot = slots.get_mut(i).ok_or_else(|| {
            GlyphcastError::render(format!("internal error: result index {i} out of range"))
        })?;
        if slot.replace(result.lines).is_some() {
            return Err(GlyphcastError::render(format!(
                "internal error: duplicate result for frame {i}"
            )));
        }
    }

    let frames = slots
        .into_iter()
        .enumerate()
        .map(|(i, slot)| {
            slot.ok_or_else(|| {
                GlyphcastError::render(format!("internal error: missing rendered frame {i}"))
            })
        })
        .collect::<GlyphcastResult<Vec<_>>>()?;

    tracing::debug!(frames = frames.len(), "prerender complete");
    Ok(RenderedAnimation { frames })
}

fn worker_count(threads: Option<usize>) -> GlyphcastResult<usize> {
    match threads {
        Some(0) => Err(GlyphcastError::config(
            "render threading 'threads' must be >= 1 when set",
        )),
        Some(n) => Ok(n),
        None => Ok(std::thread::available_parallelism()
            .map(NonZeroUsize::get)
            .unwrap_or(1)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::decode::{Disposal, RawFrame};
    use crate::foundation::core::PixelRect;

    fn one_frame_source() -> AnimationSource {
        AnimationSource {
            width: 2,
            height: 2,
            frames: vec![RawFrame {
                rect: PixelRect::from_size(2, 2),
                rgba: vec![0; 16],
                disposal: Disposal::Keep,
            }],
        }
    }

    fn opts() -> RenderOpts {
        RenderOpts {
            width: 2,
            height: 2,
            color: false,
            multiplier: 1.0,
            overlay_offset: 0,
        }
    }

    #[test]
    fn zero_threads_is_a_config_error() {
        let err = prerender(
            &one_frame_source(),
            &opts(),
            &[],
            &RenderThreading { threads: Some(0) },
            &CancelFlag::new(),
        )
        .unwrap_err();
        assert!(matches!(err, GlyphcastError::Config(_)));
    }

    #[test]
    fn pre_set_cancel_returns_cancelled() {
        let cancel = CancelFlag::new();
        cancel.set();
        let err = prerender(
            &one_frame_source(),
            &opts(),
            &[],
            &RenderThreading::default(),
            &cancel,
        )
        .unwrap_err();
        assert!(matches!(err, GlyphcastError::Cancelled));
    }

    #[test]
    fn single_frame_renders_densely() {
        let animation = prerender(
            &one_frame_source(),
            &opts(),
            &[],
            &RenderThreading { threads: Some(1) },
            &CancelFlag::new(),
        )
        .unwrap();
        assert_eq!(animation.len(), 1);
        assert_eq!(animation.first_frame().unwrap().len(), 2);
    }
}
