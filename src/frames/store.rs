use std::{
    collections::BTreeSet,
    sync::{
        Arc, Mutex, PoisonError,
        atomic::{AtomicBool, Ordering},
    },
};

use rayon::prelude::*;

use crate::{
    foundation::{
        core::{Canvas, FrameIndex},
        error::{ScrubError, ScrubResult},
    },
    frames::{
        decode::decode_frame, frame::RasterFrame, generator::FrameGenerator, source::FrameSource,
    },
};

/// Shared flag used to abandon an in-flight load from another thread.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Create a token in the "not cancelled" state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Loads observing this token stop recording progress.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Return `true` once [`CancelToken::cancel`] has been called.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

#[derive(Clone, Debug, Default)]
/// Knobs for [`FrameStore::load`].
pub struct LoadOptions {
    /// Optional explicit loader thread count. `None` uses rayon defaults.
    pub threads: Option<usize>,
    /// Cancellation token checked before each fetch and before each completion is recorded.
    pub cancel: CancelToken,
}

/// Aggregate progress of a frame sequence load.
///
/// `ready` is only ever true when every requested frame completed and none failed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoadState {
    /// Number of frames requested.
    pub requested: usize,
    /// Number of frames fetched and decoded so far.
    pub completed: usize,
    /// Indices of frames that failed.
    pub failed: BTreeSet<u64>,
    /// Whether the sequence is fully loaded.
    pub ready: bool,
}

impl LoadState {
    /// Fresh state for a load of `requested` frames.
    pub fn new(requested: usize) -> Self {
        Self {
            requested,
            ..Self::default()
        }
    }

    fn fully_loaded(requested: usize) -> Self {
        Self {
            requested,
            completed: requested,
            failed: BTreeSet::new(),
            ready: true,
        }
    }

    /// Completed share as an integer percentage in `[0, 100]`.
    pub fn progress_percent(&self) -> u8 {
        if self.requested == 0 {
            return if self.ready { 100 } else { 0 };
        }
        let pct = (self.completed as f64 / self.requested as f64) * 100.0;
        pct.round().clamp(0.0, 100.0) as u8
    }

    /// Snapshot as a progress event payload.
    pub fn progress(&self) -> LoadProgress {
        LoadProgress {
            completed: self.completed,
            requested: self.requested,
            percent: self.progress_percent(),
            ready: self.ready,
        }
    }

    fn record_completed(&mut self) {
        self.completed = (self.completed + 1).min(self.requested);
        self.ready = self.completed == self.requested && self.failed.is_empty();
    }

    fn record_failed(&mut self, index: u64) {
        self.failed.insert(index);
        self.ready = false;
    }
}

/// Progress payload emitted once per completed frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadProgress {
    /// Frames completed so far.
    pub completed: usize,
    /// Frames requested.
    pub requested: usize,
    /// Rounded completion percentage.
    pub percent: u8,
    /// Set on the final event of a successful load.
    pub ready: bool,
}

/// Events emitted by [`FrameStore::load`], serialized in completion order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadEvent {
    /// One more frame finished loading.
    Progress(LoadProgress),
    /// A frame failed; the sequence will never become ready.
    Failed {
        /// Zero-based index of the failing frame.
        index: u64,
        /// Human-readable cause.
        reason: String,
    },
}

enum StoreKind {
    Raster(Vec<RasterFrame>),
    Procedural {
        generator: Box<dyn FrameGenerator>,
        frame_count: u64,
    },
}

/// Owns an animation's frames: either decoded rasters or a generator that synthesizes them.
pub struct FrameStore {
    kind: StoreKind,
    state: LoadState,
}

impl std::fmt::Debug for FrameStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match &self.kind {
            StoreKind::Raster(frames) => format!("raster({} decoded)", frames.len()),
            StoreKind::Procedural { frame_count, .. } => format!("procedural({frame_count})"),
        };
        f.debug_struct("FrameStore")
            .field("kind", &kind)
            .field("state", &self.state)
            .finish()
    }
}

impl FrameStore {
    /// An empty raster store awaiting [`FrameStore::load`].
    pub fn raster() -> Self {
        Self {
            kind: StoreKind::Raster(Vec::new()),
            state: LoadState::default(),
        }
    }

    /// A raster store over frames that are already decoded.
    pub fn from_frames(frames: Vec<RasterFrame>) -> ScrubResult<Self> {
        let Some(first) = frames.first() else {
            return Err(ScrubError::validation("frame sequence is empty"));
        };
        let canvas = first.canvas();
        if let Some((index, f)) = frames
            .iter()
            .enumerate()
            .find(|(_, f)| f.canvas() != canvas)
        {
            return Err(ScrubError::load(index as u64, size_mismatch(f.canvas(), canvas)));
        }
        Ok(Self {
            state: LoadState::fully_loaded(frames.len()),
            kind: StoreKind::Raster(frames),
        })
    }

    /// A store whose frames come from `generator`. Ready immediately.
    pub fn procedural(generator: Box<dyn FrameGenerator>, frame_count: u64) -> ScrubResult<Self> {
        if frame_count == 0 {
            return Err(ScrubError::validation("frame count must be > 0"));
        }
        Ok(Self {
            kind: StoreKind::Procedural {
                generator,
                frame_count,
            },
            state: LoadState::fully_loaded(frame_count as usize),
        })
    }

    /// Fetch and decode every descriptor of `source` concurrently.
    ///
    /// `on_event` sees one [`LoadEvent::Progress`] per completed frame with strictly increasing
    /// `completed`; the last one has `ready == true`. The first failing frame aborts the whole
    /// sequence: outstanding frames are dropped and the error names that frame.
    #[tracing::instrument(skip(self, source, opts, on_event), fields(frames = source.len()))]
    pub fn load(
        &mut self,
        source: &dyn FrameSource,
        opts: &LoadOptions,
        on_event: &(dyn Fn(&LoadEvent) + Sync),
    ) -> ScrubResult<()> {
        let StoreKind::Raster(frames) = &mut self.kind else {
            return Err(ScrubError::validation(
                "procedural frame stores have no load phase",
            ));
        };
        frames.clear();

        let requested = source.len();
        self.state = LoadState::new(requested);
        if requested == 0 {
            return Err(ScrubError::validation("frame source is empty"));
        }

        let pool = build_thread_pool(opts.threads)?;
        let shared = Mutex::new(LoadShared {
            state: LoadState::new(requested),
            canvas: None,
            first_failure: None,
        });
        let abort = AtomicBool::new(false);

        let result: ScrubResult<Vec<RasterFrame>> = pool.install(|| {
            (0..requested)
                .into_par_iter()
                .map(|index| load_one(index, source, &opts.cancel, &abort, &shared, on_event))
                .collect()
        });

        let shared = shared.into_inner().unwrap_or_else(PoisonError::into_inner);
        self.state = shared.state;

        match result {
            Ok(loaded) => {
                *frames = loaded;
                tracing::info!(frames = requested, "frame sequence ready");
                Ok(())
            }
            Err(err) => {
                self.state.ready = false;
                match shared.first_failure {
                    Some((index, reason)) => Err(ScrubError::load(index, reason)),
                    None => Err(err),
                }
            }
        }
    }

    /// Frame `index`. Procedural stores synthesize it at the current size.
    pub fn get(&self, index: FrameIndex) -> ScrubResult<RasterFrame> {
        if !self.is_ready() {
            return Err(ScrubError::not_ready(format!(
                "frame {} requested before the sequence finished loading",
                index.0
            )));
        }
        let count = self.frame_count();
        if !index.is_within(count) {
            return Err(ScrubError::IndexOutOfRange {
                index: index.0,
                count,
            });
        }
        match &self.kind {
            StoreKind::Raster(frames) => {
                frames
                    .get(index.as_usize())
                    .cloned()
                    .ok_or(ScrubError::IndexOutOfRange {
                        index: index.0,
                        count,
                    })
            }
            StoreKind::Procedural {
                generator,
                frame_count,
            } => generator.generate(index, *frame_count),
        }
    }

    /// Number of frames in the sequence (requested count while still loading).
    pub fn frame_count(&self) -> u64 {
        match &self.kind {
            StoreKind::Raster(_) => self.state.requested as u64,
            StoreKind::Procedural { frame_count, .. } => *frame_count,
        }
    }

    /// Return `true` once every frame is available.
    pub fn is_ready(&self) -> bool {
        self.state.ready
    }

    /// Rounded load percentage in `[0, 100]`.
    pub fn progress_percent(&self) -> u8 {
        self.state.progress_percent()
    }

    /// Current load bookkeeping.
    pub fn load_state(&self) -> &LoadState {
        &self.state
    }

    /// Return `true` for generator-backed stores.
    pub fn is_procedural(&self) -> bool {
        matches!(self.kind, StoreKind::Procedural { .. })
    }

    /// Pixel size shared by every frame, once known.
    pub fn frame_canvas(&self) -> Option<Canvas> {
        match &self.kind {
            StoreKind::Raster(frames) if self.state.ready => frames.first().map(|f| f.canvas()),
            StoreKind::Raster(_) => None,
            StoreKind::Procedural { generator, .. } => Some(generator.canvas()),
        }
    }

    /// Follow a surface resize. Raster frames keep their decoded size.
    pub fn resize(&mut self, canvas: Canvas) -> ScrubResult<()> {
        match &mut self.kind {
            StoreKind::Raster(_) => Ok(()),
            StoreKind::Procedural { generator, .. } => {
                if generator.canvas() == canvas {
                    return Ok(());
                }
                generator.resize(canvas)
            }
        }
    }
}

struct LoadShared {
    state: LoadState,
    canvas: Option<Canvas>,
    first_failure: Option<(u64, String)>,
}

fn load_one(
    index: usize,
    source: &dyn FrameSource,
    cancel: &CancelToken,
    abort: &AtomicBool,
    shared: &Mutex<LoadShared>,
    on_event: &(dyn Fn(&LoadEvent) + Sync),
) -> ScrubResult<RasterFrame> {
    if cancel.is_cancelled() || abort.load(Ordering::Acquire) {
        return Err(ScrubError::Cancelled);
    }

    let decoded = source.fetch(index).and_then(|bytes| decode_frame(&bytes));

    let mut guard = shared.lock().unwrap_or_else(PoisonError::into_inner);
    if cancel.is_cancelled() || abort.load(Ordering::Acquire) {
        return Err(ScrubError::Cancelled);
    }

    let decoded = decoded.and_then(|frame| match guard.canvas {
        Some(canvas) if canvas != frame.canvas() => Err(ScrubError::validation(size_mismatch(
            frame.canvas(),
            canvas,
        ))),
        _ => Ok(frame),
    });

    match decoded {
        Ok(frame) => {
            guard.canvas.get_or_insert(frame.canvas());
            guard.state.record_completed();
            let progress = guard.state.progress();
            tracing::debug!(index, percent = progress.percent, "frame loaded");
            on_event(&LoadEvent::Progress(progress));
            Ok(frame)
        }
        Err(err) => {
            abort.store(true, Ordering::Release);
            let failed_index = index as u64;
            guard.state.record_failed(failed_index);
            let reason = err.to_string();
            tracing::warn!(index, frame = %source.describe(index), %reason, "frame failed to load");
            if guard.first_failure.is_none() {
                guard.first_failure = Some((failed_index, reason.clone()));
            }
            on_event(&LoadEvent::Failed {
                index: failed_index,
                reason: reason.clone(),
            });
            Err(ScrubError::load(failed_index, reason))
        }
    }
}

fn size_mismatch(got: Canvas, expected: Canvas) -> String {
    format!(
        "frame is {}x{} but the sequence is {}x{}",
        got.width, got.height, expected.width, expected.height
    )
}

fn build_thread_pool(threads: Option<usize>) -> ScrubResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(ScrubError::validation(
            "load 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| ScrubError::validation(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/frames/store.rs"]
mod tests;
