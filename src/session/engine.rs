use crate::{
    config::CurveConfig,
    foundation::{
        core::{Canvas, FrameIndex},
        error::{ScrubError, ScrubResult},
    },
    frames::{
        source::FrameSource,
        store::{FrameStore, LoadEvent, LoadOptions},
    },
    mapping::curve::MappingCurve,
    render::{canvas::CanvasRenderer, surface::DrawSurface},
    scroll::{
        smoothing::ScrubSmoothing,
        span::{ContainerLayout, ScrollSpan},
        tracker::{ScrollProgressTracker, Subscription},
    },
};

/// One scroll-scrubbed animation: tracker, mapper and renderer over a single frame store.
///
/// Construct it with a store that is still loading if you like, but [`ScrubEngine::activate`]
/// refuses to attach the tracker until every frame is available.
#[derive(Debug)]
pub struct ScrubEngine<S> {
    store: FrameStore,
    curve_cfg: CurveConfig,
    curve: Option<MappingCurve>,
    tracker: ScrollProgressTracker,
    renderer: CanvasRenderer<S>,
}

impl<S: DrawSurface> ScrubEngine<S> {
    /// Assemble an inactive engine.
    pub fn new(
        store: FrameStore,
        surface: S,
        curve_cfg: CurveConfig,
        smoothing: Option<ScrubSmoothing>,
    ) -> Self {
        Self {
            store,
            curve_cfg,
            curve: None,
            tracker: ScrollProgressTracker::new(smoothing),
            renderer: CanvasRenderer::new(surface),
        }
    }

    /// Start scrubbing: size the surface, paint the frame for progress `0` and attach the tracker.
    ///
    /// Re-activating an active engine replaces its subscription. Returns the initial frame.
    #[tracing::instrument(skip(self, subscription))]
    pub fn activate(
        &mut self,
        layout: &ContainerLayout,
        subscription: Subscription,
    ) -> ScrubResult<FrameIndex> {
        if !self.store.is_ready() {
            return Err(ScrubError::not_ready(format!(
                "cannot activate while frames are loading ({}%)",
                self.store.progress_percent()
            )));
        }
        let curve = self.curve_cfg.curve(self.store.frame_count())?;
        self.renderer.initialize(&self.store)?;

        let initial = curve.map(0.0);
        self.renderer.render_frame(initial, &self.store)?;
        self.tracker.attach(layout, subscription)?;
        self.curve = Some(curve);

        tracing::info!(
            frames = curve.frame_count,
            initial = initial.0,
            "scrub engine active"
        );
        Ok(initial)
    }

    /// Return `true` between activation and [`ScrubEngine::detach`].
    pub fn is_active(&self) -> bool {
        self.curve.is_some() && self.tracker.is_attached()
    }

    /// Forward a host scroll offset. Only the latest offset before the next tick matters.
    pub fn on_scroll(&mut self, offset: f64) {
        self.tracker.on_scroll(offset);
    }

    /// Follow a viewport or container resize: new span, new surface size, repaint.
    ///
    /// Returns `true` when the current frame was repainted. An invalid layout is rejected before
    /// any stage changes.
    pub fn on_resize(&mut self, layout: &ContainerLayout, canvas: Canvas) -> ScrubResult<bool> {
        ScrollSpan::from_layout(layout)?;
        self.store.resize(canvas)?;
        self.tracker.on_resize(layout)?;
        if !self.is_active() {
            return Ok(false);
        }
        self.renderer.on_resize(canvas, &self.store)
    }

    /// Advance one animation frame.
    ///
    /// Returns the newly painted frame, or `None` when progress or the resolved frame did not
    /// change.
    pub fn tick(&mut self, dt_secs: f64) -> ScrubResult<Option<FrameIndex>> {
        let Some(curve) = self.curve else {
            return Ok(None);
        };
        let Some(progress) = self.tracker.tick(dt_secs) else {
            return Ok(None);
        };
        let index = curve.map(progress);
        let painted = self.renderer.render_frame(index, &self.store)?;
        Ok(painted.then_some(index))
    }

    /// Stop scrubbing. Idempotent; the host subscription is released once.
    pub fn detach(&mut self) {
        self.tracker.detach();
        self.curve = None;
    }

    /// The mapping curve in effect while active.
    pub fn curve(&self) -> Option<MappingCurve> {
        self.curve
    }

    /// Frame store.
    pub fn store(&self) -> &FrameStore {
        &self.store
    }

    /// (Re)load the raster frames from `source`.
    ///
    /// Detaches first: the tracker never runs over a store that is not ready, and a new
    /// [`ScrubEngine::activate`] is needed afterwards to pick up the new frame count and size.
    pub fn load(
        &mut self,
        source: &dyn FrameSource,
        opts: &LoadOptions,
        on_event: &(dyn Fn(&LoadEvent) + Sync),
    ) -> ScrubResult<()> {
        self.detach();
        self.store.load(source, opts, on_event)
    }

    /// Scroll tracker.
    pub fn tracker(&self) -> &ScrollProgressTracker {
        &self.tracker
    }

    /// Renderer and its surface.
    pub fn renderer(&self) -> &CanvasRenderer<S> {
        &self.renderer
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/engine.rs"]
mod tests;
