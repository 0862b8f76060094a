use crate::{
    foundation::error::ScrubResult,
    scroll::{
        smoothing::ScrubSmoothing,
        span::{ContainerLayout, ScrollSpan},
    },
};

/// Host-side registration of scroll/resize listeners.
///
/// The cleanup closure runs exactly once: on [`Subscription::cancel`] or on drop, whichever comes
/// first.
pub struct Subscription {
    cleanup: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    /// Wrap the host's unsubscribe action.
    pub fn new(cleanup: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cleanup: Some(Box::new(cleanup)),
        }
    }

    /// A subscription with nothing to clean up.
    pub fn noop() -> Self {
        Self { cleanup: None }
    }

    /// Run the cleanup if it has not run yet.
    pub fn cancel(&mut self) {
        if let Some(cleanup) = self.cleanup.take() {
            cleanup();
        }
    }

    /// Return `true` while the cleanup is still pending.
    pub fn is_active(&self) -> bool {
        self.cleanup.is_some()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}

/// Converts host scroll offsets into normalized progress.
///
/// Offsets pushed with [`ScrollProgressTracker::on_scroll`] are coalesced: only the latest one is
/// kept, and [`ScrollProgressTracker::tick`] emits at most one progress value per animation frame.
#[derive(Debug, Default)]
pub struct ScrollProgressTracker {
    span: Option<ScrollSpan>,
    subscription: Option<Subscription>,
    offset: Option<f64>,
    last_emitted: Option<f64>,
    smoothing: Option<ScrubSmoothing>,
}

impl ScrollProgressTracker {
    /// A detached tracker, optionally lagging behind the raw scroll position.
    pub fn new(smoothing: Option<ScrubSmoothing>) -> Self {
        Self {
            smoothing,
            ..Self::default()
        }
    }

    /// Start observing a container. Re-attaching detaches the previous subscription first.
    pub fn attach(&mut self, layout: &ContainerLayout, subscription: Subscription) -> ScrubResult<()> {
        let span = ScrollSpan::from_layout(layout)?;
        self.detach();
        tracing::debug!(
            start = span.start_offset,
            end = span.end_offset,
            "scroll tracker attached"
        );
        self.span = Some(span);
        self.subscription = Some(subscription);
        Ok(())
    }

    /// Stop observing. Safe to call any number of times; the host cleanup runs once.
    pub fn detach(&mut self) {
        if let Some(mut subscription) = self.subscription.take() {
            subscription.cancel();
            tracing::debug!("scroll tracker detached");
        }
        self.span = None;
        self.offset = None;
        self.last_emitted = None;
        if let Some(smoothing) = self.smoothing.as_mut() {
            smoothing.reset();
        }
    }

    /// Return `true` between [`ScrollProgressTracker::attach`] and
    /// [`ScrollProgressTracker::detach`].
    pub fn is_attached(&self) -> bool {
        self.subscription.is_some()
    }

    /// Current span, while attached.
    pub fn span(&self) -> Option<ScrollSpan> {
        self.span
    }

    /// Record the latest scroll offset. Ignored while detached.
    pub fn on_scroll(&mut self, offset: f64) {
        if self.is_attached() {
            self.offset = Some(offset);
        }
    }

    /// Recompute the span after a viewport or container resize.
    pub fn on_resize(&mut self, layout: &ContainerLayout) -> ScrubResult<()> {
        if !self.is_attached() {
            return Ok(());
        }
        self.span = Some(ScrollSpan::from_layout(layout)?);
        self.last_emitted = None;
        Ok(())
    }

    /// Raw progress of the latest offset, before smoothing.
    pub fn raw_progress(&self) -> Option<f64> {
        let span = self.span?;
        Some(span.progress_at(self.offset.unwrap_or(span.start_offset)))
    }

    /// Advance one animation frame of `dt_secs`.
    ///
    /// Returns the new progress when it differs from the last emitted value.
    pub fn tick(&mut self, dt_secs: f64) -> Option<f64> {
        let target = self.raw_progress()?;
        let progress = match self.smoothing.as_mut() {
            Some(smoothing) => smoothing.advance(target, dt_secs),
            None => target,
        };
        if self.last_emitted == Some(progress) {
            return None;
        }
        self.last_emitted = Some(progress);
        Some(progress)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/tracker.rs"]
mod tests;
