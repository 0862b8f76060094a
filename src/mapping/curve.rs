use crate::{
    animation::ease::Ease,
    foundation::{
        core::FrameIndex,
        error::{ScrubError, ScrubResult},
        math::clamp01,
    },
};

/// How normalized scroll progress maps onto a frame index.
///
/// The first `active_fraction` of the scroll span scrubs through the sequence; the remainder holds
/// the terminal frame. With `reversed`, scrolling forward plays from the last frame to the first.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MappingCurve {
    /// Share of the scroll span, in `(0, 1]`, during which the frame changes.
    pub active_fraction: f64,
    /// Play the sequence backwards as progress increases.
    pub reversed: bool,
    /// Number of frames in the sequence, at least 1.
    pub frame_count: u64,
    /// Easing applied to the active segment.
    pub ease: Ease,
}

impl MappingCurve {
    /// Create a validated linear curve.
    pub fn new(frame_count: u64, active_fraction: f64, reversed: bool) -> ScrubResult<Self> {
        if frame_count == 0 {
            return Err(ScrubError::validation("mapping frame_count must be > 0"));
        }
        if !(active_fraction > 0.0 && active_fraction <= 1.0) {
            return Err(ScrubError::validation(format!(
                "mapping active_fraction must be in (0, 1], got {active_fraction}"
            )));
        }
        Ok(Self {
            active_fraction,
            reversed,
            frame_count,
            ease: Ease::Linear,
        })
    }

    /// Replace the easing of the active segment.
    pub fn with_ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    /// Index of the last frame.
    pub fn last_index(&self) -> FrameIndex {
        FrameIndex(self.frame_count.saturating_sub(1))
    }

    /// Map `progress` to a frame index. Total: out-of-range and NaN progress are clamped.
    pub fn map(&self, progress: f64) -> FrameIndex {
        map_progress(progress, self)
    }
}

/// Map normalized scroll `progress` to a frame index under `curve`.
///
/// Progress `0` and `1` always land exactly on the two terminal frames.
pub fn map_progress(progress: f64, curve: &MappingCurve) -> FrameIndex {
    if curve.frame_count <= 1 {
        return FrameIndex(0);
    }
    let progress = clamp01(progress);
    let anim = if curve.active_fraction > 0.0 {
        clamp01(progress / curve.active_fraction)
    } else {
        1.0
    };
    let anim = curve.ease.apply(anim);

    let last = (curve.frame_count - 1) as f64;
    let raw = anim * last;
    let idx = if curve.reversed {
        (last - raw).round()
    } else {
        raw.round()
    };
    FrameIndex(idx.clamp(0.0, last) as u64)
}

#[cfg(test)]
#[path = "../../tests/unit/mapping/curve.rs"]
mod tests;
