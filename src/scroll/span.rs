use crate::foundation::{
    error::{ScrubError, ScrubResult},
    math::clamp01,
};

/// Layout of the scroll-bound container, in the same units as scroll offsets.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ContainerLayout {
    /// Document offset of the container's top edge.
    pub top: f64,
    /// Container height.
    pub height: f64,
    /// Viewport height.
    pub viewport_height: f64,
}

/// Scroll distance over which progress runs from `0` to `1`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScrollSpan {
    /// Offset where progress is `0`.
    pub start_offset: f64,
    /// Offset where progress is `1`. Always greater than `start_offset`.
    pub end_offset: f64,
}

impl ScrollSpan {
    /// Create a validated span with `end_offset > start_offset`.
    pub fn new(start_offset: f64, end_offset: f64) -> ScrubResult<Self> {
        if !start_offset.is_finite() || !end_offset.is_finite() {
            return Err(ScrubError::validation("scroll span offsets must be finite"));
        }
        if end_offset <= start_offset {
            return Err(ScrubError::validation(format!(
                "scroll span end ({end_offset}) must be greater than start ({start_offset})"
            )));
        }
        Ok(Self {
            start_offset,
            end_offset,
        })
    }

    /// Span from "container top meets viewport top" to "container bottom meets viewport bottom".
    pub fn from_layout(layout: &ContainerLayout) -> ScrubResult<Self> {
        Self::new(
            layout.top,
            layout.top + layout.height - layout.viewport_height,
        )
    }

    /// Scroll distance covered by the span.
    pub fn distance(&self) -> f64 {
        self.end_offset - self.start_offset
    }

    /// Progress at scroll `offset`, clamped to `[0, 1]`.
    pub fn progress_at(&self, offset: f64) -> f64 {
        clamp01((offset - self.start_offset) / self.distance())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/span.rs"]
mod tests;
