use crate::foundation::{
    error::{ScrubError, ScrubResult},
    math::clamp01,
};

const SETTLE_EPSILON: f64 = 1e-4;

/// Scrub lag: rendered progress chases raw scroll progress instead of jumping to it.
///
/// After `lag_secs` of steady input the smoothed value has covered ~95% of the gap
/// (time constant `lag_secs / 3`). A lag of `0` snaps.
#[derive(Clone, Debug, PartialEq)]
pub struct ScrubSmoothing {
    lag_secs: f64,
    current: Option<f64>,
}

impl ScrubSmoothing {
    /// Create a smoother with the given lag.
    pub fn new(lag_secs: f64) -> ScrubResult<Self> {
        if !lag_secs.is_finite() || lag_secs < 0.0 {
            return Err(ScrubError::validation(
                "scrub lag_secs must be finite and >= 0",
            ));
        }
        Ok(Self {
            lag_secs,
            current: None,
        })
    }

    /// Configured lag in seconds.
    pub fn lag_secs(&self) -> f64 {
        self.lag_secs
    }

    /// Last smoothed value, if any.
    pub fn current(&self) -> Option<f64> {
        self.current
    }

    /// Move toward `target` over `dt_secs` and return the new smoothed progress.
    pub fn advance(&mut self, target: f64, dt_secs: f64) -> f64 {
        let target = clamp01(target);
        let next = match self.current {
            None => target,
            Some(_) if self.lag_secs == 0.0 => target,
            Some(cur) => {
                let dt = if dt_secs.is_finite() { dt_secs.max(0.0) } else { 0.0 };
                let tau = self.lag_secs / 3.0;
                let alpha = 1.0 - (-dt / tau).exp();
                let v = cur + (target - cur) * alpha;
                if (target - v).abs() < SETTLE_EPSILON {
                    target
                } else {
                    v
                }
            }
        };
        self.current = Some(next);
        next
    }

    /// Return `true` when the smoothed value has reached `target`.
    pub fn is_settled(&self, target: f64) -> bool {
        self.current == Some(clamp01(target))
    }

    /// Forget the smoothed value; the next [`ScrubSmoothing::advance`] snaps.
    pub fn reset(&mut self) {
        self.current = None;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/smoothing.rs"]
mod tests;
