//! Wiring of the tracker, mapper and renderer into one scrubbed animation.

/// [`engine::ScrubEngine`]: activation, per-tick updates and teardown.
pub mod engine;
