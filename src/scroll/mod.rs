//! Scroll observation: turning container offsets into normalized progress.

/// Exponential scrub lag applied to raw progress.
pub mod smoothing;
/// Scroll span derived from container layout.
pub mod span;
/// Attach/detach lifecycle and per-tick progress emission.
pub mod tracker;
