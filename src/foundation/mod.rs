//! Shared value types, the error taxonomy and pixel math.

/// Frame indices, canvas sizes and colours.
pub mod core;
/// [`error::ScrubError`] and [`error::ScrubResult`].
pub mod error;
pub(crate) mod math;
