//! Easing applied to the active part of a scrub.

/// Easing curves over normalized time.
pub mod ease;
