//! Progress → frame index mapping.

/// Mapping curve with hold segment, reversal and easing.
pub mod curve;
