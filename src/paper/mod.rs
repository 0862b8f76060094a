//! Procedural paper-fold frames: fiber texture, lit fold segments, and the staggered page fold.

/// Folded segment drawing and the paper compositing canvas.
pub mod fold;
/// Staggered six-segment page fold and its frame generator.
pub mod frame;
/// Base paper fiber texture.
pub mod texture;
