//! Painting frames onto a drawing surface.

/// Frame renderer with repaint de-duplication and resize handling.
pub mod canvas;
/// Helpers bridging frames and the `vello_cpu` rasterizer.
pub(crate) mod cpu;
/// Drawing-surface seam and the CPU pixmap surface.
pub mod surface;
