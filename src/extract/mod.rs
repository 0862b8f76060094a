//! Producing frame sets on disk.

/// Video to image-sequence extraction through the system `ffmpeg`.
pub mod ffmpeg;
