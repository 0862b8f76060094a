//! scrubframe drives a frame-sequence animation from scroll position.
//!
//! A host feeds scroll offsets and animation-frame ticks; scrubframe turns them into a frame index
//! and paints that frame onto a drawing surface. Frames are either pre-rasterized images loaded
//! up front or synthesized on demand (the procedural paper fold).
//!
//! # Pipeline overview
//!
//! 1. **Load**: [`FrameStore::load`] decodes every frame concurrently and reports progress
//! 2. **Track**: [`ScrollProgressTracker`] turns the latest scroll offset into progress in `[0, 1]`
//! 3. **Map**: [`map_progress`] turns progress into a [`FrameIndex`] (hold segment, reversal, easing)
//! 4. **Render**: [`CanvasRenderer`] paints the frame unless it is already on the surface
//!
//! [`ScrubEngine`] wires the last three stages together and owns their lifecycle.
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **All-or-nothing loading**: one failed frame and the sequence never becomes ready.
//! - **Latest progress wins**: intermediate scroll offsets between two ticks are dropped.
//! - **Premultiplied RGBA8** end-to-end, shared read-only between renderers.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod animation;
mod extract;
mod foundation;
mod frames;
mod mapping;
mod paper;
mod render;
mod scroll;
mod session;

/// JSON engine configuration.
pub mod config;

pub use animation::ease::Ease;
pub use config::{
    CurveConfig, EngineConfig, FramesConfig, LoadConfig, PAPER_FRAME_COUNT, STOREFRONT_ACTIVE_FRACTION,
    STOREFRONT_FRAME_COUNT, STOREFRONT_LAG_SECS, SmoothingConfig,
};
pub use extract::ffmpeg::{ExtractConfig, ensure_parent_dir, extract_frames, is_ffmpeg_on_path};
pub use foundation::core::{Affine, Canvas, FrameIndex, Point, Rect, Rgba8Premul, Vec2};
pub use foundation::error::{ScrubError, ScrubResult};
pub use frames::decode::decode_frame;
pub use frames::frame::RasterFrame;
pub use frames::generator::{FrameGenerator, index_progress};
pub use frames::naming::{FrameNaming, frame_asset_name};
pub use frames::source::{DirFrameSource, FrameSource, MemoryFrameSource, count_consecutive_frames};
pub use frames::store::{CancelToken, FrameStore, LoadEvent, LoadOptions, LoadProgress, LoadState};
pub use mapping::curve::{MappingCurve, map_progress};
pub use paper::fold::{
    CREASE_MIN_DEG, FoldDirection, PaperCanvas, SHADOW_MIN_DEG, SegmentGeometry, fold_segment_pixels,
};
pub use paper::frame::{
    BACKGROUND_RGBA, PaperFrameGenerator, SEGMENT_COUNT, SEGMENT_STAGGER, SEGMENT_WINDOW,
    render_paper_frame, segment_progress,
};
pub use paper::texture::{PAPER_RGB, PaperTexture};
pub use render::canvas::{CanvasRenderer, RenderState};
pub use render::surface::{DrawSurface, PixmapSurface};
pub use scroll::smoothing::ScrubSmoothing;
pub use scroll::span::{ContainerLayout, ScrollSpan};
pub use scroll::tracker::{ScrollProgressTracker, Subscription};
pub use session::engine::ScrubEngine;
