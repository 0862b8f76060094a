//! Frame sequences: asset naming, decoding, sources and the loaded [`store::FrameStore`].

/// Decode encoded frame bytes into premultiplied RGBA8.
pub mod decode;
/// Shared raster frame type.
pub mod frame;
/// Procedural frame generators.
pub mod generator;
/// 1-based, zero-padded frame asset names.
pub mod naming;
/// Where encoded frame bytes come from.
pub mod source;
/// Loaded frame sequence with progress tracking.
pub mod store;
