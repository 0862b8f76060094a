use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::{
    animation::ease::Ease,
    foundation::{
        core::Canvas,
        error::{ScrubError, ScrubResult},
    },
    frames::{
        naming::FrameNaming,
        source::DirFrameSource,
        store::{FrameStore, LoadEvent, LoadOptions},
    },
    mapping::curve::MappingCurve,
    paper::frame::PaperFrameGenerator,
    scroll::smoothing::ScrubSmoothing,
};

/// Frame count of the pre-rasterized storefront sequence.
pub const STOREFRONT_FRAME_COUNT: usize = 240;
/// Frame count of the procedural paper sequence.
pub const PAPER_FRAME_COUNT: u64 = 60;
/// Share of the scroll span the storefront sequence plays over.
pub const STOREFRONT_ACTIVE_FRACTION: f64 = 0.7;
/// Scrub lag of both storefront variants.
pub const STOREFRONT_LAG_SECS: f64 = 0.5;

const DEFAULT_CLEAR_RGBA: [u8; 4] = [0, 0, 0, 255];

/// Engine configuration, usually read from JSON.
///
/// ```json
/// {
///   "frames": { "kind": "raster", "dir": "frames", "count": 240 },
///   "curve": { "active_fraction": 0.7, "reversed": true },
///   "smoothing": { "lag_secs": 0.5 }
/// }
/// ```
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Where frames come from.
    pub frames: FramesConfig,
    /// Progress to frame mapping.
    #[serde(default)]
    pub curve: CurveConfig,
    /// Optional scrub lag. `None` renders raw scroll progress.
    #[serde(default)]
    pub smoothing: Option<SmoothingConfig>,
    /// Loader settings.
    #[serde(default)]
    pub load: LoadConfig,
    /// Straight-alpha surface clear colour.
    #[serde(default = "default_clear_rgba")]
    pub clear_rgba: [u8; 4],
}

fn default_clear_rgba() -> [u8; 4] {
    DEFAULT_CLEAR_RGBA
}

/// Frame source selection.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum FramesConfig {
    /// Pre-rasterized image files in one directory.
    Raster {
        /// Frame directory. Relative paths resolve against the config file's directory.
        dir: PathBuf,
        /// Number of frames. `None` counts consecutive files on disk.
        #[serde(default)]
        count: Option<usize>,
        /// File naming scheme.
        #[serde(default)]
        naming: FrameNaming,
    },
    /// Procedurally synthesized paper fold.
    Paper {
        /// Frame width in pixels.
        width: u32,
        /// Frame height in pixels.
        height: u32,
        /// Number of frames in the sequence.
        frame_count: u64,
        /// Texture seed; unseeded textures differ on every build.
        #[serde(default)]
        seed: Option<u64>,
    },
}

/// Mapping curve settings; the frame count comes from the loaded store.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CurveConfig {
    /// Share of the scroll span, in `(0, 1]`, during which the frame changes.
    pub active_fraction: f64,
    /// Play from the last frame to the first as progress increases.
    pub reversed: bool,
    /// Easing on the active segment.
    pub ease: Ease,
}

impl Default for CurveConfig {
    fn default() -> Self {
        Self {
            active_fraction: STOREFRONT_ACTIVE_FRACTION,
            reversed: true,
            ease: Ease::Linear,
        }
    }
}

impl CurveConfig {
    /// Build the curve for a `frame_count`-long sequence.
    pub fn curve(&self, frame_count: u64) -> ScrubResult<MappingCurve> {
        Ok(MappingCurve::new(frame_count, self.active_fraction, self.reversed)?.with_ease(self.ease))
    }
}

/// Scrub lag settings.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SmoothingConfig {
    /// Seconds the rendered progress takes to catch up with the scroll position.
    pub lag_secs: f64,
}

/// Loader settings.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoadConfig {
    /// Loader thread count. `None` uses rayon defaults.
    pub threads: Option<usize>,
}

impl EngineConfig {
    /// The pre-rasterized storefront sequence: 240 `frame_%04d.jpg` files played in reverse over
    /// the first 70% of the scroll span.
    pub fn storefront(dir: impl Into<PathBuf>) -> Self {
        Self {
            frames: FramesConfig::Raster {
                dir: dir.into(),
                count: Some(STOREFRONT_FRAME_COUNT),
                naming: FrameNaming::default(),
            },
            curve: CurveConfig::default(),
            smoothing: Some(SmoothingConfig {
                lag_secs: STOREFRONT_LAG_SECS,
            }),
            load: LoadConfig::default(),
            clear_rgba: DEFAULT_CLEAR_RGBA,
        }
    }

    /// The procedural paper fold: 60 frames played forward over the whole scroll span.
    pub fn paper(width: u32, height: u32, seed: Option<u64>) -> Self {
        Self {
            frames: FramesConfig::Paper {
                width,
                height,
                frame_count: PAPER_FRAME_COUNT,
                seed,
            },
            curve: CurveConfig {
                active_fraction: 1.0,
                reversed: false,
                ease: Ease::Linear,
            },
            smoothing: Some(SmoothingConfig {
                lag_secs: STOREFRONT_LAG_SECS,
            }),
            load: LoadConfig::default(),
            clear_rgba: DEFAULT_CLEAR_RGBA,
        }
    }

    /// Parse and validate a JSON config.
    pub fn from_json_str(s: &str) -> ScrubResult<Self> {
        let cfg: Self = serde_json::from_str(s)
            .map_err(|e| ScrubError::serde(format!("parse engine config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse and validate a JSON config file.
    pub fn from_json_file(path: &Path) -> ScrubResult<Self> {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read engine config '{}'", path.display()))?;
        Self::from_json_str(&s)
    }

    /// Check every field without touching the file system.
    pub fn validate(&self) -> ScrubResult<()> {
        match &self.frames {
            FramesConfig::Raster { count, naming, .. } => {
                naming.validate()?;
                if *count == Some(0) {
                    return Err(ScrubError::validation("raster frame count must be > 0"));
                }
            }
            FramesConfig::Paper {
                width,
                height,
                frame_count,
                ..
            } => {
                Canvas::new(*width, *height)?.to_u16()?;
                if *frame_count == 0 {
                    return Err(ScrubError::validation("paper frame_count must be > 0"));
                }
            }
        }
        // Any positive count yields the same verdict on the curve fields.
        self.curve.curve(1)?;
        if let Some(s) = &self.smoothing {
            ScrubSmoothing::new(s.lag_secs)?;
        }
        if self.load.threads == Some(0) {
            return Err(ScrubError::validation(
                "load 'threads' must be >= 1 when set",
            ));
        }
        Ok(())
    }

    /// Scrub smoother described by this config, if any.
    pub fn smoothing(&self) -> ScrubResult<Option<ScrubSmoothing>> {
        self.smoothing
            .map(|s| ScrubSmoothing::new(s.lag_secs))
            .transpose()
    }

    /// Loader options described by this config.
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            threads: self.load.threads,
            ..LoadOptions::default()
        }
    }

    /// Build a ready frame store: load raster files from disk, or set up the paper generator.
    ///
    /// Relative raster directories resolve against `base_dir`.
    pub fn build_store(
        &self,
        base_dir: &Path,
        opts: &LoadOptions,
        on_event: &(dyn Fn(&LoadEvent) + Sync),
    ) -> ScrubResult<FrameStore> {
        match &self.frames {
            FramesConfig::Raster { dir, count, naming } => {
                let dir = if dir.is_absolute() {
                    dir.clone()
                } else {
                    base_dir.join(dir)
                };
                let source = match count {
                    Some(n) => DirFrameSource::new(dir, naming.clone(), *n)?,
                    None => DirFrameSource::discover(dir, naming.clone())?,
                };
                let mut store = FrameStore::raster();
                store.load(&source, opts, on_event)?;
                Ok(store)
            }
            FramesConfig::Paper {
                width,
                height,
                frame_count,
                seed,
            } => {
                let generator = PaperFrameGenerator::new(Canvas::new(*width, *height)?, *seed)?;
                FrameStore::procedural(Box::new(generator), *frame_count)
            }
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
