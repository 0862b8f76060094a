use crate::foundation::{
    core::FrameIndex,
    error::{ScrubError, ScrubResult},
};

/// Naming scheme of a pre-rasterized frame set.
///
/// Frames are addressed 1-based on disk: index `0` is `frame_0001`, index `239` is `frame_0240`.
/// This matches `ffmpeg`'s `frame_%04d` image-sequence output.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FrameNaming {
    /// File name prefix.
    pub prefix: String,
    /// Zero-padding width of the 1-based frame number.
    pub digits: usize,
    /// File extension without the dot. Empty means no extension.
    pub ext: String,
}

impl Default for FrameNaming {
    fn default() -> Self {
        Self {
            prefix: "frame_".to_string(),
            digits: 4,
            ext: "jpg".to_string(),
        }
    }
}

impl FrameNaming {
    /// Reject schemes that cannot round-trip through `ffmpeg` patterns or file systems.
    pub fn validate(&self) -> ScrubResult<()> {
        if self.digits == 0 || self.digits > 9 {
            return Err(ScrubError::validation("frame naming digits must be in 1..=9"));
        }
        let bad = |s: &str| s.contains(['/', '\\', '%']);
        if bad(&self.prefix) || bad(&self.ext) {
            return Err(ScrubError::validation(
                "frame naming prefix/ext must not contain path separators or '%'",
            ));
        }
        if self.ext.starts_with('.') {
            return Err(ScrubError::validation(
                "frame naming ext must not start with '.'",
            ));
        }
        Ok(())
    }

    /// Asset name without extension, e.g. `frame_0001` for index 0.
    pub fn asset_name(&self, index: FrameIndex) -> String {
        format!(
            "{}{:0width$}",
            self.prefix,
            index.0 + 1,
            width = self.digits
        )
    }

    /// Asset name with extension, e.g. `frame_0001.jpg`.
    pub fn file_name(&self, index: FrameIndex) -> String {
        if self.ext.is_empty() {
            self.asset_name(index)
        } else {
            format!("{}.{}", self.asset_name(index), self.ext)
        }
    }

    /// Output pattern understood by `ffmpeg`'s image2 muxer, e.g. `frame_%04d.jpg`.
    pub fn ffmpeg_pattern(&self) -> String {
        if self.ext.is_empty() {
            format!("{}%0{}d", self.prefix, self.digits)
        } else {
            format!("{}%0{}d.{}", self.prefix, self.digits, self.ext)
        }
    }

    /// Inverse of [`FrameNaming::file_name`]. Returns `None` for names outside this scheme.
    pub fn parse_file_name(&self, name: &str) -> Option<FrameIndex> {
        let stem = if self.ext.is_empty() {
            name
        } else {
            name.strip_suffix(&self.ext)?.strip_suffix('.')?
        };
        let digits = stem.strip_prefix(&self.prefix)?;
        if digits.len() < self.digits || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let one_based: u64 = digits.parse().ok()?;
        one_based.checked_sub(1).map(FrameIndex)
    }
}

/// Asset name of `index` under the default `frame_%04d` scheme.
pub fn frame_asset_name(index: FrameIndex) -> String {
    FrameNaming::default().asset_name(index)
}

#[cfg(test)]
#[path = "../../tests/unit/frames/naming.rs"]
mod tests;
