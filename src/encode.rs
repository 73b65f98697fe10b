use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::foundation::error::{BannerError, BannerResult};

pub(crate) mod export;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Png,
    Jpeg,
    Webp,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Webp => "webp",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Webp => "image/webp",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = BannerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "jpeg" | "jpg" => Ok(Self::Jpeg),
            "webp" => Ok(Self::Webp),
            other => Err(BannerError::encoding(format!(
                "unsupported export format '{other}' (expected png, jpeg or webp)"
            ))),
        }
    }
}

/// Output format and quality. Quality is in `[0, 1]` and ignored for png.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ExportSpec {
    pub format: ExportFormat,
    pub quality: f64,
}

impl Default for ExportSpec {
    fn default() -> Self {
        Self {
            format: ExportFormat::Png,
            quality: 0.92,
        }
    }
}

/// Encoded output of one export.
#[derive(Clone, Debug)]
pub struct ExportedImage {
    pub bytes: Vec<u8>,
    pub format: ExportFormat,
    pub width: u32,
    pub height: u32,
    pub filename: String,
}

impl ExportedImage {
    /// Write to `dir/<filename>` through a temporary file renamed into place.
    ///
    /// On failure the temporary file is removed and no file appears under the final name.
    pub fn write_to_dir(&self, dir: &Path) -> BannerResult<PathBuf> {
        use anyhow::Context as _;

        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create output directory '{}'", dir.display()))?;
        let out_path = dir.join(&self.filename);
        let tmp_path = dir.join(format!(".{}.partial", self.filename));

        let written = std::fs::write(&tmp_path, &self.bytes)
            .with_context(|| format!("failed to write '{}'", tmp_path.display()))
            .and_then(|()| {
                std::fs::rename(&tmp_path, &out_path).with_context(|| {
                    format!("failed to move export into '{}'", out_path.display())
                })
            });
        if let Err(e) = written {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(e.into());
        }

        tracing::debug!(path = %out_path.display(), bytes = self.bytes.len(), "wrote export");
        Ok(out_path)
    }
}

#[cfg(test)]
#[path = "../tests/unit/encode.rs"]
mod tests;
