/// Convenience result type used across bannerkit.
pub type BannerResult<T> = Result<T, BannerError>;

/// Top-level error taxonomy used by the compositing pipeline.
#[derive(thiserror::Error, Debug)]
pub enum BannerError {
    /// Source or watermark bytes could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// The crop region is missing, empty or outside the source image.
    #[error("invalid crop: {0}")]
    InvalidCrop(String),

    /// The requested export format/quality cannot be produced.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// Invalid user-provided parameters (colors, fonts, paths).
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while drawing layers onto surfaces.
    #[error("render error: {0}")]
    Render(String),

    /// Errors when serializing or deserializing edit documents.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BannerError {
    /// Build a [`BannerError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`BannerError::InvalidCrop`] value.
    pub fn invalid_crop(msg: impl Into<String>) -> Self {
        Self::InvalidCrop(msg.into())
    }

    /// Build a [`BannerError::Encoding`] value.
    pub fn encoding(msg: impl Into<String>) -> Self {
        Self::Encoding(msg.into())
    }

    /// Build a [`BannerError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`BannerError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`BannerError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
