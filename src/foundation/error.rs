/// Crate-wide result alias.
pub type GlyphcastResult<T> = Result<T, GlyphcastError>;

/// Error type for the decode/composite/render pipeline.
#[derive(thiserror::Error, Debug)]
pub enum GlyphcastError {
    /// The source file could not be read or is not a valid animated GIF.
    #[error("decode error: {0}")]
    Decode(String),

    /// Invalid configuration supplied to the pipeline.
    #[error("config error: {0}")]
    Config(String),

    /// Rendering failed, including internal invariant violations.
    #[error("render error: {0}")]
    Render(String),

    /// The run was cancelled before completing.
    #[error("cancelled")]
    Cancelled,

    /// Any other error, wrapped.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GlyphcastError {
    /// Build a [`GlyphcastError::Decode`].
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`GlyphcastError::Config`].
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`GlyphcastError::Render`].
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            GlyphcastError::decode("x")
                .to_string()
                .contains("decode error:")
        );
        assert!(
            GlyphcastError::config("x")
                .to_string()
                .contains("config error:")
        );
        assert!(
            GlyphcastError::render("x")
                .to_string()
                .contains("render error:")
        );
        assert_eq!(GlyphcastError::Cancelled.to_string(), "cancelled");
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = GlyphcastError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }
}
