//! Error taxonomy shared by all loaders.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssetError {
    /// File missing or unreadable.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Image codec rejected the file.
    #[error("Failed to decode image {}: {source}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Malformed OBJ input; `line` is 1-based.
    #[error("Malformed OBJ line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Invalid dither input: {0}")]
    InvalidDither(String),
}

impl AssetError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(line_no: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line: line_no + 1,
            message: message.into(),
        }
    }
}

pub type AssetResult<T> = Result<T, AssetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_reports_one_based_line() {
        let err = AssetError::parse(0, "missing x coordinate");
        assert_eq!(
            err.to_string(),
            "Malformed OBJ line 1: missing x coordinate"
        );
    }
}
