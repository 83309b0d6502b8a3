// Error types for the download core

use std::fmt;

#[derive(Debug, Clone)]
pub enum DownloadError {
    /// URL failed validation; no engine call was attempted
    InvalidUrl(String),

    /// Engine returned no usable data for the URL
    NotFound(String),

    /// Network/site/parsing failure inside the resolution engine
    EngineFault(String),

    /// Audio transcoding toolchain (ffmpeg) is not installed
    ToolchainMissing(String),
}

impl DownloadError {
    /// Message suitable for user-facing display.
    pub fn display_message(&self) -> &str {
        match self {
            Self::InvalidUrl(msg)
            | Self::NotFound(msg)
            | Self::EngineFault(msg)
            | Self::ToolchainMissing(msg) => msg,
        }
    }
}

impl fmt::Display for DownloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidUrl(url) => write!(f, "Invalid URL: {}", url),
            Self::NotFound(msg) => write!(f, "Nothing found: {}", msg),
            Self::EngineFault(msg) => write!(f, "Engine error: {}", msg),
            Self::ToolchainMissing(tool) => write!(f, "Toolchain missing: {}", tool),
        }
    }
}

impl std::error::Error for DownloadError {}

impl From<std::io::Error> for DownloadError {
    fn from(e: std::io::Error) -> Self {
        Self::EngineFault(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_keeps_original_message() {
        let err = DownloadError::EngineFault("HTTP Error 403: Forbidden".to_string());
        assert!(err.to_string().contains("HTTP Error 403"));
        assert_eq!(err.display_message(), "HTTP Error 403: Forbidden");
    }

    #[test]
    fn io_error_maps_to_engine_fault() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err: DownloadError = io.into();
        assert!(matches!(err, DownloadError::EngineFault(_)));
    }
}
