//! Asset error type

use std::io;

/// Error loading or decoding an asset
#[derive(Debug)]
pub enum AssetError {
    /// IO error (file not found, permission denied, etc.)
    Io(io::Error),
    /// No file at the requested path
    NotFound(String),
    /// Malformed asset contents
    Parse(String),
    /// Asset exists but is not usable as requested (e.g. wrong shader stage)
    InvalidAsset(String),
}

impl From<io::Error> for AssetError {
    fn from(e: io::Error) -> Self {
        AssetError::Io(e)
    }
}

impl std::fmt::Display for AssetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetError::Io(e) => write!(f, "IO error: {}", e),
            AssetError::NotFound(path) => write!(f, "Asset not found: {}", path),
            AssetError::Parse(msg) => write!(f, "Parse error: {}", msg),
            AssetError::InvalidAsset(msg) => write!(f, "Invalid asset: {}", msg),
        }
    }
}

impl std::error::Error for AssetError {}
