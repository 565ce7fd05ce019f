//! Typed errors for asset and map loading.
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("missing asset: {}", path.display())]
    Missing { path: PathBuf },

    #[error("failed to decode {}: {reason}", path.display())]
    Decode { path: PathBuf, reason: String },

    #[error("no image frames in {}", path.display())]
    EmptyFolder { path: PathBuf },
}

#[derive(Debug, Error)]
pub enum MapError {
    #[error("cannot read map: {0}")]
    Io(#[from] std::io::Error),

    #[error("map has no rows")]
    Empty,
}
