//! Error types for patch queries and ingest.

use thiserror::Error;

use crate::geom::GeometryError;
use crate::query::ModeError;
use crate::reproject::ReprojectError;

/// Result type alias using the crate's [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Query rectangle rejected by the validator
    #[error("invalid geometry: {0}")]
    Geometry(#[from] GeometryError),

    /// Containment mode or geometric relation outside the supported sets
    #[error("unsupported mode: {0}")]
    Mode(#[from] ModeError),

    /// Ingest unit could not be reprojected
    #[error("reprojection failed: {0}")]
    Reproject(#[from] ReprojectError),

    /// Store rejected or failed an operation
    #[error("store error: {0}")]
    Store(String),
}

impl Error {
    /// True for request rejections that surface to callers as an empty result.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Error::Geometry(_) | Error::Mode(_))
    }
}
