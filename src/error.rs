use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::container::ContainerError;
use crate::package::PackageError;

/// Fatal diagram build errors.
///
/// Unrecognised lines and degenerate layouts are recovered from silently and
/// never show up here. When any of these is returned, no usable output exists.
#[derive(Debug, Error)]
pub enum DiagramError {
    #[error("Cannot read feature file {}: {source}", .path.display())]
    InputNotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Feature has {count} nodes, more than the limit of {limit}")]
    TooManyNodes { count: usize, limit: usize },

    #[error("Assembled package is invalid: {0}")]
    InvalidPackage(#[from] PackageError),

    #[error("Failed to write diagram package: {0}")]
    Write(#[from] ContainerError),
}
