//! Error types for tagmatch.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias for tagmatch operations.
pub type TagMatchResult<T> = std::result::Result<T, TagMatchError>;

/// Errors that can occur while preprocessing, matching or ranking.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum TagMatchError {
    /// Width or height is zero, or the pixel count overflows.
    #[error("invalid dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// Template does not fit inside the searched image.
    #[error("template {tpl_width}x{tpl_height} larger than image {img_width}x{img_height}")]
    TemplateTooLarge {
        tpl_width: usize,
        tpl_height: usize,
        img_width: usize,
        img_height: usize,
    },
    /// Template statistics make the metric undefined.
    #[error("degenerate template: {reason}")]
    DegenerateTemplate { reason: &'static str },
    /// Decoding or encoding an image failed.
    #[error("image i/o failed for {}: {reason}", path.display())]
    ImageIo { path: PathBuf, reason: String },
    /// Listing the template catalog directory failed.
    #[error("catalog i/o failed for {}: {reason}", path.display())]
    CatalogIo { path: PathBuf, reason: String },
    /// Configuration values are out of range.
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
    /// Analysis was requested without a captured screenshot.
    #[error("no screenshot available for analysis")]
    NoInput,
    /// The run was cancelled between templates.
    #[error("analysis cancelled")]
    Cancelled,
}
