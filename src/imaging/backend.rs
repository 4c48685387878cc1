//! Card rendering backend trait and shared types.
//!
//! The [`CardBackend`] trait defines the two operations the pipeline needs:
//! report the template dimensions and compose one card. The production
//! implementation is [`RustBackend`](super::rust_backend::RustBackend) —
//! pure Rust, template decoded once and cloned per card.

use super::params::ComposeParams;
use std::path::PathBuf;
use thiserror::Error;

/// Errors while loading the base image or the overlay font.
///
/// All of these are fatal to the whole run: without a template there is
/// nothing to generate.
#[derive(Error, Debug)]
pub enum AssetLoadError {
    #[error("base image not found: {0}")]
    ImageMissing(PathBuf),
    #[error("failed to decode base image {path}: {reason}")]
    ImageUndecodable { path: PathBuf, reason: String },
    #[error("overlay font not found: {0}")]
    FontMissing(PathBuf),
    #[error("failed to parse overlay font: {0}")]
    FontInvalid(PathBuf),
}

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("compose failed: {0}")]
    ComposeFailed(String),
}

/// Template dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Trait for card rendering backends.
///
/// `Sync` because the generate stage fans cards out over a rayon parallel
/// map with a shared backend reference. Compose must not mutate shared
/// template state — every card gets its own pixel buffer.
pub trait CardBackend: Sync {
    /// Dimensions of the loaded template.
    fn dimensions(&self) -> Dimensions;

    /// Clone the template, draw the text, write the JPEG.
    fn compose(&self, params: &ComposeParams) -> Result<(), BackendError>;
}
