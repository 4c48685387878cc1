//! Parameter types for card composition.
//!
//! These structs describe *what* to draw, not *how* to draw it. They are the
//! interface between the [`pipeline`](crate::pipeline) (which decides which
//! cards to make) and the [`backend`](super::backend) (which does the actual
//! pixel work). The separation allows swapping backends (e.g. for testing
//! with a mock) without changing stage logic.

use std::path::PathBuf;

/// Quality setting for lossy JPEG encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(90)
    }
}

/// Full specification for one card: text, placement, style, destination.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposeParams {
    /// Text drawn onto the template clone (the lowercased handle).
    pub text: String,
    /// Top-left pixel position of the text.
    pub anchor: (i32, i32),
    /// Font size in pixels.
    pub scale: f32,
    /// RGB text color.
    pub color: [u8; 3],
    pub quality: Quality,
    /// Destination path for the encoded JPEG.
    pub output: PathBuf,
}
