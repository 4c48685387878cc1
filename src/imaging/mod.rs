//! Card rendering — pure Rust, zero external dependencies.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode base image** | `image::open` (JPEG, PNG) |
//! | **Clone per card** | `RgbImage::clone` (independent pixel buffer) |
//! | **Text overlay** | `imageproc::drawing::draw_text_mut` + `ab_glyph` |
//! | **Encode → JPEG** | `image::codecs::jpeg::JpegEncoder` |
//!
//! The module is split into:
//! - **Parameters**: data structures describing a compose operation
//! - **Backend**: [`CardBackend`] trait + [`RustBackend`]

pub mod backend;
pub mod params;
pub mod rust_backend;

pub use backend::{AssetLoadError, BackendError, CardBackend, Dimensions};
pub use params::{ComposeParams, Quality};
pub use rust_backend::RustBackend;
