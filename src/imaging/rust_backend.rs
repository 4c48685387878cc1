//! Pure Rust card rendering backend.
//!
//! The base image and the overlay font are loaded once at startup and held
//! in memory; every card starts from a fresh clone of the decoded template,
//! so concurrent compose calls never share a mutable pixel buffer.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG) | `image` crate (pure Rust decoders) |
//! | Font parsing | `ab_glyph::FontVec` |
//! | Text overlay | `imageproc::drawing::draw_text_mut` |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` |

use super::backend::{AssetLoadError, BackendError, CardBackend, Dimensions};
use super::params::ComposeParams;
use ab_glyph::{FontVec, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_text_mut;
use std::path::Path;

/// Backend holding the decoded template and the parsed overlay font.
pub struct RustBackend {
    template: RgbImage,
    font: FontVec,
}

impl RustBackend {
    /// Load the base image and the font. Both failures are fatal — without
    /// a template no card can be generated.
    pub fn open(image_path: &Path, font_path: &Path) -> Result<Self, AssetLoadError> {
        if !image_path.exists() {
            return Err(AssetLoadError::ImageMissing(image_path.to_path_buf()));
        }
        let template = image::open(image_path)
            .map_err(|e| AssetLoadError::ImageUndecodable {
                path: image_path.to_path_buf(),
                reason: e.to_string(),
            })?
            .to_rgb8();

        let font_bytes = std::fs::read(font_path)
            .map_err(|_| AssetLoadError::FontMissing(font_path.to_path_buf()))?;
        let font = FontVec::try_from_vec(font_bytes)
            .map_err(|_| AssetLoadError::FontInvalid(font_path.to_path_buf()))?;

        Ok(Self { template, font })
    }
}

/// Encode an RGB buffer as JPEG at the given quality.
fn save_jpeg(img: &RgbImage, path: &Path, quality: u32) -> Result<(), BackendError> {
    let file = std::fs::File::create(path).map_err(BackendError::Io)?;
    let writer = std::io::BufWriter::new(file);
    image::codecs::jpeg::JpegEncoder::new_with_quality(writer, quality as u8)
        .encode_image(img)
        .map_err(|e| BackendError::ComposeFailed(format!("JPEG encode failed: {}", e)))
}

impl CardBackend for RustBackend {
    fn dimensions(&self) -> Dimensions {
        Dimensions {
            width: self.template.width(),
            height: self.template.height(),
        }
    }

    fn compose(&self, params: &ComposeParams) -> Result<(), BackendError> {
        let mut card = self.template.clone();
        draw_text_mut(
            &mut card,
            Rgb(params.color),
            params.anchor.0,
            params.anchor.1,
            PxScale::from(params.scale),
            &self.font,
            &params.text,
        );
        save_jpeg(&card, &params.output, params.quality.value())
    }
}
