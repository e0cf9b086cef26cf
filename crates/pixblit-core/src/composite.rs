//! The image compositing pipeline.
//!
//! A single synchronous pass: decode, validate, scale, premultiply, blit.
//! Each stage is gated and the call returns at the first failed gate with a
//! [`CompositeError`] naming the stage. On any failure the destination
//! pixmap is left untouched.
//!
//! Two gates intentionally use a conjunction rather than the intuitive
//! disjunction: a scale pair or a dimension pair is rejected only when
//! *both* values are degenerate. A single degenerate axis passes the gates
//! and surfaces later as an allocation failure, with the computed output
//! size still reported. Callers rely on this shape; see
//! [`CompositeError::scaled_size`].

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tiny_skia::{Pixmap, PixmapPaint, Transform};
use tracing::{debug, error};

use crate::decode::{self, DecodeError, FilterType, SourceImage};
use crate::premultiply::PremulImage;

/// Output dimensions of a composite, as exact scale/dimension products.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaledSize {
    pub width: f64,
    pub height: f64,
}

impl ScaledSize {
    fn of(source: &SourceImage, scale_x: f64, scale_y: f64) -> Self {
        Self {
            width: scale_x * f64::from(source.width),
            height: scale_y * f64::from(source.height),
        }
    }

    /// Scratch buffer dimensions: fractional parts are truncated, negative
    /// and non-finite values collapse to zero.
    pub fn to_pixel_size(self) -> (u32, u32) {
        (self.width as u32, self.height as u32)
    }
}

impl fmt::Display for ScaledSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Error types for the compositing pipeline, in detection order.
#[derive(Debug, Error)]
pub enum CompositeError {
    /// The image file could not be read or decoded.
    #[error("Couldn't load image: {0}")]
    Decode(#[from] DecodeError),

    /// Both scale factors are zero or negative.
    #[error("Image scale is degenerate on both axes ({scale_x} x {scale_y})")]
    InvalidScale { scale_x: f64, scale_y: f64 },

    /// Both natural dimensions of the source image are zero.
    #[error("Image has zero size")]
    DegenerateSize { scaled: ScaledSize },

    /// Both scaled dimensions are zero or negative.
    #[error("Scaled image has zero size ({scaled})")]
    DegenerateScaledSize { scaled: ScaledSize },

    /// The scratch image could not be allocated.
    #[error("Couldn't create a {scaled} scratch image")]
    Allocation { scaled: ScaledSize },
}

impl CompositeError {
    /// The computed output size, when the pipeline got far enough to
    /// compute one.
    ///
    /// `Decode` and `InvalidScale` fail before the source dimensions are
    /// multiplied out and carry nothing; every later failure reports the
    /// (possibly degenerate) product. The size is meaningful if and only
    /// if it is present.
    pub fn scaled_size(&self) -> Option<ScaledSize> {
        match self {
            CompositeError::Decode(_) | CompositeError::InvalidScale { .. } => None,
            CompositeError::DegenerateSize { scaled }
            | CompositeError::DegenerateScaledSize { scaled }
            | CompositeError::Allocation { scaled } => Some(*scaled),
        }
    }
}

/// Load an image file, scale it, and blend it onto `dest` at `(x, y)`.
///
/// Uses bilinear interpolation; see [`composite_with_filter`] to choose.
///
/// # Errors
///
/// Any gate failure returns the matching [`CompositeError`] and leaves
/// `dest` untouched.
pub fn composite(
    path: impl AsRef<Path>,
    dest: &mut Pixmap,
    x: i32,
    y: i32,
    scale_x: f64,
    scale_y: f64,
) -> Result<ScaledSize, CompositeError> {
    composite_with_filter(path, dest, x, y, scale_x, scale_y, FilterType::default())
}

/// Load an image file, scale it with `filter`, and blend it onto `dest` at
/// `(x, y)`.
///
/// Returns the scaled dimensions as exact `scale * natural_dimension`
/// products. Failures are also reported as error-level tracing events
/// naming the file.
pub fn composite_with_filter(
    path: impl AsRef<Path>,
    dest: &mut Pixmap,
    x: i32,
    y: i32,
    scale_x: f64,
    scale_y: f64,
    filter: FilterType,
) -> Result<ScaledSize, CompositeError> {
    let path = path.as_ref();
    let result = decode::load_image(path)
        .map_err(CompositeError::from)
        .and_then(|source| {
            composite_image_with_filter(&source, dest, x, y, scale_x, scale_y, filter)
        });

    match &result {
        Ok(scaled) => debug!(path = %path.display(), %scaled, "composited image"),
        Err(err) => error!(path = %path.display(), %err, "image composite failed"),
    }
    result
}

/// Scale an already-decoded image and blend it onto `dest` at `(x, y)`.
pub fn composite_image(
    source: &SourceImage,
    dest: &mut Pixmap,
    x: i32,
    y: i32,
    scale_x: f64,
    scale_y: f64,
) -> Result<ScaledSize, CompositeError> {
    composite_image_with_filter(source, dest, x, y, scale_x, scale_y, FilterType::default())
}

/// Scale an already-decoded image with `filter` and blend it onto `dest`
/// at `(x, y)`.
pub fn composite_image_with_filter(
    source: &SourceImage,
    dest: &mut Pixmap,
    x: i32,
    y: i32,
    scale_x: f64,
    scale_y: f64,
    filter: FilterType,
) -> Result<ScaledSize, CompositeError> {
    // Conjunction: one non-positive axis alone passes this gate
    if scale_x <= 0.0 && scale_y <= 0.0 {
        return Err(CompositeError::InvalidScale { scale_x, scale_y });
    }

    let scaled = ScaledSize::of(source, scale_x, scale_y);

    // Same conjunction for the natural size
    if source.width == 0 && source.height == 0 {
        return Err(CompositeError::DegenerateSize { scaled });
    }
    if scaled.width <= 0.0 && scaled.height <= 0.0 {
        return Err(CompositeError::DegenerateScaledSize { scaled });
    }

    let (scratch_w, scratch_h) = scaled.to_pixel_size();
    let mut scratch = PremulImage::opaque_black(scratch_w, scratch_h)
        .ok_or(CompositeError::Allocation { scaled })?;

    // Blending over the opaque-black substrate premultiplies the color
    // channels; the source alpha then completes the encoding.
    let scaled_source = decode::resize(source, scratch_w, scratch_h, filter)?;
    scratch.blend_over(&scaled_source);
    scratch.copy_alpha_from(&scaled_source);

    let view = scratch
        .as_pixmap_ref()
        .ok_or(CompositeError::Allocation { scaled })?;
    dest.draw_pixmap(x, y, view, &PixmapPaint::default(), Transform::identity(), None);

    Ok(scaled)
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use proptest::prelude::*;

    use super::*;

    fn dimensions_strategy() -> impl Strategy<Value = (u32, u32)> {
        (1u32..=48, 1u32..=48)
    }

    fn scale_strategy() -> impl Strategy<Value = f64> {
        0.01f64..=4.0
    }

    fn checkerboard(width: u32, height: u32) -> SourceImage {
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                let v = if (x + y) % 2 == 0 { 220 } else { 35 };
                pixels.extend_from_slice(&[v, v / 2, v / 3, ((x * 31 + y * 7) % 256) as u8]);
            }
        }
        SourceImage::new(width, height, pixels)
    }

    proptest! {
        /// Property: the reported size is the exact IEEE product of scale
        /// and natural dimension, on success and failure alike.
        #[test]
        fn prop_reported_size_is_exact_product(
            (width, height) in dimensions_strategy(),
            scale_x in scale_strategy(),
            scale_y in scale_strategy(),
        ) {
            let source = checkerboard(width, height);
            let mut dest = Pixmap::new(256, 256).unwrap();

            let scaled = match composite_image(&source, &mut dest, 0, 0, scale_x, scale_y) {
                Ok(scaled) => scaled,
                Err(err) => err.scaled_size().expect("positive scales pass the early gates"),
            };
            prop_assert_eq!(scaled.width, scale_x * f64::from(width));
            prop_assert_eq!(scaled.height, scale_y * f64::from(height));
        }

        /// Property: premultiplied color channels never exceed alpha after
        /// the blend-then-copy-alpha sequence.
        #[test]
        fn prop_premultiplied_rgb_bounded_by_alpha(
            (width, height) in dimensions_strategy(),
        ) {
            let source = checkerboard(width, height);
            let mut scratch = PremulImage::opaque_black(width, height).unwrap();
            scratch.blend_over(&source);
            scratch.copy_alpha_from(&source);

            for px in scratch.data().chunks_exact(4) {
                prop_assert!(px[0] <= px[3]);
                prop_assert!(px[1] <= px[3]);
                prop_assert!(px[2] <= px[3]);
            }
        }
    }
}
