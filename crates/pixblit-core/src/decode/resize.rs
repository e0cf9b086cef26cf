//! RGBA resizing for the compositing pipeline.

use super::{DecodeError, FilterType, SourceImage};

/// Resize an image to exact dimensions.
///
/// Alpha is interpolated alongside the color channels, so straight-alpha
/// data stays straight-alpha.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` if either target dimension is zero
/// and `DecodeError::CorruptedFile` if the source buffer is malformed.
pub fn resize(
    image: &SourceImage,
    width: u32,
    height: u32,
    filter: FilterType,
) -> Result<SourceImage, DecodeError> {
    if width == 0 || height == 0 {
        return Err(DecodeError::InvalidFormat);
    }

    // Fast path: if dimensions match, just clone
    if image.width == width && image.height == height {
        return Ok(image.clone());
    }

    let rgba_image = image
        .to_rgba_image()
        .ok_or_else(|| DecodeError::CorruptedFile("Failed to create RgbaImage".to_string()))?;

    let resized = image::imageops::resize(&rgba_image, width, height, filter.to_image_filter());

    Ok(SourceImage::from_rgba_image(resized))
}
