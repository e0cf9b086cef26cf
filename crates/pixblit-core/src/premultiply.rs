//! Premultiplied-alpha scratch images.
//!
//! Decoders hand out straight-alpha RGBA while the destination surface
//! compositing model wants premultiplied alpha. The bridge is a scratch
//! image born opaque black: blending a straight-alpha source over it turns
//! the color channels into `color * alpha`, and copying the source's alpha
//! channel on top yields `(rgb_premultiplied, source_alpha)`. The finished
//! scratch can then be viewed, without copying, as a
//! [`tiny_skia::PixmapRef`].

use tiny_skia::PixmapRef;

use crate::decode::SourceImage;

/// A premultiplied RGBA pixel buffer (4 bytes per pixel, row-major).
#[derive(Debug, Clone)]
pub struct PremulImage {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PremulImage {
    /// Allocate a scratch image filled with opaque black (0, 0, 0, 255).
    ///
    /// Returns `None` if either dimension is zero, the byte length
    /// overflows, or the buffer cannot be allocated.
    pub fn opaque_black(width: u32, height: u32) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        let len = (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(4)?;

        let mut data = Vec::new();
        data.try_reserve_exact(len).ok()?;
        data.resize(len, 0);
        for px in data.chunks_exact_mut(4) {
            px[3] = 0xFF;
        }

        Some(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw premultiplied RGBA bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Blend a straight-alpha source over this image ("over" operator).
    ///
    /// Over an opaque black background this leaves `source_rgb * alpha` in
    /// the color channels. Dimensions must match; the source is expected to
    /// be pre-scaled to this image's size.
    pub fn blend_over(&mut self, src: &SourceImage) {
        debug_assert_eq!(
            (self.width, self.height),
            (src.width, src.height),
            "Blend size mismatch"
        );

        for (dst, s) in self.data.chunks_exact_mut(4).zip(src.pixels.chunks_exact(4)) {
            let sa = u16::from(s[3]);
            if sa == 0 {
                continue;
            }
            let inv = 255 - sa;

            for i in 0..3 {
                let sc = mul_div255(u16::from(s[i]), sa);
                let dc = mul_div255(u16::from(dst[i]), inv);
                dst[i] = sc.saturating_add(dc);
            }
            dst[3] = (sa as u8).saturating_add(mul_div255(u16::from(dst[3]), inv));
        }
    }

    /// Replace this image's alpha channel with the source's.
    ///
    /// Used after [`blend_over`](Self::blend_over) on an opaque-black
    /// scratch, where the blend leaves everything opaque; the source alpha
    /// completes the premultiplied encoding.
    pub fn copy_alpha_from(&mut self, src: &SourceImage) {
        debug_assert_eq!(
            (self.width, self.height),
            (src.width, src.height),
            "Alpha copy size mismatch"
        );

        for (dst, s) in self.data.chunks_exact_mut(4).zip(src.pixels.chunks_exact(4)) {
            dst[3] = s[3];
        }
    }

    /// View the raw pixel memory as a premultiplied tiny-skia surface.
    ///
    /// Zero-copy; the returned view borrows this image and cannot outlive
    /// it.
    pub fn as_pixmap_ref(&self) -> Option<PixmapRef<'_>> {
        PixmapRef::from_bytes(&self.data, self.width, self.height)
    }
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}
