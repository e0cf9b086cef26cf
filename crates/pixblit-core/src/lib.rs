//! Pixblit Core - Image compositing library
//!
//! This crate bridges straight-alpha image decoding into premultiplied-alpha
//! surface compositing: it loads an image file, scales it, converts the
//! pixels to premultiplied form, and blends the result onto a
//! [`tiny_skia::Pixmap`] at a given position.
//!
//! The whole operation is a single synchronous call:
//!
//! ```ignore
//! use pixblit_core::composite;
//!
//! let mut surface = tiny_skia::Pixmap::new(800, 600).unwrap();
//! let scaled = composite("icon.png", &mut surface, 10, 10, 2.0, 2.0)?;
//! println!("drew {}x{}", scaled.width, scaled.height);
//! ```

pub mod composite;
pub mod decode;
pub mod premultiply;

pub use composite::{
    composite, composite_image, composite_image_with_filter, composite_with_filter,
    CompositeError, ScaledSize,
};
pub use decode::{load_image, load_image_from_bytes, DecodeError, FilterType, SourceImage};
pub use premultiply::PremulImage;
