//! Image loading pipeline for Pixblit.
//!
//! This module provides functionality for:
//! - Decoding image files (JPEG, PNG) into straight-alpha RGBA buffers
//! - EXIF orientation correction
//! - Exact-dimension RGBA resizing
//!
//! Decoding itself is delegated to the `image` crate; this module owns the
//! conversion into [`SourceImage`], the buffer type the compositing
//! pipeline consumes. The `image` crate passes image handles explicitly,
//! so loads carry no shared decoder state and need no external
//! serialization.

mod loader;
mod resize;
mod types;

pub use loader::{load_image, load_image_from_bytes};
pub use resize::resize;
pub use types::{DecodeError, FilterType, Orientation, SourceImage};
