//! Image processing.
//!
//! | Operation | Native | ImageMagick |
//! |---|---|---|
//! | **Identify** | `image::image_dimensions` | `identify -ping` |
//! | **Resize → JPEG** | Lanczos3 + `jpeg-encoder` | `convert -resize` |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension and size math (unit testable)
//! - **Parameters**: Data structures describing a conversion
//! - **Backend**: [`ImageBackend`] trait + [`NativeBackend`] + [`ImageMagickBackend`]

pub mod backend;
mod calculations;
pub mod magick_backend;
pub mod native_backend;
mod params;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::{calculate_target_height, size_percentage};
pub use magick_backend::ImageMagickBackend;
pub use native_backend::NativeBackend;
pub use params::{ChromaSampling, Colorspace, ConvertParams, Quality};
