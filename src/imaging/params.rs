//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They sit between
//! the conversion loop in [`convert`](crate::convert), which decides which
//! variants to produce, and the [`backend`](super::backend), which does the
//! pixel work. Both backends accept the same [`ConvertParams`], so the loop
//! never needs to know which one it is talking to.

use std::fmt;
use std::path::PathBuf;

/// JPEG encoding quality (1-100).
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
        Self(85)
    }
}

/// Chroma subsampling of the encoded JPEG. Chroma is always halved in both
/// directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChromaSampling {
    #[default]
    Yuv420,
}

impl fmt::Display for ChromaSampling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChromaSampling::Yuv420 => write!(f, "4:2:0"),
        }
    }
}

/// Colorspace pixels are converted to before encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Colorspace {
    #[default]
    Rgb,
}

impl fmt::Display for Colorspace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Colorspace::Rgb => write!(f, "RGB"),
        }
    }
}

/// Everything a backend needs for one resize + recompress.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub width: u32,
    /// Aspect-preserving height for `width`.
    pub height: u32,
    pub quality: Quality,
    pub progressive: bool,
    pub sampling: ChromaSampling,
    pub colorspace: Colorspace,
}
