//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the two operations the conversion loop
//! needs: identify and convert.
//!
//! | Backend | Identify | Convert |
//! |---|---|---|
//! | [`NativeBackend`](super::native_backend::NativeBackend) | `image::image_dimensions` | `image` decode + Lanczos3, `jpeg-encoder` |
//! | [`ImageMagickBackend`](super::magick_backend::ImageMagickBackend) | `identify -ping` | `convert -resize` |

use super::params::ConvertParams;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Trait for image processing backends.
pub trait ImageBackend {
    /// Get image dimensions.
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError>;

    /// Resize and recompress `params.source` into `params.output`.
    fn convert(&self, params: &ConvertParams) -> Result<(), BackendError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::imaging::params::Quality;
    use std::sync::Mutex;

    /// Mock backend that records operations instead of touching pixels.
    ///
    /// `convert` writes `output_bytes` zero bytes to the output path so size
    /// reporting has something to measure.
    pub struct MockBackend {
        pub dimensions: Dimensions,
        pub output_bytes: usize,
        /// Sources whose file name contains one of these fail to identify.
        pub unreadable: Vec<String>,
        /// Outputs whose file name contains one of these fail to convert.
        pub failing: Vec<String>,
        pub operations: Mutex<Vec<RecordedOp>>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum RecordedOp {
        Identify(String),
        Convert {
            source: String,
            output: String,
            width: u32,
            height: u32,
            quality: u32,
            progressive: bool,
        },
    }

    impl Default for MockBackend {
        fn default() -> Self {
            Self {
                dimensions: Dimensions {
                    width: 2000,
                    height: 1500,
                },
                output_bytes: 512,
                unreadable: Vec::new(),
                failing: Vec::new(),
                operations: Mutex::new(Vec::new()),
            }
        }
    }

    impl MockBackend {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_dimensions(width: u32, height: u32) -> Self {
            Self {
                dimensions: Dimensions { width, height },
                ..Self::default()
            }
        }

        pub fn get_operations(&self) -> Vec<RecordedOp> {
            self.operations.lock().unwrap().clone()
        }

        pub fn converted_outputs(&self) -> Vec<String> {
            self.get_operations()
                .into_iter()
                .filter_map(|op| match op {
                    RecordedOp::Convert { output, .. } => Some(output),
                    _ => None,
                })
                .collect()
        }
    }

    fn name_matches(path: &Path, needles: &[String]) -> bool {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        needles.iter().any(|n| name.contains(n.as_str()))
    }

    impl ImageBackend for MockBackend {
        fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
            self.operations
                .lock()
                .unwrap()
                .push(RecordedOp::Identify(path.to_string_lossy().to_string()));

            if name_matches(path, &self.unreadable) {
                return Err(BackendError::ProcessingFailed("not a JPEG".to_string()));
            }
            Ok(self.dimensions)
        }

        fn convert(&self, params: &ConvertParams) -> Result<(), BackendError> {
            self.operations.lock().unwrap().push(RecordedOp::Convert {
                source: params.source.to_string_lossy().to_string(),
                output: params.output.to_string_lossy().to_string(),
                width: params.width,
                height: params.height,
                quality: params.quality.value(),
                progressive: params.progressive,
            });

            if name_matches(&params.output, &self.failing) {
                return Err(BackendError::ProcessingFailed("encoder gave up".to_string()));
            }
            std::fs::write(&params.output, vec![0u8; self.output_bytes])?;
            Ok(())
        }
    }

    #[test]
    fn mock_records_identify() {
        let backend = MockBackend::with_dimensions(800, 600);

        let result = backend.identify(Path::new("/test/image.jpg")).unwrap();
        assert_eq!(result.width, 800);
        assert_eq!(result.height, 600);

        let ops = backend.get_operations();
        assert_eq!(ops.len(), 1);
        assert!(matches!(&ops[0], RecordedOp::Identify(p) if p == "/test/image.jpg"));
    }

    #[test]
    fn mock_writes_output_on_convert() {
        let tmp = tempfile::TempDir::new().unwrap();
        let output = tmp.path().join("out.jpg");
        let backend = MockBackend::new();

        backend
            .convert(&ConvertParams {
                source: "/source.jpg".into(),
                output: output.clone(),
                width: 800,
                height: 600,
                quality: Quality::new(70),
                progressive: true,
                sampling: Default::default(),
                colorspace: Default::default(),
            })
            .unwrap();

        assert_eq!(std::fs::metadata(&output).unwrap().len(), 512);
        assert!(matches!(
            &backend.get_operations()[0],
            RecordedOp::Convert {
                width: 800,
                quality: 70,
                progressive: true,
                ..
            }
        ));
    }
}
