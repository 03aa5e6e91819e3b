//! ImageMagick backend: shells out to `identify` and `convert`.
//!
//! Useful when the installed ImageMagick produces output a user prefers, or
//! for comparing against the native encoder. Requires the binaries on `PATH`.

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::params::ConvertParams;
use std::path::Path;
use std::process::Command;

pub struct ImageMagickBackend {
    identify_bin: String,
    convert_bin: String,
}

impl ImageMagickBackend {
    pub fn new() -> Self {
        Self {
            identify_bin: "identify".to_string(),
            convert_bin: "convert".to_string(),
        }
    }
}

impl Default for ImageMagickBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse `identify -format "%w:%h"` output. Quotes and whitespace are tolerated.
fn parse_dimensions(output: &str) -> Option<Dimensions> {
    let cleaned = output.trim().trim_matches('"');
    let (w, h) = cleaned.split_once(':')?;
    Some(Dimensions {
        width: w.trim().parse().ok()?,
        height: h.trim().parse().ok()?,
    })
}

/// Arguments for `convert`, in the order ImageMagick expects them.
fn convert_args(params: &ConvertParams) -> Vec<String> {
    let mut args = vec![
        params.source.to_string_lossy().into_owned(),
        "-resize".to_string(),
        params.width.to_string(),
        "-sampling-factor".to_string(),
        params.sampling.to_string(),
        "-colorspace".to_string(),
        params.colorspace.to_string(),
        "-quality".to_string(),
        params.quality.value().to_string(),
    ];
    if params.progressive {
        args.push("-interlace".to_string());
        args.push("JPEG".to_string());
    }
    args.push(params.output.to_string_lossy().into_owned());
    args
}

fn run(bin: &str, args: &[String]) -> Result<Vec<u8>, BackendError> {
    tracing::debug!(bin, ?args, "running ImageMagick");
    let output = Command::new(bin).args(args).output()?;
    if !output.status.success() {
        return Err(BackendError::ProcessingFailed(format!(
            "{} exited with {}: {}",
            bin,
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }
    Ok(output.stdout)
}

impl ImageBackend for ImageMagickBackend {
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        let args = vec![
            "-ping".to_string(),
            "-format".to_string(),
            "%w:%h".to_string(),
            path.to_string_lossy().into_owned(),
        ];
        let stdout = run(&self.identify_bin, &args)?;
        let text = String::from_utf8_lossy(&stdout);
        parse_dimensions(&text).ok_or_else(|| {
            BackendError::ProcessingFailed(format!("Unexpected identify output: {}", text.trim()))
        })
    }

    fn convert(&self, params: &ConvertParams) -> Result<(), BackendError> {
        run(&self.convert_bin, &convert_args(params))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::params::{ChromaSampling, Colorspace, Quality};

    fn params(progressive: bool) -> ConvertParams {
        ConvertParams {
            source: "/in/photo.jpg".into(),
            output: "/out/photo-m.jpg".into(),
            width: 800,
            height: 600,
            quality: Quality::new(75),
            progressive,
            sampling: ChromaSampling::Yuv420,
            colorspace: Colorspace::Rgb,
        }
    }

    #[test]
    fn parse_plain_dimensions() {
        assert_eq!(
            parse_dimensions("1024:768"),
            Some(Dimensions {
                width: 1024,
                height: 768
            })
        );
    }

    #[test]
    fn parse_quoted_dimensions() {
        assert_eq!(
            parse_dimensions("\"640:480\"\n"),
            Some(Dimensions {
                width: 640,
                height: 480
            })
        );
    }

    #[test]
    fn parse_garbage_dimensions() {
        assert_eq!(parse_dimensions("identify: no decode delegate"), None);
        assert_eq!(parse_dimensions("12:abc"), None);
    }

    #[test]
    fn baseline_convert_args() {
        assert_eq!(
            convert_args(&params(false)),
            vec![
                "/in/photo.jpg",
                "-resize",
                "800",
                "-sampling-factor",
                "4:2:0",
                "-colorspace",
                "RGB",
                "-quality",
                "75",
                "/out/photo-m.jpg",
            ]
        );
    }

    #[test]
    fn progressive_convert_args_interlace_before_output() {
        let args = convert_args(&params(true));
        let n = args.len();
        assert_eq!(&args[n - 3..], &["-interlace", "JPEG", "/out/photo-m.jpg"]);
    }

    #[test]
    fn missing_binary_is_io_error() {
        let backend = ImageMagickBackend {
            identify_bin: "argo-no-such-identify".to_string(),
            convert_bin: "argo-no-such-convert".to_string(),
        };
        let result = backend.identify(Path::new("/in/photo.jpg"));
        assert!(matches!(result, Err(BackendError::Io(_))));
    }

    #[test]
    #[ignore] // Requires ImageMagick
    fn identify_real_image() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("gray.jpg");
        Command::new("convert")
            .args(["-size", "120x80", "xc:gray", path.to_str().unwrap()])
            .output()
            .unwrap();

        let dims = ImageMagickBackend::new().identify(&path).unwrap();
        assert_eq!(
            dims,
            Dimensions {
                width: 120,
                height: 80
            }
        );
    }
}
