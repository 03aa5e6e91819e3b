//! The conversion loop.
//!
//! For every `.jpg` in the input folder, and for every declared variant in
//! order:
//!
//! 1. resolve the output path (`<stem><suffix>.<ext>` in the output folder),
//! 2. leave it alone if it exists and `NoOverwrite` is set,
//! 3. hand width, quality, progressive mode, 4:2:0 sampling and RGB
//!    colorspace to the [`ImageBackend`],
//! 4. measure the result against the original.
//!
//! ```text
//! originals/                         resized/
//! ├── dawn.jpg   ──┬── -large 2048 ──→ dawn-large.jpg
//! │                ├── -medium 1024 ─→ dawn-medium.jpg
//! │                └── -small 512 ───→ dawn-small.jpg
//! ├── notes.txt      (skipped: not a .jpg)
//! └── drafts/        (directories are ignored)
//! ```
//!
//! Processing is strictly sequential. Failures below the directory level
//! (an unreadable image, a failed encode) are reported and the loop moves on;
//! only problems with the folders themselves abort the run.
//!
//! Progress is reported through [`ConvertEvent`]s handed to a caller-supplied
//! callback, which keeps terminal formatting in [`output`](crate::output).

use crate::config::{Config, Variant};
use crate::imaging::{
    ChromaSampling, Colorspace, ConvertParams, Dimensions, ImageBackend,
    calculate_target_height, size_percentage,
};
use crate::naming::{is_convertible, variant_paths};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Could not read input folder {path}: {source}")]
    InputFolder {
        path: PathBuf,
        source: walkdir::Error,
    },
    #[error("Input folder {0} is not a directory")]
    NotADirectory(PathBuf),
    #[error("Could not prepare output folder {path}: {source}")]
    OutputFolder {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// A source image that passed identification.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceImage {
    pub path: PathBuf,
    pub file_name: String,
    pub dimensions: Dimensions,
    pub bytes: u64,
}

/// What happened to one variant of one source.
#[derive(Debug, Clone, PartialEq)]
pub enum VariantOutcome {
    /// Output already existed and `NoOverwrite` is set.
    Exists,
    Written {
        bytes: u64,
        /// Output size relative to the source, `None` for an empty source.
        percentage: Option<f64>,
    },
    Failed {
        error: String,
    },
}

/// Why a whole file was passed over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Not a `.jpg`.
    Unsupported,
    /// Narrower than `MinWidth`.
    BelowMinWidth { width: u32, min_width: u32 },
}

/// Progress events, in the order they occur.
#[derive(Debug, Clone, PartialEq)]
pub enum ConvertEvent {
    Started {
        input: PathBuf,
        output: PathBuf,
        files: usize,
    },
    FileStarted {
        file_name: String,
        index: usize,
        total: usize,
    },
    FileSkipped {
        file_name: String,
        reason: SkipReason,
    },
    FileFailed {
        file_name: String,
        error: String,
    },
    Original {
        dimensions: Dimensions,
        bytes: u64,
    },
    /// The source is narrower than the variant and will be enlarged.
    Upscale { source_width: u32, target_width: u32 },
    Variant {
        output: PathBuf,
        outcome: VariantOutcome,
    },
}

/// Totals for a whole run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub files: usize,
    pub files_skipped: usize,
    pub files_failed: usize,
    pub variants_written: usize,
    pub variants_existing: usize,
    pub variants_failed: usize,
    /// Source bytes, counted once per written variant.
    pub bytes_in: u64,
    pub bytes_out: u64,
}

impl Summary {
    fn record_variant(&mut self, source: &SourceImage, outcome: &VariantOutcome) {
        match outcome {
            VariantOutcome::Exists => self.variants_existing += 1,
            VariantOutcome::Written { bytes, .. } => {
                self.variants_written += 1;
                self.bytes_in += source.bytes;
                self.bytes_out += bytes;
            }
            VariantOutcome::Failed { .. } => self.variants_failed += 1,
        }
    }

    /// Written output size relative to the matching source bytes.
    pub fn percentage(&self) -> Option<f64> {
        size_percentage(self.bytes_out, self.bytes_in)
    }
}

/// Build the backend request for one variant of `source`.
pub fn plan_variant(
    config: &Config,
    source: &SourceImage,
    variant: &Variant,
    output: &Path,
) -> ConvertParams {
    let dims = (source.dimensions.width, source.dimensions.height);
    ConvertParams {
        source: source.path.clone(),
        output: output.to_path_buf(),
        width: variant.width,
        height: calculate_target_height(dims, variant.width),
        quality: variant.quality,
        progressive: config.progressive,
        sampling: ChromaSampling::Yuv420,
        colorspace: Colorspace::Rgb,
    }
}

/// Produce one variant of `source`, honoring the overwrite policy.
pub fn convert_variant<F>(
    backend: &impl ImageBackend,
    config: &Config,
    source: &SourceImage,
    variant: &Variant,
    on_event: &mut F,
) -> VariantOutcome
where
    F: FnMut(ConvertEvent),
{
    let paths = variant_paths(
        &source.file_name,
        &variant.suffix,
        &config.input_folder,
        &config.output_folder,
    );

    let outcome = if config.no_overwrite && paths.output.exists() {
        debug!(output = %paths.output.display(), "output exists, skipping");
        VariantOutcome::Exists
    } else {
        if source.dimensions.width < variant.width {
            on_event(ConvertEvent::Upscale {
                source_width: source.dimensions.width,
                target_width: variant.width,
            });
        }
        let params = plan_variant(config, source, variant, &paths.output);
        debug!(?params, "converting");
        match backend.convert(&params) {
            Ok(()) => measure_output(&paths.output, source.bytes),
            Err(e) => {
                warn!(output = %paths.output.display(), error = %e, "conversion failed");
                VariantOutcome::Failed {
                    error: e.to_string(),
                }
            }
        }
    };

    on_event(ConvertEvent::Variant {
        output: paths.output,
        outcome: outcome.clone(),
    });
    outcome
}

fn measure_output(output: &Path, original_bytes: u64) -> VariantOutcome {
    match fs::metadata(output) {
        Ok(meta) => VariantOutcome::Written {
            bytes: meta.len(),
            percentage: size_percentage(meta.len(), original_bytes),
        },
        Err(e) => {
            warn!(output = %output.display(), error = %e, "converted output is missing");
            VariantOutcome::Failed {
                error: format!("output not found after conversion: {e}"),
            }
        }
    }
}

/// Result of looking at a source before converting it.
enum Inspection {
    Ready(SourceImage),
    Skipped,
    Failed,
}

/// Identify a source and check it against `MinWidth`, reporting any reason
/// not to convert it.
fn inspect_source<F>(
    backend: &impl ImageBackend,
    config: &Config,
    path: &Path,
    file_name: &str,
    on_event: &mut F,
) -> Inspection
where
    F: FnMut(ConvertEvent),
{
    let read = backend
        .identify(path)
        .map_err(|e| e.to_string())
        .and_then(|dims| {
            fs::metadata(path)
                .map(|meta| (dims, meta.len()))
                .map_err(|e| e.to_string())
        });

    let (dimensions, bytes) = match read {
        Ok(found) => found,
        Err(error) => {
            warn!(file = file_name, %error, "cannot read source");
            on_event(ConvertEvent::FileFailed {
                file_name: file_name.to_string(),
                error,
            });
            return Inspection::Failed;
        }
    };

    on_event(ConvertEvent::Original { dimensions, bytes });

    if dimensions.width < config.min_width {
        on_event(ConvertEvent::FileSkipped {
            file_name: file_name.to_string(),
            reason: SkipReason::BelowMinWidth {
                width: dimensions.width,
                min_width: config.min_width,
            },
        });
        return Inspection::Skipped;
    }

    Inspection::Ready(SourceImage {
        path: path.to_path_buf(),
        file_name: file_name.to_string(),
        dimensions,
        bytes,
    })
}

/// Convert one file into every declared variant, updating `summary`.
pub fn convert_file<F>(
    backend: &impl ImageBackend,
    config: &Config,
    variants: &[Variant],
    path: &Path,
    summary: &mut Summary,
    on_event: &mut F,
) where
    F: FnMut(ConvertEvent),
{
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    if !is_convertible(path) {
        summary.files_skipped += 1;
        on_event(ConvertEvent::FileSkipped {
            file_name,
            reason: SkipReason::Unsupported,
        });
        return;
    }

    let source = match inspect_source(backend, config, path, &file_name, on_event) {
        Inspection::Ready(source) => source,
        Inspection::Skipped => {
            summary.files_skipped += 1;
            return;
        }
        Inspection::Failed => {
            summary.files_failed += 1;
            return;
        }
    };

    for variant in variants {
        let outcome = convert_variant(backend, config, &source, variant, on_event);
        summary.record_variant(&source, &outcome);
    }
}

/// One entry of the input folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FolderEntry {
    File(PathBuf),
    /// Could not be inspected, e.g. a dangling symlink.
    Unreadable { path: PathBuf, error: String },
}

impl FolderEntry {
    pub fn path(&self) -> &Path {
        match self {
            FolderEntry::File(path) | FolderEntry::Unreadable { path, .. } => path,
        }
    }
}

/// List the regular files of `dir`, sorted by name.
///
/// Symlinks are followed. Directories, FIFOs, sockets and devices are left
/// out. Only a failure to read `dir` itself is an error; entries that cannot
/// be inspected are returned as [`FolderEntry::Unreadable`].
pub fn list_files(dir: &Path) -> Result<Vec<FolderEntry>, ConvertError> {
    if !dir.is_dir() {
        return Err(ConvertError::NotADirectory(dir.to_path_buf()));
    }

    let mut entries = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        match entry {
            Ok(e) if e.file_type().is_file() => entries.push(FolderEntry::File(e.into_path())),
            Ok(e) => debug!(path = %e.path().display(), "not a regular file"),
            Err(source) if source.depth() == 0 => {
                return Err(ConvertError::InputFolder {
                    path: dir.to_path_buf(),
                    source,
                });
            }
            Err(source) => {
                let path = source.path().unwrap_or(dir).to_path_buf();
                warn!(path = %path.display(), error = %source, "cannot inspect entry");
                entries.push(FolderEntry::Unreadable {
                    path,
                    error: source.to_string(),
                });
            }
        }
    }
    Ok(entries)
}

/// Convert every file of the input folder.
pub fn convert_directory<F>(
    backend: &impl ImageBackend,
    config: &Config,
    mut on_event: F,
) -> Result<Summary, ConvertError>
where
    F: FnMut(ConvertEvent),
{
    let files = list_files(&config.input_folder)?;
    fs::create_dir_all(&config.output_folder).map_err(|source| ConvertError::OutputFolder {
        path: config.output_folder.clone(),
        source,
    })?;

    info!(
        input = %config.input_folder.display(),
        output = %config.output_folder.display(),
        files = files.len(),
        "starting conversion"
    );
    on_event(ConvertEvent::Started {
        input: config.input_folder.clone(),
        output: config.output_folder.clone(),
        files: files.len(),
    });

    let variants = config.variants();
    let mut summary = Summary {
        files: files.len(),
        ..Summary::default()
    };

    for (i, entry) in files.iter().enumerate() {
        let file_name = entry
            .path()
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        on_event(ConvertEvent::FileStarted {
            file_name: file_name.clone(),
            index: i + 1,
            total: files.len(),
        });
        match entry {
            FolderEntry::File(path) => {
                convert_file(backend, config, &variants, path, &mut summary, &mut on_event)
            }
            FolderEntry::Unreadable { error, .. } => {
                summary.files_failed += 1;
                on_event(ConvertEvent::FileFailed {
                    file_name,
                    error: error.clone(),
                });
            }
        }
    }

    info!(
        written = summary.variants_written,
        existing = summary.variants_existing,
        failed = summary.variants_failed,
        "conversion finished"
    );
    Ok(summary)
}
