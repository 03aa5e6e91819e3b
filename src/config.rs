//! Conversion configuration.
//!
//! One flat TOML file, passed as the only positional argument. Keys are
//! PascalCase:
//!
//! ```toml
//! InputFolder = "photos"
//! OutputFolder = "public/img"
//! MinWidth = 0              # skip sources narrower than this (0 = off)
//!
//! # Variant i is (Suffixes[i], Widths[i], Qualities[i])
//! Suffixes  = ["-large", "-medium", "-thumb"]
//! Widths    = [2048, 1024, 320]
//! Qualities = [85, 80, 70]
//!
//! NoOverwrite = true        # leave existing outputs untouched
//! Progressive = false       # write interlaced JPEGs
//! Backend = "native"        # or "imagemagick"
//! ```
//!
//! Unknown keys are rejected to catch typos early. Relative folders are
//! resolved against the working directory.

use crate::imaging::Quality;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Could not parse config file: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Could not resolve folder {path}: {source}")]
    Path {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Which image backend performs the conversions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum BackendKind {
    #[default]
    #[serde(rename = "native")]
    Native,
    #[serde(rename = "imagemagick")]
    ImageMagick,
}

/// The conversion job loaded from the config file.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct Config {
    pub input_folder: PathBuf,
    pub output_folder: PathBuf,
    /// Sources narrower than this are skipped. 0 disables the check.
    #[serde(default)]
    pub min_width: u32,
    pub suffixes: Vec<String>,
    pub widths: Vec<u32>,
    pub qualities: Vec<u32>,
    #[serde(default)]
    pub no_overwrite: bool,
    #[serde(default)]
    pub progressive: bool,
    #[serde(default)]
    pub backend: BackendKind,
}

/// One output derived from every source image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    pub suffix: String,
    pub width: u32,
    pub quality: Quality,
}

impl Config {
    /// Check the parallel variant lists and their values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let n = self.suffixes.len();
        if n == 0 {
            return Err(ConfigError::Validation(
                "at least one variant must be declared".into(),
            ));
        }
        if self.widths.len() != n || self.qualities.len() != n {
            return Err(ConfigError::Validation(format!(
                "Suffixes, Widths and Qualities must have the same length (got {}, {}, {})",
                n,
                self.widths.len(),
                self.qualities.len()
            )));
        }
        if let Some(i) = self.widths.iter().position(|&w| w == 0) {
            return Err(ConfigError::Validation(format!(
                "Widths[{i}] must be greater than 0"
            )));
        }
        if let Some(i) = self.qualities.iter().position(|&q| !(1..=100).contains(&q)) {
            return Err(ConfigError::Validation(format!(
                "Qualities[{i}] must be 1-100, got {}",
                self.qualities[i]
            )));
        }
        if let Some(s) = self
            .suffixes
            .iter()
            .find(|s| s.contains('/') || s.contains(std::path::MAIN_SEPARATOR))
        {
            return Err(ConfigError::Validation(format!(
                "suffix {s:?} must not contain a path separator"
            )));
        }
        let mut seen = HashSet::new();
        if let Some(s) = self.suffixes.iter().find(|s| !seen.insert(s.as_str())) {
            return Err(ConfigError::Validation(format!(
                "suffix {s:?} is declared more than once"
            )));
        }
        if self.input_folder == self.output_folder && self.suffixes.iter().any(String::is_empty) {
            return Err(ConfigError::Validation(
                "an empty suffix would overwrite the source when InputFolder equals OutputFolder"
                    .into(),
            ));
        }
        Ok(())
    }

    /// Make both folders absolute, relative to the working directory.
    pub fn resolve_paths(&mut self) -> Result<(), ConfigError> {
        self.input_folder = absolute(&self.input_folder)?;
        self.output_folder = absolute(&self.output_folder)?;
        Ok(())
    }

    /// Variants in declaration order.
    pub fn variants(&self) -> Vec<Variant> {
        self.suffixes
            .iter()
            .zip(&self.widths)
            .zip(&self.qualities)
            .map(|((suffix, &width), &quality)| Variant {
                suffix: suffix.clone(),
                width,
                quality: Quality::new(quality),
            })
            .collect()
    }
}

fn absolute(path: &Path) -> Result<PathBuf, ConfigError> {
    std::path::absolute(path).map_err(|source| ConfigError::Path {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse config TOML without touching the filesystem.
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Load, resolve and validate the config file at `path`.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mut config = parse_config(&content)?;
    config.resolve_paths()?;
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented sample config.
///
/// Used by the `--gen-config` CLI flag.
pub fn stock_config_toml() -> &'static str {
    r##"# argo configuration
# ==================
# Every .jpg in InputFolder is converted once per variant.
# Variant i is (Suffixes[i], Widths[i], Qualities[i]); the three lists must
# have the same length. Unknown keys cause an error.

# Folders, relative to the working directory or absolute.
InputFolder = "originals"
OutputFolder = "resized"

# Skip sources narrower than this many pixels (0 = convert everything).
MinWidth = 0

# photo.jpg -> photo-large.jpg, photo-medium.jpg, photo-small.jpg
Suffixes = ["-large", "-medium", "-small"]

# Target width in pixels. Height follows the source aspect ratio.
Widths = [2048, 1024, 512]

# JPEG quality, 1 (worst) - 100 (best).
Qualities = [85, 80, 75]

# Leave outputs that already exist untouched.
NoOverwrite = true

# Write progressive (interlaced) JPEGs.
Progressive = false

# "native" (built in) or "imagemagick" (needs identify/convert on PATH).
Backend = "native"
"##
}
