//! # argo
//!
//! Batch-converts the JPEGs of one folder into resized, recompressed
//! variants. A single TOML file names the input and output folders and lists
//! the variants as three index-aligned arrays:
//!
//! ```text
//! Suffixes  = ["-large", "-small"]      dawn.jpg → dawn-large.jpg (2048 px, q85)
//! Widths    = [2048, 512]                        → dawn-small.jpg (512 px, q70)
//! Qualities = [85, 70]
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | TOML loading, path resolution, validation, variant list |
//! | [`convert`] | The per-file, per-variant conversion loop and its events |
//! | [`naming`] | Which files are converted and what their outputs are called |
//! | [`imaging`] | [`ImageBackend`](imaging::ImageBackend) trait, native and ImageMagick backends |
//! | [`output`] | Terminal formatting of progress events and the final summary |
//!
//! # Design Decisions
//!
//! ## Sequential, One Pass
//!
//! Files and variants are processed one at a time in name order. There is no
//! state between runs: `NoOverwrite` plus the output folder itself is all the
//! bookkeeping needed to resume an interrupted batch.
//!
//! ## Failures Stay Local
//!
//! A broken image or a failed encode is reported and counted, and the loop
//! moves on. Only a bad config or an unusable folder stops the run.
//!
//! ## Two Backends, One Request
//!
//! The loop builds a [`ConvertParams`](imaging::ConvertParams) and hands it to
//! whichever backend the config selects. The native backend needs nothing
//! installed; the ImageMagick backend drives `identify` and `convert`.

pub mod config;
pub mod convert;
pub mod imaging;
pub mod naming;
pub mod output;
