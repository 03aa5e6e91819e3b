//! Source and output filename resolution.
//!
//! Every variant keeps the source's stem and extension and inserts the
//! variant suffix between them:
//!
//! ```text
//! originals/dawn.jpg  + "-small"  →  resized/dawn-small.jpg
//! originals/a.b.JPG   + "-small"  →  resized/a.b-small.JPG
//! ```

use std::path::{Path, PathBuf};

/// The only extension that is converted.
pub const JPEG_EXTENSION: &str = "jpg";

/// Whether `path` names a file the converter handles.
pub fn is_convertible(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(JPEG_EXTENSION))
}

/// Input and output paths for one variant of `file_name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantPaths {
    pub input: PathBuf,
    pub output: PathBuf,
}

/// Resolve the input path and the suffixed output path for `file_name`.
///
/// The stem is everything before the last `.`; a name without an extension
/// gets the suffix appended at the end.
pub fn variant_paths(
    file_name: &str,
    suffix: &str,
    input_dir: &Path,
    output_dir: &Path,
) -> VariantPaths {
    let output_name = match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{stem}{suffix}.{ext}"),
        _ => format!("{file_name}{suffix}"),
    };
    VariantPaths {
        input: input_dir.join(file_name),
        output: output_dir.join(output_name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jpg_is_convertible() {
        assert!(is_convertible(Path::new("/a/dawn.jpg")));
        assert!(is_convertible(Path::new("DAWN.JPG")));
    }

    #[test]
    fn other_extensions_are_not_convertible() {
        assert!(!is_convertible(Path::new("dawn.jpeg")));
        assert!(!is_convertible(Path::new("dawn.png")));
        assert!(!is_convertible(Path::new("notes.txt")));
        assert!(!is_convertible(Path::new("jpg")));
        assert!(!is_convertible(Path::new(".jpg.bak")));
    }

    #[test]
    fn simple_name() {
        let p = variant_paths("dawn.jpg", "-small", Path::new("/in"), Path::new("/out"));
        assert_eq!(p.input, PathBuf::from("/in/dawn.jpg"));
        assert_eq!(p.output, PathBuf::from("/out/dawn-small.jpg"));
    }

    #[test]
    fn dotted_stem_keeps_all_but_last_extension() {
        let p = variant_paths("a.b.jpg", "-s", Path::new("/in"), Path::new("/out"));
        assert_eq!(p.output, PathBuf::from("/out/a.b-s.jpg"));
    }

    #[test]
    fn extension_case_preserved() {
        let p = variant_paths("DAWN.JPG", "_2x", Path::new("/in"), Path::new("/out"));
        assert_eq!(p.output, PathBuf::from("/out/DAWN_2x.JPG"));
    }

    #[test]
    fn empty_suffix_keeps_name() {
        let p = variant_paths("dawn.jpg", "", Path::new("/in"), Path::new("/out"));
        assert_eq!(p.output, PathBuf::from("/out/dawn.jpg"));
    }

    #[test]
    fn name_without_extension() {
        let p = variant_paths("README", "-x", Path::new("/in"), Path::new("/out"));
        assert_eq!(p.output, PathBuf::from("/out/README-x"));
    }

    #[test]
    fn hidden_file_is_not_split() {
        let p = variant_paths(".jpg", "-x", Path::new("/in"), Path::new("/out"));
        assert_eq!(p.output, PathBuf::from("/out/.jpg-x"));
    }
}
