//! Expanding command-line inputs into an ordered list of image files.

use std::path::{Path, PathBuf};

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

use crate::error::Error;

/// Extensions picked up when scanning a directory (lowercase, without dot).
pub const DEFAULT_EXTS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

/// Options controlling input expansion.
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    /// Whether to recurse into subdirectories of directory inputs.
    pub recursive: bool,
}

/// Return `true` if `path` has one of the [`DEFAULT_EXTS`] extensions.
#[must_use]
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| {
            let ext = ext.to_ascii_lowercase();
            DEFAULT_EXTS.iter().any(|e| *e == ext)
        })
}

/// Expand `inputs` in order: files are kept as given, directories are
/// replaced by the supported images inside them, sorted by file name.
///
/// # Errors
/// Returns [`Error::BadInput`] naming every missing input, or
/// [`Error::EmptyInput`] if nothing is left to show.
pub fn expand_inputs(inputs: &[PathBuf], opts: &ScanOptions) -> Result<Vec<PathBuf>, Error> {
    // Validate inputs first (collect all bad ones).
    let bad: Vec<_> = inputs.iter().filter(|p| !p.exists()).collect();
    if !bad.is_empty() {
        let joined = bad
            .iter()
            .map(|p| p.to_string_lossy())
            .collect::<Vec<_>>()
            .join(", ");
        return Err(Error::BadInput(joined));
    }

    let mut out = Vec::new();
    for input in inputs {
        if !input.is_dir() {
            out.push(input.clone());
            continue;
        }

        let mut wd = WalkDir::new(input).sort_by_file_name();
        if !opts.recursive {
            wd = wd.max_depth(1);
        }
        let before = out.len();
        for entry in wd
            .into_iter()
            // Skip hidden dot-directories *below* the root only.
            .filter_entry(|e| !should_skip_dir(e))
            .flatten()
        {
            let path = entry.path();
            if path.is_file() && is_supported_image(path) {
                out.push(path.to_path_buf());
            }
        }
        debug!(dir = %input.display(), found = out.len() - before, "scanned directory");
    }

    if out.is_empty() {
        return Err(Error::EmptyInput);
    }
    Ok(out)
}

/// Shuffle `paths` in place, deterministically when `seed` is given.
pub fn shuffle(paths: &mut [PathBuf], seed: Option<u64>) {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    paths.shuffle(&mut rng);
}

fn should_skip_dir(entry: &DirEntry) -> bool {
    // Never skip the root; tempfile roots can be dot-dirs.
    if entry.depth() == 0 {
        return false;
    }
    if !entry.file_type().is_dir() {
        return false;
    }
    entry
        .file_name()
        .to_str()
        .is_some_and(|n| n.starts_with('.'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn extension_check_is_case_insensitive() {
        assert!(is_supported_image(Path::new("a/B.JPG")));
        assert!(is_supported_image(Path::new("x.WebP")));
        assert!(!is_supported_image(Path::new("notes.txt")));
        assert!(!is_supported_image(Path::new("no_ext")));
        assert!(!is_supported_image(Path::new("x.bmp")));
    }

    #[test]
    fn files_are_kept_verbatim_and_dirs_sorted() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        fs::write(root.join("b.png"), b"x").unwrap();
        fs::write(root.join("a.jpg"), b"x").unwrap();
        fs::write(root.join("readme.txt"), b"x").unwrap();
        let explicit = root.join("readme.txt");

        let out = expand_inputs(
            &[explicit.clone(), root.to_path_buf()],
            &ScanOptions::default(),
        )
        .unwrap();
        assert_eq!(out, vec![explicit, root.join("a.jpg"), root.join("b.png")]);
    }

    #[test]
    fn recursion_is_opt_in_and_skips_hidden_dirs() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        fs::write(root.join("top.png"), b"x").unwrap();
        fs::create_dir_all(root.join("sub")).unwrap();
        fs::write(root.join("sub").join("deep.png"), b"x").unwrap();
        fs::create_dir_all(root.join(".cache")).unwrap();
        fs::write(root.join(".cache").join("hidden.png"), b"x").unwrap();

        let flat = expand_inputs(&[root.to_path_buf()], &ScanOptions::default()).unwrap();
        assert_eq!(flat, vec![root.join("top.png")]);

        let opts = ScanOptions {
            recursive: true,
        };
        let deep = expand_inputs(&[root.to_path_buf()], &opts).unwrap();
        assert_eq!(deep, vec![root.join("sub").join("deep.png"), root.join("top.png")]);
    }

    #[test]
    fn missing_inputs_are_all_reported() {
        let err = expand_inputs(
            &[PathBuf::from("/nope/one.png"), PathBuf::from("/nope/two.png")],
            &ScanOptions::default(),
        )
        .unwrap_err();
        match err {
            Error::BadInput(msg) => {
                assert!(msg.contains("one.png") && msg.contains("two.png"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn empty_directory_is_empty_input() {
        let tmp = tempfile::tempdir().unwrap();
        let err = expand_inputs(&[tmp.path().to_path_buf()], &ScanOptions::default()).unwrap_err();
        assert!(matches!(err, Error::EmptyInput));
    }

    #[test]
    fn seeded_shuffle_is_reproducible() {
        let base: Vec<PathBuf> = (0..20).map(|i| PathBuf::from(format!("{i}.png"))).collect();
        let mut a = base.clone();
        let mut b = base.clone();
        shuffle(&mut a, Some(7));
        shuffle(&mut b, Some(7));
        assert_eq!(a, b);
        let mut sorted = a.clone();
        sorted.sort();
        let mut expected = base;
        expected.sort();
        assert_eq!(sorted, expected);
    }
}
