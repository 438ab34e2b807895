use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use tally_ingest::source::is_supported;

/// Statement files directly inside `dir`, sorted by name.
pub fn statement_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).with_context(|| format!("reading input directory {}", dir.display()))?;
    let mut files = Vec::new();
    for entry in entries {
        let path = entry.with_context(|| format!("listing {}", dir.display()))?.path();
        if path.is_file() && is_supported(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_statements_sorted() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b_TSB.pdf", "a_nationwide.txt", "notes.md", "c.PDF"] {
            fs::write(dir.path().join(name), "").unwrap();
        }
        fs::create_dir(dir.path().join("nested.pdf")).unwrap();

        let names: Vec<_> = statement_files(dir.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a_nationwide.txt", "b_TSB.pdf", "c.PDF"]);
    }

    #[test]
    fn test_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(statement_files(&dir.path().join("missing")).is_err());
    }
}
