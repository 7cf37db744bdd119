//! File I/O for native CLI

use anyhow::{bail, Context, Result};
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use margin_core::Document;

/// Open a UTF-8 text file as a fresh, unannotated document
pub fn load_file(path: impl AsRef<Path>) -> Result<Document> {
    let requested = path.as_ref();
    let path = requested
        .canonicalize()
        .with_context(|| format!("No such file: {}", requested.display()))?;
    if path.is_dir() {
        bail!("{} is a directory", path.display());
    }

    let bytes = fs::read(&path).with_context(|| format!("Failed to read {}", path.display()))?;
    let content =
        String::from_utf8(bytes).with_context(|| format!("{} is not UTF-8 text", path.display()))?;

    let title = os_name(path.file_stem()).unwrap_or_else(|| "Untitled".to_string());
    let filename = os_name(path.file_name()).unwrap_or_default();
    Ok(Document::with_file_info(title, content, path.display().to_string(), filename))
}

fn os_name(name: Option<&OsStr>) -> Option<String> {
    name.map(|n| n.to_string_lossy().into_owned())
}

/// Get the ~/.margin directory path, creating it if needed
pub fn margin_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not find home directory")?;
    let dir = home.join(".margin");

    if !dir.exists() {
        fs::create_dir_all(&dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    }

    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("margin-io-{}-{name}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_load_file_metadata() {
        let dir = scratch_dir("load");
        let path = dir.join("notes.md");
        fs::write(&path, "héllo\nworld").unwrap();

        let doc = load_file(&path).unwrap();

        assert_eq!(doc.title, "notes");
        assert_eq!(doc.filename.as_deref(), Some("notes.md"));
        assert_eq!(doc.content, "héllo\nworld");
        assert!(doc.annotations.is_empty());
        assert!(doc.filepath.is_some_and(|p| p.ends_with("notes.md")));
    }

    #[test]
    fn test_load_rejects_directories_and_binary() {
        let dir = scratch_dir("reject");
        assert!(load_file(&dir).is_err());

        let path = dir.join("blob.bin");
        fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();
        let err = load_file(&path).unwrap_err();
        assert!(format!("{err:#}").contains("not UTF-8"));

        assert!(load_file(dir.join("missing.txt")).is_err());
    }
}
