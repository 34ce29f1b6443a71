//! CLI command definitions and input checks.
//!
//! Uses clap derive macros for argument definitions.

pub mod args;

use std::path::Path;

use anyhow::{Context, Result, bail};

/// Read a file to review, rejecting input the pipeline should never see.
///
/// The file must be non-empty, at most `max_file_size` bytes and valid UTF-8.
pub async fn read_source(path: &Path, max_file_size: u64) -> Result<String> {
    let metadata = tokio::fs::metadata(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    if !metadata.is_file() {
        bail!("{} is not a regular file", path.display());
    }
    if metadata.len() > max_file_size {
        bail!(
            "{} is {} bytes, larger than the {} byte limit",
            path.display(),
            metadata.len(),
            max_file_size
        );
    }

    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    if bytes.is_empty() {
        bail!("{} is empty", path.display());
    }
    String::from_utf8(bytes)
        .map_err(|_| anyhow::anyhow!("{} is not valid UTF-8 text", path.display()))
}

/// File name used for language detection and the stored record.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn read_source_accepts_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.py");
        std::fs::write(&path, "x = 1\n").unwrap();
        assert_eq!(read_source(&path, 1024).await.unwrap(), "x = 1\n");
    }

    #[tokio::test]
    async fn read_source_rejects_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.py");
        std::fs::write(&path, "").unwrap();
        let err = read_source(&path, 1024).await.unwrap_err();
        assert!(err.to_string().contains("is empty"));
    }

    #[tokio::test]
    async fn read_source_rejects_oversized_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.py");
        std::fs::write(&path, "x".repeat(2048)).unwrap();
        let err = read_source(&path, 1024).await.unwrap_err();
        assert!(err.to_string().contains("1024 byte limit"));
    }

    #[tokio::test]
    async fn read_source_rejects_binary() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blob.py");
        std::fs::write(&path, [0xff, 0xfe, 0x00, 0x41]).unwrap();
        let err = read_source(&path, 1024).await.unwrap_err();
        assert!(err.to_string().contains("UTF-8"));
    }

    #[tokio::test]
    async fn read_source_missing_file() {
        let err = read_source(Path::new("/tmp/critiq-missing-input.py"), 1024)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }

    #[test]
    fn display_name_strips_directories() {
        assert_eq!(display_name(Path::new("src/app/main.py")), "main.py");
    }
}
