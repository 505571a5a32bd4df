#![allow(dead_code)]

//! Resumes picked for one submission.

use std::path::Path;

use anyhow::{Context, Result};
use bytes::Bytes;

/// A resume attachment. Contents are opaque to this crate.
#[derive(Debug, Clone, PartialEq)]
pub struct ResumeFile {
    pub file_name: String,
    pub bytes: Bytes,
}

impl ResumeFile {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileSet {
    files: Vec<ResumeFile>,
}

impl FileSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads every path into memory, keeping the given order.
    pub async fn load<P: AsRef<Path>>(paths: &[P]) -> Result<Self> {
        let mut files = Vec::with_capacity(paths.len());
        for path in paths {
            let path = path.as_ref();
            let bytes = tokio::fs::read(path)
                .await
                .with_context(|| format!("Failed to read resume '{}'", path.display()))?;
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            files.push(ResumeFile::new(file_name, bytes));
        }
        Ok(Self { files })
    }

    pub fn push(&mut self, file: ResumeFile) {
        self.files.push(file);
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ResumeFile> {
        self.files.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_reads_files_in_order() {
        let dir = std::env::temp_dir().join(format!("spotter-files-{}", std::process::id()));
        tokio::fs::create_dir_all(&dir).await.unwrap();
        let first = dir.join("b.txt");
        let second = dir.join("a.txt");
        tokio::fs::write(&first, b"first").await.unwrap();
        tokio::fs::write(&second, b"second").await.unwrap();

        let set = FileSet::load(&[&first, &second]).await.unwrap();
        let names: Vec<_> = set.iter().map(|f| f.file_name.as_str()).collect();
        assert_eq!(names, vec!["b.txt", "a.txt"]);
        assert_eq!(set.iter().next().unwrap().bytes, Bytes::from_static(b"first"));

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn test_load_missing_file_names_path() {
        let err = FileSet::load(&["/definitely/not/here.pdf"]).await.unwrap_err();
        assert!(err.to_string().contains("here.pdf"));
    }
}
