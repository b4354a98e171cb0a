use async_trait::async_trait;
use std::path::{Path, PathBuf};

use super::ByteSource;
use crate::error::Result;

/// Archive bytes from a local file.
pub struct LocalFileSource {
    path: PathBuf,
    name: String,
}

impl LocalFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());
        Self { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ByteSource for LocalFileSource {
    async fn fetch(&self) -> Result<Vec<u8>> {
        Ok(tokio::fs::read(&self.path).await?)
    }

    fn display_name(&self) -> &str {
        &self.name
    }
}
