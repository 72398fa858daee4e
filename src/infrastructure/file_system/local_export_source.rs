use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::fs;

use crate::application::ports::export_source::{ExportSource, ExportSourceError};

/// Reads the Reddit export from a file on local disk.
pub struct LocalExportSource {
    path: PathBuf,
}

impl LocalExportSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ExportSource for LocalExportSource {
    async fn read_export(&self) -> Result<String, ExportSourceError> {
        fs::read_to_string(&self.path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => ExportSourceError::NotFound(self.location()),
            _ => ExportSourceError::IoError(e.to_string()),
        })
    }

    fn location(&self) -> String {
        self.path.to_string_lossy().to_string()
    }
}
