use async_trait::async_trait;

#[derive(Debug)]
pub enum ExportSourceError {
    NotFound(String),
    IoError(String),
}

impl std::fmt::Display for ExportSourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportSourceError::NotFound(path) => write!(f, "Export file not found: {}", path),
            ExportSourceError::IoError(msg) => write!(f, "IO error: {}", msg),
        }
    }
}

impl std::error::Error for ExportSourceError {}

/// Where a Reddit JSON export is read from.
#[async_trait]
pub trait ExportSource: Send + Sync {
    async fn read_export(&self) -> Result<String, ExportSourceError>;

    fn location(&self) -> String;
}
