use serde_json::Value;
use std::sync::Arc;

use crate::application::ports::ExportSource;
use crate::application::services::reddit_normalizer::normalize_export;
use crate::domain::repositories::RedditPostRepository;

/// Bytes of the export shown on each side of a parse error in the log.
const ERROR_CONTEXT_RADIUS: usize = 50;

#[derive(Debug)]
pub enum ImportRedditExportError {
    SourceError(String),
    InvalidJson(String),
    NotAnArray,
    InsertFailed(String),
}

impl std::fmt::Display for ImportRedditExportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportRedditExportError::SourceError(msg) => write!(f, "Export source error: {}", msg),
            ImportRedditExportError::InvalidJson(msg) => write!(f, "Invalid JSON: {}", msg),
            ImportRedditExportError::NotAnArray => write!(
                f,
                "Invalid format: reddit.json should contain an array of post objects."
            ),
            ImportRedditExportError::InsertFailed(msg) => write!(f, "Database insert failed: {}", msg),
        }
    }
}

impl std::error::Error for ImportRedditExportError {}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportRedditExportResponse {
    pub inserted_count: usize,
    pub processed_count: usize,
    pub total_in_file: usize,
}

impl ImportRedditExportResponse {
    pub fn message(&self) -> &'static str {
        if self.processed_count == 0 {
            "No valid posts to insert."
        } else {
            "Successfully processed and inserted posts."
        }
    }
}

/// Bulk import of a flat export: one raw post object per array element.
pub struct ImportRedditExportUseCase {
    export_source: Arc<dyn ExportSource>,
    reddit_post_repository: Arc<dyn RedditPostRepository>,
}

impl ImportRedditExportUseCase {
    pub fn new(
        export_source: Arc<dyn ExportSource>,
        reddit_post_repository: Arc<dyn RedditPostRepository>,
    ) -> Self {
        Self {
            export_source,
            reddit_post_repository,
        }
    }

    pub async fn execute(&self) -> Result<ImportRedditExportResponse, ImportRedditExportError> {
        let content = self
            .export_source
            .read_export()
            .await
            .map_err(|e| ImportRedditExportError::SourceError(e.to_string()))?;

        let parsed: Value = serde_json::from_str(&content).map_err(|e| {
            tracing::error!("Error parsing {}: {}", self.export_source.location(), e);
            let position = byte_offset(&content, e.line(), e.column());
            tracing::error!(
                "Context around error (position {}): {}",
                position,
                context_around(&content, position)
            );
            ImportRedditExportError::InvalidJson(e.to_string())
        })?;

        let raw_posts = parsed.as_array().ok_or(ImportRedditExportError::NotAnArray)?;
        let posts = normalize_export(raw_posts);

        tracing::info!(
            "Successfully processed {} out of {} posts",
            posts.len(),
            raw_posts.len()
        );

        if posts.is_empty() {
            tracing::info!("No valid posts found to insert");
            return Ok(ImportRedditExportResponse {
                inserted_count: 0,
                processed_count: 0,
                total_in_file: raw_posts.len(),
            });
        }

        let inserted = self
            .reddit_post_repository
            .save_batch(&posts)
            .await
            .map_err(|e| {
                tracing::error!("Database bulk insert error: {}", e);
                ImportRedditExportError::InsertFailed(e.to_string())
            })?;

        tracing::info!("Inserted {} new posts", inserted.len());

        Ok(ImportRedditExportResponse {
            inserted_count: inserted.len(),
            processed_count: posts.len(),
            total_in_file: raw_posts.len(),
        })
    }
}

/// Converts serde_json's 1-based line/column into a byte offset.
fn byte_offset(content: &str, line: usize, column: usize) -> usize {
    let line_start: usize = content
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum();
    (line_start + column.saturating_sub(1)).min(content.len())
}

fn context_around(content: &str, position: usize) -> &str {
    let mut start = position.saturating_sub(ERROR_CONTEXT_RADIUS);
    while !content.is_char_boundary(start) {
        start -= 1;
    }
    let mut end = (position + ERROR_CONTEXT_RADIUS).min(content.len());
    while !content.is_char_boundary(end) {
        end += 1;
    }
    &content[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::{FakeExportSource, FakeRedditPostRepository};

    fn use_case(
        source: FakeExportSource,
        repository: Arc<FakeRedditPostRepository>,
    ) -> ImportRedditExportUseCase {
        ImportRedditExportUseCase::new(Arc::new(source), repository)
    }

    #[tokio::test]
    async fn test_imports_valid_posts_and_skips_invalid() {
        let repository = Arc::new(FakeRedditPostRepository::default());
        let export = r#"[
            { "id": "a1", "title": "First", "author": "x", "created_utc": 1711000000, "comments": [] },
            { "title": "no id" },
            42,
            { "id": "b2", "title": "Second" }
        ]"#;

        let response = use_case(FakeExportSource::with_content(export), repository.clone())
            .execute()
            .await
            .unwrap();

        assert_eq!(
            response,
            ImportRedditExportResponse {
                inserted_count: 2,
                processed_count: 2,
                total_in_file: 4,
            }
        );
        assert_eq!(response.message(), "Successfully processed and inserted posts.");
        let ids: Vec<String> = repository
            .stored()
            .iter()
            .map(|post| post.post_id().to_string())
            .collect();
        assert_eq!(ids, vec!["a1", "b2"]);
    }

    #[tokio::test]
    async fn test_reimport_skips_existing_posts() {
        let repository = Arc::new(FakeRedditPostRepository::default());
        let export = r#"[{ "id": "a1" }, { "id": "b2" }]"#;

        use_case(FakeExportSource::with_content(export), repository.clone())
            .execute()
            .await
            .unwrap();
        let second = use_case(FakeExportSource::with_content(export), repository.clone())
            .execute()
            .await
            .unwrap();

        assert_eq!(second.inserted_count, 0);
        assert_eq!(second.processed_count, 2);
        assert_eq!(repository.stored().len(), 2);
    }

    #[tokio::test]
    async fn test_nothing_valid_skips_database() {
        let repository = Arc::new(FakeRedditPostRepository::failing());

        let response = use_case(FakeExportSource::with_content(r#"[{}, null]"#), repository)
            .execute()
            .await
            .unwrap();

        assert_eq!(response.inserted_count, 0);
        assert_eq!(response.total_in_file, 2);
        assert_eq!(response.message(), "No valid posts to insert.");
    }

    #[tokio::test]
    async fn test_invalid_json() {
        let result = use_case(
            FakeExportSource::with_content(r#"[{ "id": "a1", }]"#),
            Arc::new(FakeRedditPostRepository::default()),
        )
        .execute()
        .await;

        assert!(matches!(result, Err(ImportRedditExportError::InvalidJson(details)) if details.contains("line 1")));
    }

    #[tokio::test]
    async fn test_non_array_export() {
        let result = use_case(
            FakeExportSource::with_content(r#"{ "id": "a1" }"#),
            Arc::new(FakeRedditPostRepository::default()),
        )
        .execute()
        .await;

        assert!(matches!(result, Err(ImportRedditExportError::NotAnArray)));
    }

    #[tokio::test]
    async fn test_insert_failure() {
        let result = use_case(
            FakeExportSource::with_content(r#"[{ "id": "a1" }]"#),
            Arc::new(FakeRedditPostRepository::failing()),
        )
        .execute()
        .await;

        assert!(matches!(result, Err(ImportRedditExportError::InsertFailed(_))));
    }

    #[tokio::test]
    async fn test_missing_export_file() {
        let result = use_case(
            FakeExportSource::missing(),
            Arc::new(FakeRedditPostRepository::default()),
        )
        .execute()
        .await;

        assert!(matches!(result, Err(ImportRedditExportError::SourceError(msg)) if msg.contains("memory://reddit.json")));
    }

    #[test]
    fn test_error_context_window() {
        let content = format!("{}\n{}X{}", "a".repeat(10), "b".repeat(80), "c".repeat(80));
        let position = byte_offset(&content, 2, 81);

        assert_eq!(&content[position..position + 1], "X");
        let context = context_around(&content, position);
        assert_eq!(context.len(), 2 * ERROR_CONTEXT_RADIUS);
        assert!(context.contains('X'));
    }

    #[test]
    fn test_error_context_respects_char_boundaries() {
        let content = "é".repeat(60);
        let context = context_around(&content, 61);
        assert!(context.chars().all(|c| c == 'é'));
    }
}
