use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use crate::application::ports::ExportSource;
use crate::application::services::reddit_normalizer::{from_listing_pair, pair_listings};
use crate::domain::repositories::RedditPostRepository;

#[derive(Debug)]
pub enum ImportRedditListingsError {
    SourceError(String),
    InvalidJson(String),
    InvalidFormat,
}

impl std::fmt::Display for ImportRedditListingsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportRedditListingsError::SourceError(msg) => write!(f, "Export source error: {}", msg),
            ImportRedditListingsError::InvalidJson(msg) => write!(f, "Invalid JSON: {}", msg),
            ImportRedditListingsError::InvalidFormat => {
                write!(f, "Invalid Reddit data format in the file")
            }
        }
    }
}

impl std::error::Error for ImportRedditListingsError {}

/// Outcome for one post of a listing export. Failures are recorded, not raised.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ListingImportResult {
    Imported {
        id: Option<i32>,
        post_id: String,
        title: Option<String>,
        author: String,
        num_comments: usize,
    },
    Failed {
        post_id: String,
        error: String,
    },
}

impl ListingImportResult {
    pub fn is_failure(&self) -> bool {
        matches!(self, ListingImportResult::Failed { .. })
    }
}

/// Imports an export of permalink fetches laid out as
/// `[post listing, comments listing, post listing, ...]`, one insert per post.
pub struct ImportRedditListingsUseCase {
    export_source: Arc<dyn ExportSource>,
    reddit_post_repository: Arc<dyn RedditPostRepository>,
}

impl ImportRedditListingsUseCase {
    pub fn new(
        export_source: Arc<dyn ExportSource>,
        reddit_post_repository: Arc<dyn RedditPostRepository>,
    ) -> Self {
        Self {
            export_source,
            reddit_post_repository,
        }
    }

    pub async fn execute(&self) -> Result<Vec<ListingImportResult>, ImportRedditListingsError> {
        let content = self
            .export_source
            .read_export()
            .await
            .map_err(|e| ImportRedditListingsError::SourceError(e.to_string()))?;

        let parsed: Value = serde_json::from_str(&content)
            .map_err(|e| ImportRedditListingsError::InvalidJson(e.to_string()))?;

        let listings = parsed
            .as_array()
            .filter(|listings| listings.len() >= 2)
            .ok_or(ImportRedditListingsError::InvalidFormat)?;

        let mut results = Vec::new();
        for pair in pair_listings(listings) {
            let Some(post) = from_listing_pair(pair.post_listing, pair.comments_listing) else {
                tracing::warn!("Skipping invalid post at index {}", pair.index);
                continue;
            };

            let result = match self.reddit_post_repository.save(&post).await {
                Ok(stored) => ListingImportResult::Imported {
                    id: stored.id(),
                    post_id: stored.post_id().to_string(),
                    title: stored.title().map(str::to_string),
                    author: stored.author().to_string(),
                    num_comments: stored.top_level_comment_count(),
                },
                Err(e) => {
                    tracing::error!("Error importing post {}: {}", post.post_id(), e);
                    ListingImportResult::Failed {
                        post_id: post.post_id().to_string(),
                        error: e.to_string(),
                    }
                }
            };
            results.push(result);
        }

        tracing::info!("Processed {} Reddit posts from file", results.len());
        Ok(results)
    }
}
