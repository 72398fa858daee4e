use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::application::use_cases::import_reddit_export::ImportRedditExportResponse;
use crate::application::use_cases::import_reddit_listings::ListingImportResult;
use crate::application::use_cases::query_reddit_post::QueryRedditPostRequest;
use crate::domain::entities::RedditPost;

#[derive(Debug, Serialize)]
pub struct RedditPostListDto {
    pub posts: Vec<RedditPost>,
}

#[derive(Debug, Serialize)]
pub struct RedditPostDto {
    pub post: RedditPost,
}

#[derive(Debug, Serialize)]
pub struct StoreRedditPostResponseDto {
    pub success: bool,
    pub message: String,
    pub data: Vec<RedditPost>,
}

impl From<RedditPost> for StoreRedditPostResponseDto {
    fn from(post: RedditPost) -> Self {
        Self {
            success: true,
            message: "Reddit post data stored successfully".to_string(),
            data: vec![post],
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RedditQueryParamsDto {
    #[serde(rename = "postId")]
    pub post_id: Option<String>,
    #[serde(rename = "type")]
    pub query_type: Option<String>,
    pub fields: Option<String>,
}

impl From<RedditQueryParamsDto> for QueryRedditPostRequest {
    fn from(params: RedditQueryParamsDto) -> Self {
        Self {
            post_id: params.post_id,
            query_type: params.query_type,
            fields: params.fields,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RedditQueryResponseDto {
    pub data: Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRedditExportResponseDto {
    pub success: bool,
    pub inserted_count: usize,
    pub processed_count: usize,
    pub total_in_file: usize,
    pub message: String,
}

impl From<ImportRedditExportResponse> for ImportRedditExportResponseDto {
    fn from(response: ImportRedditExportResponse) -> Self {
        Self {
            success: true,
            message: response.message().to_string(),
            inserted_count: response.inserted_count,
            processed_count: response.processed_count,
            total_in_file: response.total_in_file,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ImportRedditListingsResponseDto {
    pub success: bool,
    pub message: String,
    pub data: Vec<ListingImportResult>,
}

impl From<Vec<ListingImportResult>> for ImportRedditListingsResponseDto {
    fn from(results: Vec<ListingImportResult>) -> Self {
        Self {
            success: true,
            message: format!("Processed {} Reddit posts from file", results.len()),
            data: results,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResponseDto {
    pub success: bool,
    pub message: String,
    pub post_count: usize,
}

impl From<usize> for SyncResponseDto {
    fn from(post_count: usize) -> Self {
        Self {
            success: true,
            message: format!("Successfully synced {} Reddit posts to cache", post_count),
            post_count,
        }
    }
}
