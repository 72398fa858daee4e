use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::application::use_cases::{
    add_knowledge_chunk::AddKnowledgeChunkError, get_reddit_post::GetRedditPostError,
    import_reddit_export::ImportRedditExportError,
    import_reddit_listings::ImportRedditListingsError, list_reddit_posts::ListRedditPostsError,
    query_reddit_post::QueryRedditPostError, search_knowledge::SearchKnowledgeError,
    store_reddit_post::StoreRedditPostError, stream_chat::StreamChatError,
    sync_posts_to_cache::SyncPostsToCacheError,
};

#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    /// Body `{error, message}`; the message carries the underlying cause.
    Internal { error: String, message: String },
    /// Body `{error, details}`.
    Detailed {
        status: StatusCode,
        error: String,
        details: String,
    },
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl AppError {
    fn internal(error: &str, cause: impl ToString) -> Self {
        AppError::Internal {
            error: error.to_string(),
            message: cause.to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Detailed { status, .. } => *status,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            AppError::BadRequest(error) | AppError::NotFound(error) | AppError::Conflict(error) => {
                ErrorBody {
                    error,
                    message: None,
                    details: None,
                }
            }
            AppError::Internal { error, message } => {
                tracing::error!("{}: {}", error, message);
                ErrorBody {
                    error,
                    message: Some(message),
                    details: None,
                }
            }
            AppError::Detailed { error, details, .. } => {
                if status.is_server_error() {
                    tracing::error!("{}: {}", error, details);
                }
                ErrorBody {
                    error,
                    message: None,
                    details: Some(details),
                }
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Detailed {
            status: rejection.status(),
            error: "Invalid request body".to_string(),
            details: rejection.body_text(),
        }
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Detailed {
            status: rejection.status(),
            error: "Invalid query parameters".to_string(),
            details: rejection.body_text(),
        }
    }
}

impl From<StreamChatError> for AppError {
    fn from(error: StreamChatError) -> Self {
        match error {
            StreamChatError::ModelNotFound(_) => AppError::NotFound(error.to_string()),
            StreamChatError::NoUserMessage => AppError::BadRequest(error.to_string()),
            StreamChatError::ProviderUnavailable(_) => {
                AppError::internal("Chat provider unavailable", error)
            }
        }
    }
}

impl From<StoreRedditPostError> for AppError {
    fn from(error: StoreRedditPostError) -> Self {
        match error {
            StoreRedditPostError::InvalidFormat => AppError::BadRequest(error.to_string()),
            StoreRedditPostError::DuplicatePost(_) => AppError::Conflict(error.to_string()),
            StoreRedditPostError::RepositoryError(msg) => {
                AppError::internal("Failed to store Reddit post data", msg)
            }
        }
    }
}

impl From<ListRedditPostsError> for AppError {
    fn from(error: ListRedditPostsError) -> Self {
        match error {
            ListRedditPostsError::RepositoryError(msg) => {
                AppError::internal("Failed to retrieve Reddit posts", msg)
            }
        }
    }
}

impl From<GetRedditPostError> for AppError {
    fn from(error: GetRedditPostError) -> Self {
        match error {
            GetRedditPostError::NotFound(_) => AppError::NotFound(error.to_string()),
            GetRedditPostError::ValidationError(msg) => AppError::BadRequest(msg),
            GetRedditPostError::RepositoryError(msg) => {
                AppError::internal("Failed to retrieve Reddit post", msg)
            }
        }
    }
}

impl From<QueryRedditPostError> for AppError {
    fn from(error: QueryRedditPostError) -> Self {
        match error {
            QueryRedditPostError::MissingPostId | QueryRedditPostError::InvalidQuery(_) => {
                AppError::BadRequest(error.to_string())
            }
            QueryRedditPostError::NotFound(_) => AppError::NotFound(error.to_string()),
            QueryRedditPostError::RepositoryError(msg) => {
                AppError::internal("Failed to query Reddit post data", msg)
            }
        }
    }
}

impl From<ImportRedditExportError> for AppError {
    fn from(error: ImportRedditExportError) -> Self {
        match error {
            ImportRedditExportError::SourceError(details) => AppError::Detailed {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: "Internal Server Error".to_string(),
                details,
            },
            ImportRedditExportError::InvalidJson(details) => AppError::Detailed {
                status: StatusCode::BAD_REQUEST,
                error: "Invalid JSON format in reddit.json file".to_string(),
                details,
            },
            ImportRedditExportError::NotAnArray => AppError::BadRequest(error.to_string()),
            ImportRedditExportError::InsertFailed(details) => AppError::Detailed {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: "Database insert failed".to_string(),
                details,
            },
        }
    }
}

impl From<ImportRedditListingsError> for AppError {
    fn from(error: ImportRedditListingsError) -> Self {
        match error {
            ImportRedditListingsError::InvalidFormat => AppError::BadRequest(error.to_string()),
            ImportRedditListingsError::SourceError(_) | ImportRedditListingsError::InvalidJson(_) => {
                AppError::internal("Failed to import Reddit posts", error)
            }
        }
    }
}

impl From<SyncPostsToCacheError> for AppError {
    fn from(error: SyncPostsToCacheError) -> Self {
        match error {
            SyncPostsToCacheError::NoPosts => AppError::NotFound(error.to_string()),
            SyncPostsToCacheError::RepositoryError(_) | SyncPostsToCacheError::CacheError(_) => {
                AppError::internal("Failed to sync Reddit posts to cache", error)
            }
        }
    }
}

impl From<AddKnowledgeChunkError> for AppError {
    fn from(error: AddKnowledgeChunkError) -> Self {
        match error {
            AddKnowledgeChunkError::ValidationError(msg) => AppError::BadRequest(msg),
            AddKnowledgeChunkError::EmbeddingError(_) | AddKnowledgeChunkError::RepositoryError(_) => {
                AppError::internal("Failed to add knowledge chunk", error)
            }
        }
    }
}

impl From<SearchKnowledgeError> for AppError {
    fn from(error: SearchKnowledgeError) -> Self {
        match error {
            SearchKnowledgeError::ValidationError(msg) => AppError::BadRequest(msg),
            SearchKnowledgeError::SearchError(_) => {
                AppError::internal("Failed to search knowledge base", error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_use_case_errors_map_to_statuses() {
        assert_eq!(
            AppError::from(StreamChatError::ModelNotFound("nope".to_string())).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::from(StoreRedditPostError::DuplicatePost("abc".to_string())).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::from(QueryRedditPostError::MissingPostId).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::from(ImportRedditExportError::InvalidJson("eof".to_string())).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::from(ImportRedditExportError::InsertFailed("down".to_string())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_bad_request_body_has_error_only() {
        let body = ErrorBody {
            error: "Post ID is required".to_string(),
            message: None,
            details: None,
        };

        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({ "error": "Post ID is required" })
        );
    }
}
