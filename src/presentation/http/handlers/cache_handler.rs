use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use crate::application::use_cases::{
    SyncPostsToCacheUseCase, sync_posts_to_cache::SyncPostsToCacheError,
};
use crate::presentation::http::dto::{MessageResponseDto, SyncResponseDto};
use crate::presentation::http::errors::AppError;

pub struct CacheHandler {
    sync_posts_to_cache_use_case: Arc<SyncPostsToCacheUseCase>,
}

impl CacheHandler {
    pub fn new(sync_posts_to_cache_use_case: Arc<SyncPostsToCacheUseCase>) -> Self {
        Self {
            sync_posts_to_cache_use_case,
        }
    }

    pub async fn sync_posts(State(handler): State<Arc<CacheHandler>>) -> Result<Response, AppError> {
        match handler.sync_posts_to_cache_use_case.execute().await {
            Ok(post_count) => {
                Ok((StatusCode::OK, Json(SyncResponseDto::from(post_count))).into_response())
            }
            Err(SyncPostsToCacheError::NoPosts) => Ok((
                StatusCode::NOT_FOUND,
                Json(MessageResponseDto {
                    message: "No Reddit posts found".to_string(),
                }),
            )
                .into_response()),
            Err(e) => Err(e.into()),
        }
    }
}
