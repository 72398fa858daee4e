use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::Value;
use std::sync::Arc;

use crate::application::use_cases::{
    GetRedditPostUseCase, ImportRedditExportUseCase, ImportRedditListingsUseCase,
    ListRedditPostsUseCase, QueryRedditPostUseCase, StoreRedditPostUseCase,
};
use crate::presentation::http::dto::{
    ImportRedditExportResponseDto, ImportRedditListingsResponseDto, RedditPostDto,
    RedditPostListDto, RedditQueryParamsDto, RedditQueryResponseDto, StoreRedditPostResponseDto,
};
use crate::presentation::http::errors::AppError;

pub struct RedditHandler {
    store_reddit_post_use_case: Arc<StoreRedditPostUseCase>,
    list_reddit_posts_use_case: Arc<ListRedditPostsUseCase>,
    get_reddit_post_use_case: Arc<GetRedditPostUseCase>,
    query_reddit_post_use_case: Arc<QueryRedditPostUseCase>,
    import_reddit_export_use_case: Arc<ImportRedditExportUseCase>,
    import_reddit_listings_use_case: Arc<ImportRedditListingsUseCase>,
}

impl RedditHandler {
    pub fn new(
        store_reddit_post_use_case: Arc<StoreRedditPostUseCase>,
        list_reddit_posts_use_case: Arc<ListRedditPostsUseCase>,
        get_reddit_post_use_case: Arc<GetRedditPostUseCase>,
        query_reddit_post_use_case: Arc<QueryRedditPostUseCase>,
        import_reddit_export_use_case: Arc<ImportRedditExportUseCase>,
        import_reddit_listings_use_case: Arc<ImportRedditListingsUseCase>,
    ) -> Self {
        Self {
            store_reddit_post_use_case,
            list_reddit_posts_use_case,
            get_reddit_post_use_case,
            query_reddit_post_use_case,
            import_reddit_export_use_case,
            import_reddit_listings_use_case,
        }
    }

    pub async fn store_post(
        State(handler): State<Arc<RedditHandler>>,
        payload: Result<Json<Value>, JsonRejection>,
    ) -> Result<impl IntoResponse, AppError> {
        let Json(payload) = payload?;
        let post = handler.store_reddit_post_use_case.execute(&payload).await?;

        Ok((
            StatusCode::CREATED,
            Json(StoreRedditPostResponseDto::from(post)),
        ))
    }

    pub async fn list_posts(
        State(handler): State<Arc<RedditHandler>>,
    ) -> Result<impl IntoResponse, AppError> {
        let posts = handler.list_reddit_posts_use_case.execute().await?;

        Ok((StatusCode::OK, Json(RedditPostListDto { posts })))
    }

    pub async fn get_post(
        State(handler): State<Arc<RedditHandler>>,
        Path(post_id): Path<String>,
    ) -> Result<impl IntoResponse, AppError> {
        let post = handler.get_reddit_post_use_case.execute(&post_id).await?;

        Ok((StatusCode::OK, Json(RedditPostDto { post })))
    }

    pub async fn query_post(
        State(handler): State<Arc<RedditHandler>>,
        params: Result<Query<RedditQueryParamsDto>, QueryRejection>,
    ) -> Result<impl IntoResponse, AppError> {
        let Query(params) = params?;
        let data = handler
            .query_reddit_post_use_case
            .execute(params.into())
            .await?;

        Ok((StatusCode::OK, Json(RedditQueryResponseDto { data })))
    }

    pub async fn import_export(
        State(handler): State<Arc<RedditHandler>>,
    ) -> Result<impl IntoResponse, AppError> {
        let response = handler.import_reddit_export_use_case.execute().await?;
        tracing::info!(
            "Imported {} of {} posts from export",
            response.inserted_count,
            response.total_in_file
        );

        Ok((
            StatusCode::OK,
            Json(ImportRedditExportResponseDto::from(response)),
        ))
    }

    pub async fn import_listings(
        State(handler): State<Arc<RedditHandler>>,
    ) -> Result<impl IntoResponse, AppError> {
        let results = handler.import_reddit_listings_use_case.execute().await?;

        Ok((
            StatusCode::CREATED,
            Json(ImportRedditListingsResponseDto::from(results)),
        ))
    }
}
