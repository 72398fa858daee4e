use axum::{
    Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;

use crate::application::use_cases::{AddKnowledgeChunkUseCase, SearchKnowledgeUseCase};
use crate::presentation::http::dto::{
    AddKnowledgeChunkDto, KnowledgeChunkResponseDto, KnowledgeSearchParamsDto,
    KnowledgeSearchResponseDto,
};
use crate::presentation::http::errors::AppError;

pub struct KnowledgeHandler {
    add_knowledge_chunk_use_case: Arc<AddKnowledgeChunkUseCase>,
    search_knowledge_use_case: Arc<SearchKnowledgeUseCase>,
}

impl KnowledgeHandler {
    pub fn new(
        add_knowledge_chunk_use_case: Arc<AddKnowledgeChunkUseCase>,
        search_knowledge_use_case: Arc<SearchKnowledgeUseCase>,
    ) -> Self {
        Self {
            add_knowledge_chunk_use_case,
            search_knowledge_use_case,
        }
    }

    pub async fn add_chunk(
        State(handler): State<Arc<KnowledgeHandler>>,
        payload: Result<Json<AddKnowledgeChunkDto>, JsonRejection>,
    ) -> Result<impl IntoResponse, AppError> {
        let Json(body) = payload?;
        let chunk = handler
            .add_knowledge_chunk_use_case
            .execute(body.into())
            .await?;

        Ok((StatusCode::CREATED, Json(KnowledgeChunkResponseDto { chunk })))
    }

    pub async fn search(
        State(handler): State<Arc<KnowledgeHandler>>,
        params: Result<Query<KnowledgeSearchParamsDto>, QueryRejection>,
    ) -> Result<impl IntoResponse, AppError> {
        let Query(params) = params?;
        let response = handler
            .search_knowledge_use_case
            .execute(params.into())
            .await?;

        Ok((
            StatusCode::OK,
            Json(KnowledgeSearchResponseDto::from(response)),
        ))
    }
}
