use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::application::use_cases::add_knowledge_chunk::AddKnowledgeChunkRequest;
use crate::application::use_cases::search_knowledge::{
    SearchKnowledgeRequest, SearchKnowledgeResponse,
};
use crate::domain::entities::{KnowledgeChunk, KnowledgeMatch};

#[derive(Debug, Deserialize)]
pub struct AddKnowledgeChunkDto {
    pub content: String,
    pub source: Option<String>,
    pub metadata: Option<Value>,
    pub embedding: Option<Vec<f32>>,
}

impl From<AddKnowledgeChunkDto> for AddKnowledgeChunkRequest {
    fn from(dto: AddKnowledgeChunkDto) -> Self {
        Self {
            content: dto.content,
            source: dto.source,
            metadata: dto.metadata,
            embedding: dto.embedding,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct KnowledgeChunkResponseDto {
    pub chunk: KnowledgeChunk,
}

#[derive(Debug, Deserialize)]
pub struct KnowledgeSearchParamsDto {
    #[serde(default)]
    pub query: String,
    pub threshold: Option<f64>,
    pub count: Option<i32>,
}

impl From<KnowledgeSearchParamsDto> for SearchKnowledgeRequest {
    fn from(params: KnowledgeSearchParamsDto) -> Self {
        Self {
            query: params.query,
            similarity_threshold: params.threshold,
            match_count: params.count,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeSearchResponseDto {
    pub query: String,
    pub results: Vec<KnowledgeMatch>,
    pub search_time_ms: u64,
}

impl From<SearchKnowledgeResponse> for KnowledgeSearchResponseDto {
    fn from(response: SearchKnowledgeResponse) -> Self {
        Self {
            query: response.query,
            results: response.results,
            search_time_ms: response.search_time_ms,
        }
    }
}
