use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::sql_types::{Double, Integer, Jsonb, Nullable, Text};
use pgvector::Vector;

use crate::domain::entities::{KnowledgeChunk as DomainKnowledgeChunk, KnowledgeMatch};
use crate::infrastructure::database::schema::knowledge_chunks;

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = knowledge_chunks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct KnowledgeChunkModel {
    pub id: i32,
    pub content: String,
    pub source: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub embedding: Option<Vector>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = knowledge_chunks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewKnowledgeChunkModel {
    pub content: String,
    pub source: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub embedding: Option<Vector>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One row of `match_chunks(...)`.
#[derive(Debug, QueryableByName)]
pub struct KnowledgeMatchRow {
    #[diesel(sql_type = Integer)]
    pub id: i32,
    #[diesel(sql_type = Text)]
    pub content: String,
    #[diesel(sql_type = Nullable<Text>)]
    pub source: Option<String>,
    #[diesel(sql_type = Nullable<Jsonb>)]
    pub metadata: Option<serde_json::Value>,
    #[diesel(sql_type = Double)]
    pub similarity: f64,
}

impl From<&DomainKnowledgeChunk> for NewKnowledgeChunkModel {
    fn from(chunk: &DomainKnowledgeChunk) -> Self {
        Self {
            content: chunk.content().to_string(),
            source: chunk.source().map(|s| s.to_string()),
            metadata: chunk.metadata().cloned(),
            embedding: chunk.embedding().cloned(),
            created_at: chunk.created_at(),
            updated_at: chunk.updated_at(),
        }
    }
}

impl From<KnowledgeChunkModel> for DomainKnowledgeChunk {
    fn from(model: KnowledgeChunkModel) -> Self {
        DomainKnowledgeChunk::restore(
            model.id,
            model.content,
            model.source,
            model.metadata,
            model.embedding,
            model.created_at,
            model.updated_at,
        )
    }
}

impl From<KnowledgeMatchRow> for KnowledgeMatch {
    fn from(row: KnowledgeMatchRow) -> Self {
        KnowledgeMatch {
            id: row.id,
            content: row.content,
            source: row.source,
            metadata: row.metadata.unwrap_or_else(|| serde_json::json!({})),
            similarity: row.similarity,
        }
    }
}
