use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sql_types::{Double, Integer};
use pgvector::Vector;

use crate::domain::entities::{KnowledgeChunk, KnowledgeMatch};
use crate::domain::repositories::{
    KnowledgeChunkRepository, knowledge_chunk_repository::KnowledgeChunkRepositoryError,
};
use crate::infrastructure::database::models::{
    KnowledgeChunkModel, KnowledgeMatchRow, NewKnowledgeChunkModel,
};
use crate::infrastructure::database::schema::knowledge_chunks::dsl::*;
use crate::infrastructure::database::{DbPool, get_connection_from_pool};

pub struct PostgresKnowledgeChunkRepository {
    pool: DbPool,
}

impl PostgresKnowledgeChunkRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl KnowledgeChunkRepository for PostgresKnowledgeChunkRepository {
    async fn save(&self, chunk: &KnowledgeChunk) -> Result<KnowledgeChunk, KnowledgeChunkRepositoryError> {
        let mut conn = get_connection_from_pool(&self.pool)
            .map_err(|e| KnowledgeChunkRepositoryError::DatabaseError(e.to_string()))?;

        let new_chunk = NewKnowledgeChunkModel::from(chunk);

        let inserted: KnowledgeChunkModel = diesel::insert_into(knowledge_chunks)
            .values(&new_chunk)
            .returning(KnowledgeChunkModel::as_returning())
            .get_result(&mut conn)
            .map_err(|e| KnowledgeChunkRepositoryError::DatabaseError(e.to_string()))?;

        Ok(inserted.into())
    }

    async fn match_chunks(
        &self,
        query_embedding: &Vector,
        similarity_threshold: f64,
        match_count: i32,
    ) -> Result<Vec<KnowledgeMatch>, KnowledgeChunkRepositoryError> {
        let mut conn = get_connection_from_pool(&self.pool)
            .map_err(|e| KnowledgeChunkRepositoryError::DatabaseError(e.to_string()))?;

        let rows = diesel::sql_query("SELECT * FROM match_chunks($1, $2, $3)")
            .bind::<pgvector::sql_types::Vector, _>(query_embedding)
            .bind::<Double, _>(similarity_threshold)
            .bind::<Integer, _>(match_count)
            .load::<KnowledgeMatchRow>(&mut conn)
            .map_err(|e| KnowledgeChunkRepositoryError::DatabaseError(e.to_string()))?;

        Ok(rows.into_iter().map(KnowledgeMatch::from).collect())
    }
}
