//! In-memory implementations of the ports and repositories for unit tests.

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, TimeZone, Utc};
use futures::stream;
use pgvector::Vector;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use crate::application::ports::cache_store::{CacheEntry, CacheError, CacheStore};
use crate::application::ports::chat_provider::{
    ChatCompletionProvider, ChatCompletionRequest, ChatProviderError, TextDeltaStream,
};
use crate::application::ports::embedding_provider::{
    EmbeddingProvider, EmbeddingProviderError, EmbeddingRequest, EmbeddingResponse,
};
use crate::application::ports::export_source::{ExportSource, ExportSourceError};
use crate::domain::entities::{KnowledgeChunk, KnowledgeMatch, ModelProvider, RedditPost};
use crate::domain::repositories::knowledge_chunk_repository::{
    KnowledgeChunkRepository, KnowledgeChunkRepositoryError,
};
use crate::domain::repositories::reddit_post_repository::{
    RedditPostRepository, RedditPostRepositoryError,
};

/// A normalised post created `offset_days` after a fixed epoch.
pub fn sample_post_at(post_id: &str, offset_days: i64) -> RedditPost {
    let created_at = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap() + ChronoDuration::days(offset_days);
    RedditPost::new(
        post_id.to_string(),
        created_at,
        "saver".to_string(),
        json!({
            "postTitle": format!("Post {}", post_id),
            "postUrl": format!("https://www.reddit.com/r/FIREPakistan/comments/{}/", post_id),
            "comments": [{ "commentId": "c1", "commentText": "Try MMFs", "replies": [] }]
        }),
    )
}

pub fn sample_post(post_id: &str) -> RedditPost {
    sample_post_at(post_id, 0)
}

#[derive(Default)]
pub struct FakeRedditPostRepository {
    posts: Mutex<Vec<RedditPost>>,
    failing: bool,
}

impl FakeRedditPostRepository {
    pub fn with_posts(posts: Vec<RedditPost>) -> Self {
        let repository = Self::default();
        for post in posts {
            repository.store(&post);
        }
        repository
    }

    pub fn failing() -> Self {
        Self {
            posts: Mutex::new(Vec::new()),
            failing: true,
        }
    }

    pub fn stored(&self) -> Vec<RedditPost> {
        self.posts.lock().unwrap().clone()
    }

    fn store(&self, post: &RedditPost) -> Option<RedditPost> {
        let mut posts = self.posts.lock().unwrap();
        if posts.iter().any(|p| p.post_id() == post.post_id()) {
            return None;
        }
        let stored = RedditPost::restore(
            posts.len() as i32 + 1,
            post.post_id().to_string(),
            post.created_at(),
            post.author().to_string(),
            post.data().clone(),
        );
        posts.push(stored.clone());
        Some(stored)
    }

    fn check(&self) -> Result<(), RedditPostRepositoryError> {
        if self.failing {
            return Err(RedditPostRepositoryError::DatabaseError(
                "connection refused".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl RedditPostRepository for FakeRedditPostRepository {
    async fn save(&self, post: &RedditPost) -> Result<RedditPost, RedditPostRepositoryError> {
        self.check()?;
        self.store(post)
            .ok_or_else(|| RedditPostRepositoryError::DuplicatePostId(post.post_id().to_string()))
    }

    async fn save_batch(
        &self,
        posts: &[RedditPost],
    ) -> Result<Vec<RedditPost>, RedditPostRepositoryError> {
        self.check()?;
        Ok(posts.iter().filter_map(|post| self.store(post)).collect())
    }

    async fn find_by_post_id(
        &self,
        post_id: &str,
    ) -> Result<Option<RedditPost>, RedditPostRepositoryError> {
        self.check()?;
        Ok(self
            .posts
            .lock()
            .unwrap()
            .iter()
            .find(|post| post.post_id() == post_id)
            .cloned())
    }

    async fn find_all(&self) -> Result<Vec<RedditPost>, RedditPostRepositoryError> {
        self.check()?;
        let mut posts = self.stored();
        posts.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(posts)
    }

    async fn find_all_data(&self) -> Result<Vec<Value>, RedditPostRepositoryError> {
        self.check()?;
        Ok(self.stored().into_iter().map(RedditPost::into_data).collect())
    }
}

#[derive(Default)]
pub struct FakeCacheStore {
    entries: Mutex<HashMap<String, (String, Duration)>>,
    failing: bool,
}

impl FakeCacheStore {
    pub fn failing() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            failing: true,
        }
    }

    pub fn ttl_of(&self, key: &str) -> Option<Duration> {
        self.entries.lock().unwrap().get(key).map(|(_, ttl)| *ttl)
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.lock().unwrap().keys().cloned().collect();
        keys.sort();
        keys
    }
}

#[async_trait]
impl CacheStore for FakeCacheStore {
    async fn set_many(&self, entries: &[CacheEntry], ttl: Duration) -> Result<(), CacheError> {
        if self.failing {
            return Err(CacheError::ConnectionError("cache unavailable".to_string()));
        }
        let mut stored = self.entries.lock().unwrap();
        for entry in entries {
            stored.insert(entry.key.clone(), (entry.value.clone(), ttl));
        }
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        if self.failing {
            return Err(CacheError::ConnectionError("cache unavailable".to_string()));
        }
        Ok(self
            .entries
            .lock()
            .unwrap()
            .get(key)
            .map(|(value, _)| value.clone()))
    }
}

pub struct FakeEmbeddingProvider {
    embedding: Option<Vec<f32>>,
}

impl FakeEmbeddingProvider {
    pub fn returning(embedding: Vec<f32>) -> Self {
        Self {
            embedding: Some(embedding),
        }
    }

    pub fn failing() -> Self {
        Self { embedding: None }
    }
}

#[async_trait]
impl EmbeddingProvider for FakeEmbeddingProvider {
    async fn generate_embedding(
        &self,
        _request: EmbeddingRequest,
    ) -> Result<EmbeddingResponse, EmbeddingProviderError> {
        match &self.embedding {
            Some(values) => Ok(EmbeddingResponse {
                embedding: Vector::from(values.clone()),
                model_name: "fake-embedding".to_string(),
            }),
            None => Err(EmbeddingProviderError::ServiceUnavailable),
        }
    }

    fn model_name(&self) -> &str {
        "fake-embedding"
    }

    fn max_input_length(&self) -> usize {
        2048
    }

    fn embedding_dimension(&self) -> usize {
        self.embedding.as_ref().map(Vec::len).unwrap_or(0)
    }
}

#[derive(Default)]
pub struct FakeKnowledgeChunkRepository {
    chunks: Mutex<Vec<KnowledgeChunk>>,
}

impl FakeKnowledgeChunkRepository {
    pub fn insert(&self, chunk: KnowledgeChunk) -> KnowledgeChunk {
        let mut chunks = self.chunks.lock().unwrap();
        let stored = KnowledgeChunk::restore(
            chunks.len() as i32 + 1,
            chunk.content().to_string(),
            chunk.source().map(str::to_string),
            chunk.metadata().cloned(),
            chunk.embedding().cloned(),
            chunk.created_at(),
            chunk.updated_at(),
        );
        chunks.push(stored.clone());
        stored
    }

    pub fn stored(&self) -> Vec<KnowledgeChunk> {
        self.chunks.lock().unwrap().clone()
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot / (norm_a * norm_b)) as f64
}

#[async_trait]
impl KnowledgeChunkRepository for FakeKnowledgeChunkRepository {
    async fn save(
        &self,
        chunk: &KnowledgeChunk,
    ) -> Result<KnowledgeChunk, KnowledgeChunkRepositoryError> {
        Ok(self.insert(chunk.clone()))
    }

    async fn match_chunks(
        &self,
        query_embedding: &Vector,
        similarity_threshold: f64,
        match_count: i32,
    ) -> Result<Vec<KnowledgeMatch>, KnowledgeChunkRepositoryError> {
        let mut matches: Vec<KnowledgeMatch> = self
            .stored()
            .into_iter()
            .filter_map(|chunk| {
                let similarity =
                    cosine_similarity(query_embedding.as_slice(), chunk.embedding()?.as_slice());
                (similarity > similarity_threshold).then(|| KnowledgeMatch {
                    id: chunk.id().unwrap_or_default(),
                    content: chunk.content().to_string(),
                    source: chunk.source().map(str::to_string),
                    metadata: chunk.metadata().cloned().unwrap_or_else(|| json!({})),
                    similarity,
                })
            })
            .collect();
        matches.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
        matches.truncate(match_count.max(0) as usize);
        Ok(matches)
    }
}

/// Replays scripted deltas; an `Err` item becomes a mid-stream failure.
pub struct FakeChatProvider {
    provider: ModelProvider,
    script: Vec<Result<String, String>>,
    fail_on_start: bool,
    requests: Mutex<Vec<ChatCompletionRequest>>,
}

impl FakeChatProvider {
    pub fn new(provider: ModelProvider, script: Vec<Result<String, String>>) -> Self {
        Self {
            provider,
            script,
            fail_on_start: false,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_on_start(provider: ModelProvider) -> Self {
        Self {
            fail_on_start: true,
            ..Self::new(provider, Vec::new())
        }
    }

    pub fn requests(&self) -> Vec<ChatCompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatCompletionProvider for FakeChatProvider {
    async fn stream_completion(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<TextDeltaStream, ChatProviderError> {
        self.requests.lock().unwrap().push(request);
        if self.fail_on_start {
            return Err(ChatProviderError::ApiError {
                status: 503,
                message: "model overloaded".to_string(),
            });
        }

        let items: Vec<Result<String, ChatProviderError>> = self
            .script
            .iter()
            .map(|item| item.clone().map_err(ChatProviderError::StreamError))
            .collect();
        Ok(Box::pin(stream::iter(items)))
    }

    fn provider(&self) -> ModelProvider {
        self.provider
    }
}

pub struct FakeExportSource {
    content: Option<String>,
}

impl FakeExportSource {
    pub fn with_content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
        }
    }

    pub fn missing() -> Self {
        Self { content: None }
    }
}

#[async_trait]
impl ExportSource for FakeExportSource {
    async fn read_export(&self) -> Result<String, ExportSourceError> {
        self.content
            .clone()
            .ok_or_else(|| ExportSourceError::NotFound(self.location()))
    }

    fn location(&self) -> String {
        "memory://reddit.json".to_string()
    }
}
