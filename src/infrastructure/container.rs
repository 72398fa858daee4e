use std::sync::Arc;

use crate::{
    application::{
        ports::{CacheStore, ChatCompletionProvider, EmbeddingProvider, ExportSource, RateLimiter},
        services::{KnowledgeService, PostContextService},
        use_cases::{
            AddKnowledgeChunkUseCase, GetRedditPostUseCase, ImportRedditExportUseCase,
            ImportRedditListingsUseCase, ListRedditPostsUseCase, QueryRedditPostUseCase,
            SearchKnowledgeUseCase, StoreRedditPostUseCase, StreamChatUseCase,
            SyncPostsToCacheUseCase,
        },
    },
    domain::repositories::{KnowledgeChunkRepository, RedditPostRepository},
    infrastructure::{
        cache::{InMemoryCacheStore, RedisCacheStore, create_redis_pool},
        config::AppConfig,
        database::{
            create_connection_pool,
            repositories::{PostgresKnowledgeChunkRepository, PostgresRedditPostRepository},
            run_migrations,
        },
        external_services::{
            EmbeddingClientConfig, GeminiChatClient, GeminiEmbeddingClient, OpenAiChatClient,
        },
        file_system::LocalExportSource,
        rate_limit::{InMemorySlidingWindowLimiter, RedisSlidingWindowLimiter},
    },
    presentation::http::{
        HttpServer,
        handlers::{CacheHandler, ChatHandler, KnowledgeHandler, RedditHandler},
    },
};

pub struct AppContainer {
    pub rate_limiter: Arc<dyn RateLimiter>,

    // HTTP Handlers
    pub chat_handler: Arc<ChatHandler>,
    pub reddit_handler: Arc<RedditHandler>,
    pub cache_handler: Arc<CacheHandler>,
    pub knowledge_handler: Arc<KnowledgeHandler>,

    config: AppConfig,
}

impl AppContainer {
    pub async fn new(config: AppConfig) -> Result<Self, Box<dyn std::error::Error>> {
        // Create database connection pool
        let db_pool = create_connection_pool(&config.database_url)?;
        run_migrations(&db_pool).map_err(|e| format!("Failed to run database migrations: {}", e))?;

        // Create repositories
        let reddit_post_repository: Arc<dyn RedditPostRepository> =
            Arc::new(PostgresRedditPostRepository::new(db_pool.clone()));
        let knowledge_chunk_repository: Arc<dyn KnowledgeChunkRepository> =
            Arc::new(PostgresKnowledgeChunkRepository::new(db_pool));

        // Cache and rate limiter share one Redis pool when configured
        let (cache_store, rate_limiter): (Arc<dyn CacheStore>, Arc<dyn RateLimiter>) =
            match &config.redis_url {
                Some(redis_url) => {
                    let redis_pool = create_redis_pool(redis_url)?;
                    tracing::info!("Using Redis for cache and rate limiting");
                    (
                        Arc::new(RedisCacheStore::new(redis_pool.clone())),
                        Arc::new(RedisSlidingWindowLimiter::new(redis_pool, config.rate_limit)),
                    )
                }
                None => {
                    tracing::warn!("REDIS_URL not set, using in-memory cache and rate limiter");
                    (
                        Arc::new(InMemoryCacheStore::new()),
                        Arc::new(InMemorySlidingWindowLimiter::new(config.rate_limit)),
                    )
                }
            };

        // Create external services
        let http_client = reqwest::Client::new();
        let chat_providers: Vec<Arc<dyn ChatCompletionProvider>> = vec![
            Arc::new(GeminiChatClient::new(
                http_client.clone(),
                config.gemini.clone(),
            )),
            Arc::new(OpenAiChatClient::new(http_client, config.openai.clone())),
        ];
        let embedding_provider: Arc<dyn EmbeddingProvider> = Arc::new(GeminiEmbeddingClient::new(
            config.gemini.clone(),
            EmbeddingClientConfig::default(),
        )?);
        let export_source: Arc<dyn ExportSource> =
            Arc::new(LocalExportSource::new(config.reddit_export_path.clone()));

        // Create application services
        let post_context_service = Arc::new(PostContextService::new(
            cache_store.clone(),
            reddit_post_repository.clone(),
        ));
        let knowledge_service = Arc::new(KnowledgeService::new(
            embedding_provider,
            knowledge_chunk_repository.clone(),
        ));

        // Create use cases
        let stream_chat_use_case = Arc::new(StreamChatUseCase::new(
            chat_providers,
            post_context_service,
            knowledge_service.clone(),
            config.knowledge_retrieval_enabled,
        ));

        let store_reddit_post_use_case =
            Arc::new(StoreRedditPostUseCase::new(reddit_post_repository.clone()));
        let list_reddit_posts_use_case =
            Arc::new(ListRedditPostsUseCase::new(reddit_post_repository.clone()));
        let get_reddit_post_use_case =
            Arc::new(GetRedditPostUseCase::new(reddit_post_repository.clone()));
        let query_reddit_post_use_case =
            Arc::new(QueryRedditPostUseCase::new(reddit_post_repository.clone()));
        let import_reddit_export_use_case = Arc::new(ImportRedditExportUseCase::new(
            export_source.clone(),
            reddit_post_repository.clone(),
        ));
        let import_reddit_listings_use_case = Arc::new(ImportRedditListingsUseCase::new(
            export_source,
            reddit_post_repository.clone(),
        ));

        let sync_posts_to_cache_use_case = Arc::new(SyncPostsToCacheUseCase::new(
            reddit_post_repository,
            cache_store,
            config.cache_ttl,
        ));

        let add_knowledge_chunk_use_case = Arc::new(AddKnowledgeChunkUseCase::new(
            knowledge_service.clone(),
            knowledge_chunk_repository,
        ));
        let search_knowledge_use_case = Arc::new(SearchKnowledgeUseCase::new(knowledge_service));

        // Create HTTP handlers
        let chat_handler = Arc::new(ChatHandler::new(stream_chat_use_case));
        let reddit_handler = Arc::new(RedditHandler::new(
            store_reddit_post_use_case,
            list_reddit_posts_use_case,
            get_reddit_post_use_case,
            query_reddit_post_use_case,
            import_reddit_export_use_case,
            import_reddit_listings_use_case,
        ));
        let cache_handler = Arc::new(CacheHandler::new(sync_posts_to_cache_use_case));
        let knowledge_handler = Arc::new(KnowledgeHandler::new(
            add_knowledge_chunk_use_case,
            search_knowledge_use_case,
        ));

        Ok(Self {
            rate_limiter,
            chat_handler,
            reddit_handler,
            cache_handler,
            knowledge_handler,
            config,
        })
    }

    pub fn http_server(&self) -> HttpServer {
        HttpServer::new(
            self.chat_handler.clone(),
            self.reddit_handler.clone(),
            self.cache_handler.clone(),
            self.knowledge_handler.clone(),
            self.rate_limiter.clone(),
            Some(self.config.port),
            self.config.request_body_limit_bytes,
        )
    }
}
