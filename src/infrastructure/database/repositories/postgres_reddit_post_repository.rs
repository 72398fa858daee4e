use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

use crate::domain::entities::RedditPost;
use crate::domain::repositories::{
    RedditPostRepository, reddit_post_repository::RedditPostRepositoryError,
};
use crate::infrastructure::database::models::{NewRedditPostModel, RedditPostModel};
use crate::infrastructure::database::schema::reddit_posts::dsl::*;
use crate::infrastructure::database::{DbPool, get_connection_from_pool};

/// Postgres caps bind parameters per statement; four per row keeps batches well under it.
const INSERT_BATCH_SIZE: usize = 1000;

pub struct PostgresRedditPostRepository {
    pool: DbPool,
}

impl PostgresRedditPostRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RedditPostRepository for PostgresRedditPostRepository {
    async fn save(&self, post: &RedditPost) -> Result<RedditPost, RedditPostRepositoryError> {
        let mut conn = get_connection_from_pool(&self.pool)
            .map_err(|e| RedditPostRepositoryError::DatabaseError(e.to_string()))?;

        let new_post = NewRedditPostModel::from(post);

        let inserted: RedditPostModel = diesel::insert_into(reddit_posts)
            .values(&new_post)
            .returning(RedditPostModel::as_returning())
            .get_result(&mut conn)
            .map_err(|e| match e {
                DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                    RedditPostRepositoryError::DuplicatePostId(post.post_id().to_string())
                }
                other => RedditPostRepositoryError::DatabaseError(other.to_string()),
            })?;

        Ok(inserted.into())
    }

    async fn save_batch(&self, posts: &[RedditPost]) -> Result<Vec<RedditPost>, RedditPostRepositoryError> {
        let mut conn = get_connection_from_pool(&self.pool)
            .map_err(|e| RedditPostRepositoryError::DatabaseError(e.to_string()))?;

        let new_posts: Vec<NewRedditPostModel> = posts.iter().map(NewRedditPostModel::from).collect();

        let inserted = conn
            .transaction::<_, DieselError, _>(|conn| {
                let mut inserted = Vec::with_capacity(new_posts.len());
                for batch in new_posts.chunks(INSERT_BATCH_SIZE) {
                    let rows: Vec<RedditPostModel> = diesel::insert_into(reddit_posts)
                        .values(batch)
                        .on_conflict(post_id)
                        .do_nothing()
                        .returning(RedditPostModel::as_returning())
                        .get_results(conn)?;
                    inserted.extend(rows);
                }
                Ok(inserted)
            })
            .map_err(|e| RedditPostRepositoryError::DatabaseError(e.to_string()))?;

        Ok(inserted.into_iter().map(RedditPost::from).collect())
    }

    async fn find_by_post_id(&self, wanted: &str) -> Result<Option<RedditPost>, RedditPostRepositoryError> {
        let mut conn = get_connection_from_pool(&self.pool)
            .map_err(|e| RedditPostRepositoryError::DatabaseError(e.to_string()))?;

        let result = reddit_posts
            .filter(post_id.eq(wanted))
            .select(RedditPostModel::as_select())
            .first(&mut conn)
            .optional()
            .map_err(|e| RedditPostRepositoryError::DatabaseError(e.to_string()))?;

        Ok(result.map(RedditPost::from))
    }

    async fn find_all(&self) -> Result<Vec<RedditPost>, RedditPostRepositoryError> {
        let mut conn = get_connection_from_pool(&self.pool)
            .map_err(|e| RedditPostRepositoryError::DatabaseError(e.to_string()))?;

        let models = reddit_posts
            .order(created_at.desc())
            .select(RedditPostModel::as_select())
            .load(&mut conn)
            .map_err(|e| RedditPostRepositoryError::DatabaseError(e.to_string()))?;

        Ok(models.into_iter().map(RedditPost::from).collect())
    }

    async fn find_all_data(&self) -> Result<Vec<serde_json::Value>, RedditPostRepositoryError> {
        let mut conn = get_connection_from_pool(&self.pool)
            .map_err(|e| RedditPostRepositoryError::DatabaseError(e.to_string()))?;

        reddit_posts
            .select(data)
            .load::<serde_json::Value>(&mut conn)
            .map_err(|e| RedditPostRepositoryError::DatabaseError(e.to_string()))
    }
}
