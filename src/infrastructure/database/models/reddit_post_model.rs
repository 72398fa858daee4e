use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;

use crate::domain::entities::RedditPost as DomainRedditPost;
use crate::infrastructure::database::schema::reddit_posts;

#[derive(Debug, Clone, Queryable, Selectable, Serialize, Identifiable)]
#[diesel(table_name = reddit_posts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct RedditPostModel {
    pub id: i32,
    pub post_id: String,
    pub created_at: DateTime<Utc>,
    pub author: String,
    pub data: serde_json::Value,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = reddit_posts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewRedditPostModel {
    pub post_id: String,
    pub created_at: DateTime<Utc>,
    pub author: String,
    pub data: serde_json::Value,
}

impl From<&DomainRedditPost> for NewRedditPostModel {
    fn from(post: &DomainRedditPost) -> Self {
        Self {
            post_id: post.post_id().to_string(),
            created_at: post.created_at(),
            author: post.author().to_string(),
            data: post.data().clone(),
        }
    }
}

impl From<RedditPostModel> for DomainRedditPost {
    fn from(model: RedditPostModel) -> Self {
        DomainRedditPost::restore(
            model.id,
            model.post_id,
            model.created_at,
            model.author,
            model.data,
        )
    }
}
