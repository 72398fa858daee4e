use serde::{Deserialize, Serialize};

/// A comment after normalisation, with its replies nested recursively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedComment {
    pub comment_id: String,
    pub comment_text: String,
    pub comment_author: String,
    pub comment_created_at: f64,
    pub comment_likes: i64,
    pub replies: Vec<ProcessedComment>,
}

impl ProcessedComment {
    /// Number of comments in this subtree, this one included.
    pub fn thread_size(&self) -> usize {
        1 + self.replies.iter().map(ProcessedComment::thread_size).sum::<usize>()
    }
}

/// The normalised `data` blob of an imported post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedPost {
    pub post_title: String,
    pub post_url: String,
    pub post_description: Option<String>,
    pub post_author: String,
    pub post_created_at: f64,
    pub post_likes: i64,
    pub post_comment_count: i64,
    pub comments: Vec<ProcessedComment>,
}

impl ProcessedPost {
    pub fn total_comments(&self) -> usize {
        self.comments.iter().map(ProcessedComment::thread_size).sum()
    }
}
