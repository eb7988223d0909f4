// Tue Jan 13 2026 - Alex

use crate::model::comment::CommentDto;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: i64,
    pub user_id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
}

impl PostResponse {
    pub fn new(id: i64, user_id: i64) -> Self {
        Self {
            id,
            user_id,
            title: String::new(),
            body: String::new(),
        }
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    pub fn with_body(mut self, body: &str) -> Self {
        self.body = body.to_string();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostDto {
    pub id: i64,
    #[serde(skip)]
    pub user_id: i64,
    pub title: String,
    pub body: String,

    pub comments: Vec<CommentDto>,
}

impl From<PostResponse> for PostDto {
    fn from(post: PostResponse) -> Self {
        Self {
            id: post.id,
            user_id: post.user_id,
            title: post.title,
            body: post.body,
            comments: Vec::new(),
        }
    }
}
