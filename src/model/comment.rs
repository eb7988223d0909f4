// Tue Jan 13 2026 - Alex

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentResponse {
    pub id: i64,
    pub post_id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub body: String,
}

impl CommentResponse {
    pub fn new(id: i64, post_id: i64) -> Self {
        Self {
            id,
            post_id,
            name: String::new(),
            email: String::new(),
            body: String::new(),
        }
    }

    pub fn with_body(mut self, body: &str) -> Self {
        self.body = body.to_string();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentDto {
    pub id: i64,
    #[serde(skip)]
    pub post_id: i64,
    pub name: String,
    pub email: String,
    pub body: String,
}

impl From<CommentResponse> for CommentDto {
    fn from(comment: CommentResponse) -> Self {
        Self {
            id: comment.id,
            post_id: comment.post_id,
            name: comment.name,
            email: comment.email,
            body: comment.body,
        }
    }
}
