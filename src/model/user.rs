// Tue Jan 13 2026 - Alex

use crate::model::post::PostDto;
use crate::model::todo::TodoDto;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub status: String,
}

impl UserResponse {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            name: String::new(),
            email: String::new(),
            gender: String::new(),
            status: String::new(),
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn with_email(mut self, email: &str) -> Self {
        self.email = email.to_string();
        self
    }

    pub fn with_status(mut self, status: &str) -> Self {
        self.status = status.to_string();
        self
    }
}

/// A user together with every post (and its comments) and todo it owns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserDto {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub gender: String,
    pub status: String,

    pub posts: Vec<PostDto>,
    pub todos: Vec<TodoDto>,
}

impl UserDto {
    pub fn post_count(&self) -> usize {
        self.posts.len()
    }

    pub fn comment_count(&self) -> usize {
        self.posts.iter().map(|p| p.comments.len()).sum()
    }

    pub fn todo_count(&self) -> usize {
        self.todos.len()
    }
}

impl From<UserResponse> for UserDto {
    fn from(user: UserResponse) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            gender: user.gender,
            status: user.status,
            posts: Vec::new(),
            todos: Vec::new(),
        }
    }
}
