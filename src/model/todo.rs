// Tue Jan 13 2026 - Alex

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoResponse {
    pub id: i64,
    pub user_id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub due_on: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub status: String,
}

impl TodoResponse {
    pub fn new(id: i64, user_id: i64) -> Self {
        Self {
            id,
            user_id,
            title: String::new(),
            due_on: None,
            status: String::new(),
        }
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    pub fn with_status(mut self, status: &str) -> Self {
        self.status = status.to_string();
        self
    }

    pub fn with_due_on(mut self, due_on: DateTime<FixedOffset>) -> Self {
        self.due_on = Some(due_on);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TodoDto {
    pub id: i64,
    #[serde(skip)]
    pub user_id: i64,
    pub title: String,
    pub due_on: Option<DateTime<FixedOffset>>,
    pub status: String,
}

impl TodoDto {
    pub fn is_completed(&self) -> bool {
        self.status.eq_ignore_ascii_case("completed")
    }
}

impl From<TodoResponse> for TodoDto {
    fn from(todo: TodoResponse) -> Self {
        Self {
            id: todo.id,
            user_id: todo.user_id,
            title: todo.title,
            due_on: todo.due_on,
            status: todo.status,
        }
    }
}
