// Tue Jan 13 2026 - Alex

use crate::fetch::FetchError;
use crate::model::{CommentResponse, Page, PageRequest, PostResponse, TodoResponse, UserResponse};
use std::fmt;

/// Source of the raw resources the aggregation engine stitches together.
///
/// The list endpoints for posts, todos and comments report a parent that has
/// nothing under it as an empty collection, never as an error.
pub trait ResourceFetcher: Send + Sync {
    fn list_users(&self, request: &PageRequest) -> Result<Page<UserResponse>, FetchError>;
    fn get_user(&self, user_id: i64) -> Result<UserResponse, FetchError>;
    fn list_posts(&self, user_id: i64) -> Result<Vec<PostResponse>, FetchError>;
    fn list_todos(&self, user_id: i64) -> Result<Vec<TodoResponse>, FetchError>;
    fn list_comments(&self, post_id: i64) -> Result<Vec<CommentResponse>, FetchError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Users,
    User,
    Posts,
    Todos,
    Comments,
}

impl ResourceKind {
    pub fn name(&self) -> &'static str {
        match self {
            ResourceKind::Users => "users",
            ResourceKind::User => "user",
            ResourceKind::Posts => "posts",
            ResourceKind::Todos => "todos",
            ResourceKind::Comments => "comments",
        }
    }

    /// Whether a "not found" from the remote means "no children".
    pub fn missing_is_empty(&self) -> bool {
        matches!(self, ResourceKind::Posts | ResourceKind::Todos | ResourceKind::Comments)
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
