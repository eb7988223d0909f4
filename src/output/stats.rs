// Tue Jan 13 2026 - Alex

use crate::model::{Page, UserDto};
use crate::utils::{format_duration, pluralize};
use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub users: usize,
    pub posts: usize,
    pub comments: usize,
    pub todos: usize,
    pub completed_todos: usize,
    pub page: u32,
    pub pages: u32,
    pub total: u32,
    pub elapsed: Duration,
}

impl Summary {
    pub fn from_page(page: &Page<UserDto>, elapsed: Duration) -> Self {
        let users = &page.results;

        Self {
            users: users.len(),
            posts: users.iter().map(|u| u.post_count()).sum(),
            comments: users.iter().map(|u| u.comment_count()).sum(),
            todos: users.iter().map(|u| u.todo_count()).sum(),
            completed_todos: users.iter()
                .flat_map(|u| u.todos.iter())
                .filter(|t| t.is_completed())
                .count(),
            page: page.page,
            pages: page.pages,
            total: page.total,
            elapsed,
        }
    }

    pub fn lines(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Users", pluralize(self.users, "user", "users")),
            ("Posts", pluralize(self.posts, "post", "posts")),
            ("Comments", pluralize(self.comments, "comment", "comments")),
            ("Todos", format!("{} ({} completed)", self.todos, self.completed_todos)),
            ("Page", format!("{} of {} ({} users total)", self.page, self.pages, self.total)),
            ("Elapsed", format_duration(self.elapsed)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::join;
    use crate::model::{CommentResponse, PostResponse, TodoResponse, UserResponse};

    #[test]
    fn test_summary_counts() {
        let posts = join::attach_comments(
            vec![PostResponse::new(1, 1), PostResponse::new(2, 2)],
            vec![CommentResponse::new(1, 1), CommentResponse::new(2, 1), CommentResponse::new(3, 2)],
        );
        let todos = vec![
            TodoResponse::new(1, 1).with_status("completed"),
            TodoResponse::new(2, 2).with_status("pending"),
        ];
        let users = join::assemble(vec![UserResponse::new(1), UserResponse::new(2)], posts, todos);

        let summary = Summary::from_page(&Page::single(users), Duration::from_millis(12));

        assert_eq!(summary.users, 2);
        assert_eq!(summary.posts, 2);
        assert_eq!(summary.comments, 3);
        assert_eq!(summary.todos, 2);
        assert_eq!(summary.completed_todos, 1);
        assert_eq!(summary.lines()[0].1, "2 users");
    }
}
