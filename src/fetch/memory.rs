// Tue Jan 13 2026 - Alex

use crate::fetch::{FetchError, ResourceFetcher, ResourceKind};
use crate::model::{CommentResponse, Page, PageRequest, PostResponse, TodoResponse, UserResponse};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

/// Map-backed fetcher. Parents with nothing registered answer with an empty
/// collection, the same way the remote answers "not found".
pub struct InMemoryFetcher {
    users: Vec<UserResponse>,
    posts: HashMap<i64, Vec<PostResponse>>,
    todos: HashMap<i64, Vec<TodoResponse>>,
    comments: HashMap<i64, Vec<CommentResponse>>,
    failures: HashSet<(ResourceKind, i64)>,
    fail_listing: bool,
    latency: Option<Duration>,
    calls: AtomicUsize,
}

impl InMemoryFetcher {
    pub fn new() -> Self {
        Self {
            users: Vec::new(),
            posts: HashMap::new(),
            todos: HashMap::new(),
            comments: HashMap::new(),
            failures: HashSet::new(),
            fail_listing: false,
            latency: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_user(mut self, user: UserResponse) -> Self {
        self.users.push(user);
        self
    }

    pub fn with_post(mut self, post: PostResponse) -> Self {
        self.posts.entry(post.user_id).or_default().push(post);
        self
    }

    pub fn with_todo(mut self, todo: TodoResponse) -> Self {
        self.todos.entry(todo.user_id).or_default().push(todo);
        self
    }

    pub fn with_comment(mut self, comment: CommentResponse) -> Self {
        self.comments.entry(comment.post_id).or_default().push(comment);
        self
    }

    /// Makes the fetch of `kind` for parent `id` fail.
    pub fn fail_on(mut self, kind: ResourceKind, id: i64) -> Self {
        self.failures.insert((kind, id));
        self
    }

    pub fn fail_listing(mut self) -> Self {
        self.fail_listing = true;
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Number of fetcher calls served so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// A small fixed dataset shaped like the public gorest API.
    pub fn sample() -> Self {
        let mut fetcher = Self::new();

        for user_id in 1..=4 {
            fetcher = fetcher.with_user(
                UserResponse::new(user_id)
                    .with_name(&format!("User {}", user_id))
                    .with_email(&format!("user{}@example.com", user_id))
                    .with_status(if user_id % 2 == 0 { "inactive" } else { "active" }),
            );

            for n in 0..user_id {
                let post_id = user_id * 100 + n;
                fetcher = fetcher.with_post(
                    PostResponse::new(post_id, user_id)
                        .with_title(&format!("Post {} by user {}", n + 1, user_id))
                        .with_body("Lorem ipsum dolor sit amet."),
                );

                for c in (0..2).rev() {
                    fetcher = fetcher.with_comment(
                        CommentResponse::new(post_id * 10 + c, post_id).with_body("Nice post!"),
                    );
                }
            }

            fetcher = fetcher.with_todo(
                TodoResponse::new(user_id * 1000, user_id)
                    .with_title("Write the weekly report")
                    .with_status(if user_id % 2 == 0 { "completed" } else { "pending" }),
            );
        }

        fetcher
    }

    fn enter(&self, kind: ResourceKind, id: i64) -> Result<(), FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(latency) = self.latency {
            thread::sleep(latency);
        }

        if self.failures.contains(&(kind, id)) {
            return Err(FetchError::Unavailable(format!("{} for {}", kind, id)));
        }

        Ok(())
    }

    fn children<T: Clone>(map: &HashMap<i64, Vec<T>>, id: i64) -> Vec<T> {
        map.get(&id).cloned().unwrap_or_default()
    }
}

impl Default for InMemoryFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceFetcher for InMemoryFetcher {
    fn list_users(&self, request: &PageRequest) -> Result<Page<UserResponse>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_listing {
            return Err(FetchError::Unavailable("users".to_string()));
        }

        if request.is_unspecified() {
            return Ok(Page::single(self.users.clone()));
        }

        let per_page = if request.per_page == 0 { 10 } else { request.per_page as usize };
        let page = request.page.max(1) as usize;
        let total = self.users.len();

        let results = self.users.iter()
            .skip((page - 1) * per_page)
            .take(per_page)
            .cloned()
            .collect();

        Ok(Page {
            limit: per_page as u32,
            page: page as u32,
            pages: total.div_ceil(per_page) as u32,
            total: total as u32,
            results,
        })
    }

    fn get_user(&self, user_id: i64) -> Result<UserResponse, FetchError> {
        self.enter(ResourceKind::User, user_id)?;

        self.users.iter()
            .find(|u| u.id == user_id)
            .cloned()
            .ok_or_else(|| FetchError::UnexpectedStatus {
                endpoint: format!("/users/{}", user_id),
                status: 404,
            })
    }

    fn list_posts(&self, user_id: i64) -> Result<Vec<PostResponse>, FetchError> {
        self.enter(ResourceKind::Posts, user_id)?;
        Ok(Self::children(&self.posts, user_id))
    }

    fn list_todos(&self, user_id: i64) -> Result<Vec<TodoResponse>, FetchError> {
        self.enter(ResourceKind::Todos, user_id)?;
        Ok(Self::children(&self.todos, user_id))
    }

    fn list_comments(&self, post_id: i64) -> Result<Vec<CommentResponse>, FetchError> {
        self.enter(ResourceKind::Comments, post_id)?;
        Ok(Self::children(&self.comments, post_id))
    }
}
