// Tue Jan 13 2026 - Alex

use crate::config::{default_concurrency, Config, DEFAULT_BRANCH_WORKERS};
use crate::engine::branch::Branch;
use crate::engine::errors::{AggregateError, EngineError, ErrorAggregator};
use crate::engine::join;
use crate::engine::observer::{NoopObserver, PoolObserver};
use crate::engine::worker::WorkerPool;
use crate::fetch::{ResourceFetcher, ResourceKind};
use crate::model::{Page, PageRequest, PostDto, TodoResponse, UserDto, UserResponse};
use crate::utils::logging::scoped_timer;
use itertools::Itertools;
use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSettings {
    pub branch_workers: usize,
    pub fetch_concurrency: usize,
    pub nested_fetch_concurrency: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            branch_workers: DEFAULT_BRANCH_WORKERS,
            fetch_concurrency: default_concurrency(),
            nested_fetch_concurrency: default_concurrency(),
        }
    }
}

impl From<&Config> for EngineSettings {
    fn from(config: &Config) -> Self {
        Self {
            branch_workers: config.branch_workers,
            fetch_concurrency: config.fetch_concurrency,
            nested_fetch_concurrency: config.nested_fetch_concurrency,
        }
    }
}

/// Per-call state shared by the three branches.
struct Run {
    fetcher: Arc<dyn ResourceFetcher>,
    settings: EngineSettings,
    observer: Arc<dyn PoolObserver>,
    errors: Arc<ErrorAggregator>,
}

impl Run {
    fn branch(&self, kind: ResourceKind, concurrency: usize) -> Branch {
        Branch::new(kind, self.errors.clone())
            .with_concurrency(concurrency)
            .with_observer(self.observer.clone())
    }

    fn users(&self, ids: Vec<i64>) -> Vec<UserResponse> {
        let fetcher = self.fetcher.clone();
        self.branch(ResourceKind::User, self.settings.fetch_concurrency)
            .run(ids, move |id| fetcher.get_user(id).map(|user| vec![user]))
    }

    fn todos(&self, ids: Vec<i64>) -> Vec<TodoResponse> {
        let fetcher = self.fetcher.clone();
        self.branch(ResourceKind::Todos, self.settings.fetch_concurrency)
            .run(ids, move |id| fetcher.list_todos(id))
    }

    fn posts(&self, ids: Vec<i64>) -> Vec<PostDto> {
        let fetcher = self.fetcher.clone();
        let posts = self.branch(ResourceKind::Posts, self.settings.fetch_concurrency)
            .run(ids, move |id| fetcher.list_posts(id));

        let post_ids: Vec<i64> = posts.iter().map(|p| p.id).unique().collect();

        // Comments get their own pool so they don't eat into the sibling
        // branches' workers.
        let (comments_tx, comments_rx) = channel();
        let mut child = WorkerPool::named("comments", 1).with_observer(self.observer.clone());

        let fetcher = self.fetcher.clone();
        let branch = self.branch(ResourceKind::Comments, self.settings.nested_fetch_concurrency);
        child.submit(move || {
            let comments = branch.run(post_ids, move |id| fetcher.list_comments(id));
            let _ = comments_tx.send(comments);
        });
        child.wait();

        let comments = receive(comments_rx, ResourceKind::Comments, &self.errors);

        if self.errors.has_errors() {
            return Vec::new();
        }

        join::attach_comments(posts, comments)
    }
}

fn receive<T>(rx: Receiver<Vec<T>>, kind: ResourceKind, errors: &ErrorAggregator) -> Vec<T> {
    rx.recv().unwrap_or_else(|_| {
        errors.append(EngineError::BranchLost { kind });
        Vec::new()
    })
}

/// Builds the user -> posts -> comments / user -> todos tree.
///
/// The user list is fetched once, then user details, posts (with a nested
/// comments pass) and todos are resolved by three concurrent branches. Any
/// failure anywhere discards the whole result.
pub struct UserAggregator {
    fetcher: Arc<dyn ResourceFetcher>,
    settings: EngineSettings,
    observer: Arc<dyn PoolObserver>,
}

impl UserAggregator {
    pub fn new(fetcher: Arc<dyn ResourceFetcher>) -> Self {
        Self {
            fetcher,
            settings: EngineSettings::default(),
            observer: Arc::new(NoopObserver),
        }
    }

    pub fn with_settings(mut self, settings: EngineSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn PoolObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn aggregate(&self) -> Result<Vec<UserDto>, AggregateError> {
        self.aggregate_page(&PageRequest::default()).map(|page| page.results)
    }

    pub fn aggregate_page(&self, request: &PageRequest) -> Result<Page<UserDto>, AggregateError> {
        let _timer = scoped_timer("aggregate");

        let listing = self.fetcher
            .list_users(request)
            .map_err(|source| AggregateError::single(EngineError::Listing { source }))?;

        let ids: Vec<i64> = listing.results.iter().map(|u| u.id).unique().collect();
        log::info!("Aggregating {} users (page {} of {})", ids.len(), listing.page, listing.pages);

        if ids.is_empty() {
            return Ok(listing.with_results(Vec::new()));
        }

        let run = Arc::new(Run {
            fetcher: self.fetcher.clone(),
            settings: self.settings,
            observer: self.observer.clone(),
            errors: Arc::new(ErrorAggregator::new()),
        });

        let (users_tx, users_rx) = channel();
        let (posts_tx, posts_rx) = channel();
        let (todos_tx, todos_rx) = channel();

        let mut pool = WorkerPool::named("aggregate", self.settings.branch_workers)
            .with_observer(self.observer.clone());

        let (r, branch_ids) = (run.clone(), ids.clone());
        pool.submit(move || {
            let _ = users_tx.send(r.users(branch_ids));
        });

        let (r, branch_ids) = (run.clone(), ids.clone());
        pool.submit(move || {
            let _ = posts_tx.send(r.posts(branch_ids));
        });

        let (r, branch_ids) = (run.clone(), ids);
        pool.submit(move || {
            let _ = todos_tx.send(r.todos(branch_ids));
        });

        pool.wait();

        let users = receive(users_rx, ResourceKind::User, &run.errors);
        let posts = receive(posts_rx, ResourceKind::Posts, &run.errors);
        let todos = receive(todos_rx, ResourceKind::Todos, &run.errors);

        if let Err(e) = run.errors.collect() {
            log::warn!("Aggregation failed with {} error(s)", e.len());
            return Err(e);
        }

        let users = join::assemble(users, posts, todos);
        Ok(listing.with_results(users))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::observer::PoolMetrics;
    use crate::fetch::InMemoryFetcher;
    use crate::model::{CommentResponse, PostResponse};
    use std::time::Duration;

    fn aggregator(fetcher: InMemoryFetcher) -> UserAggregator {
        UserAggregator::new(Arc::new(fetcher)).with_settings(EngineSettings {
            branch_workers: 3,
            fetch_concurrency: 4,
            nested_fetch_concurrency: 2,
        })
    }

    fn two_user_fixture() -> InMemoryFetcher {
        InMemoryFetcher::new()
            .with_user(UserResponse::new(2))
            .with_user(UserResponse::new(1))
            .with_post(PostResponse::new(1, 1))
            .with_post(PostResponse::new(2, 2))
            .with_comment(CommentResponse::new(2, 1))
            .with_comment(CommentResponse::new(1, 1))
            .with_comment(CommentResponse::new(3, 2))
            .with_todo(TodoResponse::new(1, 1))
            .with_todo(TodoResponse::new(2, 2))
    }

    #[test]
    fn test_two_user_tree() {
        let result = aggregator(two_user_fixture()).aggregate().unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].id, 1);
        assert_eq!(result[1].id, 2);

        let first: Vec<i64> = result[0].posts[0].comments.iter().map(|c| c.id).collect();
        assert_eq!(first, vec![1, 2]);
        assert_eq!(result[1].posts[0].comments.len(), 1);
        assert_eq!(result[0].todos.len(), 1);
        assert_eq!(result[1].todos.len(), 1);
    }

    #[test]
    fn test_result_sorted_regardless_of_latency() {
        let mut fetcher = InMemoryFetcher::new().with_latency(Duration::from_millis(2));
        for id in (1..=12).rev() {
            fetcher = fetcher.with_user(UserResponse::new(id)).with_post(PostResponse::new(id * 10, id));
        }

        let result = aggregator(fetcher).aggregate().unwrap();

        assert_eq!(result.len(), 12);
        assert!(result.windows(2).all(|w| w[0].id < w[1].id));
        assert!(result.iter().all(|u| u.posts.len() == 1 && u.todos.is_empty()));
    }

    #[test]
    fn test_listing_failure() {
        let result = aggregator(two_user_fixture().fail_listing()).aggregate();

        let err = result.unwrap_err();
        assert!(matches!(err.errors()[0], EngineError::Listing { .. }));
    }

    #[test]
    fn test_todo_failure_discards_everything() {
        let fetcher = InMemoryFetcher::new()
            .with_user(UserResponse::new(1))
            .with_post(PostResponse::new(1, 1))
            .with_comment(CommentResponse::new(1, 1))
            .fail_on(ResourceKind::Todos, 1);

        let err = aggregator(fetcher).aggregate().unwrap_err();
        assert_eq!(err.kinds(), vec![ResourceKind::Todos]);
    }

    #[test]
    fn test_detail_failure_discards_everything() {
        let err = aggregator(two_user_fixture().fail_on(ResourceKind::User, 2))
            .aggregate()
            .unwrap_err();

        assert_eq!(err.len(), 1);
    }

    #[test]
    fn test_comment_failure_discards_everything() {
        let err = aggregator(two_user_fixture().fail_on(ResourceKind::Comments, 2))
            .aggregate()
            .unwrap_err();

        assert_eq!(err.kinds(), vec![ResourceKind::Comments]);
    }

    #[test]
    fn test_failures_across_branches_are_all_reported() {
        let fetcher = two_user_fixture()
            .fail_on(ResourceKind::Posts, 1)
            .fail_on(ResourceKind::Posts, 2)
            .fail_on(ResourceKind::Todos, 2);

        let err = aggregator(fetcher).aggregate().unwrap_err();
        assert_eq!(err.len(), 3);
    }

    #[test]
    fn test_sibling_fetches_still_run_after_failure() {
        let fetcher = Arc::new(two_user_fixture().fail_on(ResourceKind::User, 1));
        let agg = UserAggregator::new(fetcher.clone());

        assert!(agg.aggregate().is_err());
        // listing + 2 details + 2 post lists + 2 todo lists + 2 comment lists
        assert_eq!(fetcher.calls(), 9);
    }

    #[test]
    fn test_empty_listing() {
        let metrics = Arc::new(PoolMetrics::new());
        let result = aggregator(InMemoryFetcher::new())
            .with_observer(metrics.clone())
            .aggregate()
            .unwrap();

        assert!(result.is_empty());
        assert_eq!(metrics.snapshot().submitted, 0);
    }

    #[test]
    fn test_user_without_children() {
        let fetcher = InMemoryFetcher::new().with_user(UserResponse::new(5));
        let result = aggregator(fetcher).aggregate().unwrap();

        assert_eq!(result.len(), 1);
        assert!(result[0].posts.is_empty());
        assert!(result[0].todos.is_empty());
    }

    #[test]
    fn test_single_branch_worker_still_completes() {
        let agg = aggregator(two_user_fixture()).with_settings(EngineSettings {
            branch_workers: 1,
            fetch_concurrency: 1,
            nested_fetch_concurrency: 1,
        });

        assert_eq!(agg.aggregate().unwrap().len(), 2);
    }

    #[test]
    fn test_paged_aggregate_keeps_metadata() {
        let mut fetcher = InMemoryFetcher::new();
        for id in 1..=5 {
            fetcher = fetcher.with_user(UserResponse::new(id));
        }

        let page = aggregator(fetcher).aggregate_page(&PageRequest::new(3, 2)).unwrap();

        assert_eq!(page.page, 3);
        assert_eq!(page.pages, 3);
        assert_eq!(page.total, 5);
        assert_eq!(page.results.len(), 1);
        assert_eq!(page.results[0].id, 5);
    }

    #[test]
    fn test_pool_metrics_observed() {
        let metrics = Arc::new(PoolMetrics::new());
        aggregator(two_user_fixture())
            .with_observer(metrics.clone())
            .aggregate()
            .unwrap();

        let snap = metrics.snapshot();
        // 3 branches + 1 comments child + 4 branch pools x (consumer, producer)
        assert_eq!(snap.submitted, 12);
        assert_eq!(snap.completed, 12);
        assert_eq!(snap.failed, 0);
        assert_eq!(snap.running_workers, 0);
    }
}
