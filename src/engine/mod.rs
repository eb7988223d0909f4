// Tue Jan 13 2026 - Alex

pub mod branch;
pub mod core;
pub mod errors;
pub mod join;
pub mod observer;
pub mod task;
pub mod worker;

pub use self::core::{EngineSettings, UserAggregator};
pub use branch::Branch;
pub use errors::{AggregateError, EngineError, ErrorAggregator};
pub use observer::{LogObserver, MetricsSnapshot, NoopObserver, PoolMetrics, PoolObserver, TaskOutcome};
pub use task::Task;
pub use worker::WorkerPool;
