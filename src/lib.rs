// Tue Jan 13 2026 - Alex

pub mod config;
pub mod engine;
pub mod fetch;
pub mod model;
pub mod output;
pub mod utils;

pub use config::Config;
pub use engine::{AggregateError, UserAggregator};
pub use fetch::{HttpFetcher, InMemoryFetcher, ResourceFetcher};
pub use model::{Page, PageRequest, UserDto};
