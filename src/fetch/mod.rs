// Tue Jan 13 2026 - Alex

pub mod error;
pub mod http;
pub mod memory;
pub mod traits;

pub use error::FetchError;
pub use http::{HttpFetcher, StatusOutcome, StatusPolicy};
pub use memory::InMemoryFetcher;
pub use traits::{ResourceFetcher, ResourceKind};
