// Tue Jan 13 2026 - Alex

pub mod json;
pub mod stats;

pub use json::{JsonWriter, OutputError};
pub use stats::Summary;
