// Tue Jan 13 2026 - Alex

use crate::fetch::{FetchError, ResourceKind};
use parking_lot::Mutex;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Failed to list users: {source}")]
    Listing {
        #[source]
        source: FetchError,
    },
    #[error("Failed to fetch {kind} for {parent_id}: {source}")]
    Fetch {
        kind: ResourceKind,
        parent_id: i64,
        #[source]
        source: FetchError,
    },
    #[error("{kind} producer stopped before delivering every result")]
    ProducerLost { kind: ResourceKind },
    #[error("{kind} consumer stopped before handing over its results")]
    ConsumerLost { kind: ResourceKind },
    #[error("{kind} branch stopped before handing over its results")]
    BranchLost { kind: ResourceKind },
    #[error("Failed to build {kind} fetch pool: {message}")]
    PoolBuild { kind: ResourceKind, message: String },
}

impl EngineError {
    pub fn kind(&self) -> ResourceKind {
        match self {
            EngineError::Listing { .. } => ResourceKind::Users,
            EngineError::Fetch { kind, .. }
            | EngineError::ProducerLost { kind }
            | EngineError::ConsumerLost { kind }
            | EngineError::BranchLost { kind }
            | EngineError::PoolBuild { kind, .. } => *kind,
        }
    }
}

/// Every failure recorded during one aggregation.
#[derive(Debug)]
pub struct AggregateError {
    errors: Vec<EngineError>,
}

impl AggregateError {
    pub fn new(errors: Vec<EngineError>) -> Self {
        Self { errors }
    }

    pub fn single(error: EngineError) -> Self {
        Self { errors: vec![error] }
    }

    pub fn errors(&self) -> &[EngineError] {
        &self.errors
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn kinds(&self) -> Vec<ResourceKind> {
        self.errors.iter().map(|e| e.kind()).collect()
    }
}

impl fmt::Display for AggregateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.errors.as_slice() {
            [] => write!(f, "no errors"),
            [only] => write!(f, "{}", only),
            many => {
                write!(f, "{} errors occurred: ", many.len())?;
                for (i, e) in many.iter().enumerate() {
                    if i > 0 {
                        f.write_str("; ")?;
                    }
                    write!(f, "{}", e)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for AggregateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.errors.first().map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Lock-guarded error list shared by every branch and item task of one
/// aggregation.
#[derive(Debug, Default)]
pub struct ErrorAggregator {
    errors: Mutex<Vec<EngineError>>,
}

impl ErrorAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&self, error: EngineError) {
        self.errors.lock().push(error);
    }

    pub fn append_opt(&self, error: Option<EngineError>) {
        if let Some(error) = error {
            self.append(error);
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.lock().is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Takes everything recorded so far.
    pub fn collect(&self) -> Result<(), AggregateError> {
        let errors = std::mem::take(&mut *self.errors.lock());

        if errors.is_empty() {
            Ok(())
        } else {
            Err(AggregateError::new(errors))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn unavailable(kind: ResourceKind, parent_id: i64) -> EngineError {
        EngineError::Fetch {
            kind,
            parent_id,
            source: FetchError::Unavailable("test".to_string()),
        }
    }

    #[test]
    fn test_empty_collects_ok() {
        let errors = ErrorAggregator::new();
        errors.append_opt(None);

        assert!(errors.collect().is_ok());
    }

    #[test]
    fn test_concurrent_appends_are_all_kept() {
        let errors = Arc::new(ErrorAggregator::new());

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let errors = errors.clone();
                thread::spawn(move || {
                    for j in 0..25 {
                        errors.append(unavailable(ResourceKind::Posts, i * 100 + j));
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let err = errors.collect().unwrap_err();
        assert_eq!(err.len(), 200);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_display_joins_messages() {
        let err = AggregateError::new(vec![
            unavailable(ResourceKind::Todos, 1),
            EngineError::ProducerLost { kind: ResourceKind::Comments },
        ]);

        let text = err.to_string();
        assert!(text.starts_with("2 errors occurred"));
        assert!(text.contains("todos for 1"));
        assert!(text.contains("comments producer"));
        assert_eq!(err.kinds(), vec![ResourceKind::Todos, ResourceKind::Comments]);
    }

    #[test]
    fn test_single_error_display() {
        let err = AggregateError::single(EngineError::Listing {
            source: FetchError::Unavailable("users".to_string()),
        });

        assert_eq!(err.to_string(), "Failed to list users: Resource unavailable: users");
        assert!(std::error::Error::source(&err).is_some());
    }
}
