// Tue Jan 13 2026 - Alex

use serde::{Deserialize, Serialize};

/// Paging parameters for the user listing. Zero means "let the remote decide".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u32,
    pub per_page: u32,
}

impl PageRequest {
    pub fn new(page: u32, per_page: u32) -> Self {
        Self { page, per_page }
    }

    pub fn is_unspecified(&self) -> bool {
        self.page == 0 && self.per_page == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub limit: u32,
    pub page: u32,
    pub pages: u32,
    pub total: u32,

    pub results: Vec<T>,
}

impl<T> Page<T> {
    /// A page that holds the whole collection.
    pub fn single(results: Vec<T>) -> Self {
        let len = results.len() as u32;

        Self {
            limit: len,
            page: 1,
            pages: 1,
            total: len,
            results,
        }
    }

    /// Keeps the paging metadata, swaps the payload.
    pub fn with_results<U>(&self, results: Vec<U>) -> Page<U> {
        Page {
            limit: self.limit,
            page: self.page,
            pages: self.pages,
            total: self.total,
            results,
        }
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}
