// Tue Jan 13 2026 - Alex

use crate::config::Config;
use crate::fetch::{FetchError, ResourceFetcher, ResourceKind};
use crate::model::{CommentResponse, Page, PageRequest, PostResponse, TodoResponse, UserResponse};
use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, AUTHORIZATION};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;

pub const HEADER_LIMIT: &str = "X-Pagination-Limit";
pub const HEADER_PAGE: &str = "X-Pagination-Page";
pub const HEADER_PAGES: &str = "X-Pagination-Pages";
pub const HEADER_TOTAL: &str = "X-Pagination-Total";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusPolicy {
    Strict,
    MissingIsEmpty,
}

impl StatusPolicy {
    pub fn for_kind(kind: ResourceKind) -> Self {
        if kind.missing_is_empty() {
            StatusPolicy::MissingIsEmpty
        } else {
            StatusPolicy::Strict
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusOutcome {
    Decode,
    Empty,
    Fail,
}

pub fn classify_status(status: StatusCode, policy: StatusPolicy) -> StatusOutcome {
    if status == StatusCode::OK {
        return StatusOutcome::Decode;
    }

    match (status, policy) {
        (StatusCode::NOT_FOUND, StatusPolicy::MissingIsEmpty) => StatusOutcome::Empty,
        _ => StatusOutcome::Fail,
    }
}

/// Blocking gorest client. One instance is shared by every worker thread.
pub struct HttpFetcher {
    client: Client,
    base_url: String,
    access_token: Option<String>,
}

impl HttpFetcher {
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .pool_max_idle_per_host(config.max_idle_per_host)
            .user_agent(config.client_name.clone())
            .build()
            .map_err(FetchError::ClientBuild)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            access_token: config.access_token.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get(&self, path: &str) -> Result<Response, FetchError> {
        let url = format!("{}{}", self.base_url, path);
        log::trace!("GET {}", url);

        let mut request = self.client.get(&url);
        if let Some(ref token) = self.access_token {
            request = request.header(AUTHORIZATION, format!("Bearer {}", token));
        }

        request.send().map_err(|source| FetchError::Http {
            endpoint: path.to_string(),
            source,
        })
    }

    fn decode<T: DeserializeOwned>(path: &str, response: Response) -> Result<T, FetchError> {
        let body = response.bytes().map_err(|source| FetchError::Http {
            endpoint: path.to_string(),
            source,
        })?;

        serde_json::from_slice(&body).map_err(|source| FetchError::Decode {
            endpoint: path.to_string(),
            source,
        })
    }

    fn get_one<T: DeserializeOwned>(&self, path: &str) -> Result<T, FetchError> {
        let response = self.get(path)?;

        match classify_status(response.status(), StatusPolicy::Strict) {
            StatusOutcome::Decode => Self::decode(path, response),
            _ => Err(FetchError::UnexpectedStatus {
                endpoint: path.to_string(),
                status: response.status().as_u16(),
            }),
        }
    }

    fn get_children<T: DeserializeOwned>(&self, kind: ResourceKind, path: &str) -> Result<Vec<T>, FetchError> {
        let response = self.get(path)?;

        match classify_status(response.status(), StatusPolicy::for_kind(kind)) {
            StatusOutcome::Decode => Self::decode(path, response),
            StatusOutcome::Empty => {
                log::debug!("{} reported not found, treating as empty", path);
                Ok(Vec::new())
            }
            StatusOutcome::Fail => Err(FetchError::UnexpectedStatus {
                endpoint: path.to_string(),
                status: response.status().as_u16(),
            }),
        }
    }
}

pub fn users_path(request: &PageRequest) -> String {
    let mut params = Vec::new();

    if request.page > 0 {
        params.push(format!("page={}", request.page));
    }

    if request.per_page > 0 {
        params.push(format!("per_page={}", request.per_page));
    }

    if params.is_empty() {
        "/users".to_string()
    } else {
        format!("/users?{}", params.join("&"))
    }
}

fn header_u32(headers: &HeaderMap, name: &str, fallback: u32) -> Result<u32, FetchError> {
    let Some(value) = headers.get(name) else {
        return Ok(fallback);
    };

    let text = value.to_str().unwrap_or_default().trim();
    text.parse::<u32>().map_err(|_| FetchError::InvalidHeader {
        name: name.to_string(),
        value: text.to_string(),
    })
}

pub fn page_from_headers<T>(headers: &HeaderMap, results: Vec<T>) -> Result<Page<T>, FetchError> {
    let fallback = Page::single(results);

    Ok(Page {
        limit: header_u32(headers, HEADER_LIMIT, fallback.limit)?,
        page: header_u32(headers, HEADER_PAGE, fallback.page)?,
        pages: header_u32(headers, HEADER_PAGES, fallback.pages)?,
        total: header_u32(headers, HEADER_TOTAL, fallback.total)?,
        results: fallback.results,
    })
}

impl ResourceFetcher for HttpFetcher {
    fn list_users(&self, request: &PageRequest) -> Result<Page<UserResponse>, FetchError> {
        let path = users_path(request);
        let response = self.get(&path)?;

        if classify_status(response.status(), StatusPolicy::Strict) != StatusOutcome::Decode {
            return Err(FetchError::UnexpectedStatus {
                endpoint: path,
                status: response.status().as_u16(),
            });
        }

        let headers = response.headers().clone();
        let users: Vec<UserResponse> = Self::decode(&path, response)?;

        page_from_headers(&headers, users)
    }

    fn get_user(&self, user_id: i64) -> Result<UserResponse, FetchError> {
        self.get_one(&format!("/users/{}", user_id))
    }

    fn list_posts(&self, user_id: i64) -> Result<Vec<PostResponse>, FetchError> {
        self.get_children(ResourceKind::Posts, &format!("/users/{}/posts", user_id))
    }

    fn list_todos(&self, user_id: i64) -> Result<Vec<TodoResponse>, FetchError> {
        self.get_children(ResourceKind::Todos, &format!("/users/{}/todos", user_id))
    }

    fn list_comments(&self, post_id: i64) -> Result<Vec<CommentResponse>, FetchError> {
        self.get_children(ResourceKind::Comments, &format!("/posts/{}/comments", post_id))
    }
}
