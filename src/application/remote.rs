//! The seam to the remote post store.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::posts::{NewPost, Post, PostPage, PostPatch};
use crate::domain::types::SortOrder;

/// Uniform failure of a remote call. Nothing is retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("remote returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("failed to decode response: {0}")]
    Decode(String),
    #[error("invalid URL: {0}")]
    Url(String),
}

impl RemoteError {
    pub fn transport(err: impl std::fmt::Display) -> Self {
        Self::Transport(err.to_string())
    }

    pub fn decode(err: impl std::fmt::Display) -> Self {
        Self::Decode(err.to_string())
    }
}

/// Parameters of one page of the sorted listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListQuery {
    pub page: u64,
    pub page_size: u64,
    pub order: SortOrder,
}

impl ListQuery {
    pub fn new(page: u64, page_size: u64, order: SortOrder) -> Self {
        Self {
            page: page.max(1),
            page_size,
            order,
        }
    }

    /// Saturates for absurdly large pages; such a page is past the end and
    /// comes back empty.
    pub fn skip(&self) -> u64 {
        (self.page - 1).saturating_mul(self.page_size)
    }
}

#[async_trait]
pub trait PostsRemote: Send + Sync {
    async fn list(&self, query: ListQuery) -> Result<PostPage, RemoteError>;

    /// Unpaginated keyword search.
    async fn search(&self, keyword: &str) -> Result<Vec<Post>, RemoteError>;

    async fn get_by_id(&self, id: u64) -> Result<Post, RemoteError>;

    async fn create(&self, post: &NewPost) -> Result<Post, RemoteError>;

    async fn update(&self, id: u64, patch: &PostPatch) -> Result<Post, RemoteError>;

    /// Only the acknowledgement matters; the response body is ignored.
    async fn delete(&self, id: u64) -> Result<(), RemoteError>;
}
