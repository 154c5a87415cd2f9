//! Wire types shared by the postboard client and its tests.
//!
//! Field names follow the remote JSON (`userId`, `sortBy`), mapped to snake_case
//! on the Rust side.

use serde::{Deserialize, Serialize};

/// A post record owned by the remote store.
///
/// The create endpoint only echoes `id`, `title`, `body` and `userId`, so the
/// engagement fields fall back to their defaults when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: u64,
    pub title: String,
    pub body: String,
    #[serde(rename = "userId", default)]
    pub user_id: u64,
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub reactions: Reactions,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reactions {
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub dislikes: u64,
}

/// One page of the collection as returned by the list and search endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostPage {
    #[serde(default)]
    pub posts: Vec<Post>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub skip: u64,
    #[serde(default)]
    pub limit: u64,
}

/// Payload for `POST /posts/add`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPost {
    pub title: String,
    pub body: String,
    #[serde(rename = "userId")]
    pub user_id: u64,
}

/// Payload for `PUT /posts/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostPatch {
    pub title: String,
    pub body: String,
}
