//! Page-scoped post cache.
//!
//! Holds the posts currently on screen plus optimistic local mutations layered
//! on top. Contents are replaced wholesale on every navigation and never merged
//! across pages.

use crate::domain::posts::Post;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostCache {
    posts: Vec<Post>,
}

impl PostCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn get(&self, id: u64) -> Option<&Post> {
        self.posts.iter().find(|post| post.id == id)
    }

    pub fn contains(&self, id: u64) -> bool {
        self.get(id).is_some()
    }

    /// Discard previous contents, keeping the server-given order.
    pub fn replace(&mut self, posts: Vec<Post>) -> &[Post] {
        self.posts = posts;
        &self.posts
    }

    /// Prepend a freshly created post. An older entry with the same id is
    /// dropped so ids stay unique.
    pub fn insert_front(&mut self, post: Post) -> &[Post] {
        self.posts.retain(|existing| existing.id != post.id);
        self.posts.insert(0, post);
        &self.posts
    }

    /// Replace in place; absent ids are a no-op since the post may have left
    /// the current page.
    pub fn replace_by_id(&mut self, id: u64, updated: Post) -> &[Post] {
        if let Some(slot) = self.posts.iter_mut().find(|post| post.id == id) {
            *slot = updated;
        }
        &self.posts
    }

    pub fn remove_by_id(&mut self, id: u64) -> &[Post] {
        self.posts.retain(|post| post.id != id);
        &self.posts
    }
}
