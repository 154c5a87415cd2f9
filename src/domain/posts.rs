//! Post records and the form drafts that create or edit them.

pub use postboard_api_types::{NewPost, Post, PostPage, PostPatch, Reactions};

use super::error::DomainError;

/// Title and body as typed into the create or edit form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostDraft {
    pub title: String,
    pub body: String,
}

/// A draft whose fields passed validation, already trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidDraft {
    pub title: String,
    pub body: String,
}

impl PostDraft {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }

    pub fn from_post(post: &Post) -> Self {
        Self::new(post.title.clone(), post.body.clone())
    }

    /// Reject drafts whose title or body is blank after trimming.
    pub fn validate(&self) -> Result<ValidDraft, DomainError> {
        let title = self.title.trim();
        let body = self.body.trim();
        if title.is_empty() || body.is_empty() {
            return Err(DomainError::validation(
                "please fill in both the title and the body",
            ));
        }
        Ok(ValidDraft {
            title: title.to_string(),
            body: body.to_string(),
        })
    }
}

impl ValidDraft {
    pub fn into_new_post(self, user_id: u64) -> NewPost {
        NewPost {
            title: self.title,
            body: self.body,
            user_id,
        }
    }

    pub fn into_patch(self) -> PostPatch {
        PostPatch {
            title: self.title,
            body: self.body,
        }
    }
}
