//! Intents flowing into the board, effects flowing out of it.
//!
//! The board never performs I/O. It turns an [`Intent`] into [`Effect`]s; the
//! runtime executes remote requests and feeds each [`Completion`] back.

use crate::application::recency::RequestToken;
use crate::application::remote::{ListQuery, PostsRemote, RemoteError};
use crate::domain::posts::{NewPost, Post, PostPage, PostPatch};
use crate::domain::types::SortOrder;

/// A user action, independent of how it was entered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Reload what the list currently shows.
    Refresh,
    GoToPage(u64),
    PrevGroup,
    NextGroup,
    ChangeOrder(SortOrder),
    /// Raw query box contents after a keystroke.
    QueryChanged(String),
    ShowDetails(u64),
    OpenCreate,
    OpenEdit(u64),
    EditTitle(String),
    EditBody(String),
    SubmitForm,
    CloseModal,
    /// Click outside the dialog content.
    DismissOutside,
    Delete(u64),
    Confirm(Confirmation),
    Decline,
}

/// A question the user has to answer before the board proceeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    DiscardDraft,
    DeletePost(u64),
}

impl Confirmation {
    pub fn prompt(&self) -> String {
        match self {
            Confirmation::DiscardDraft => {
                "Discard your unsaved changes and close the form?".to_string()
            }
            Confirmation::DeletePost(id) => format!("Delete post #{id}?"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Request(Request),
    Confirm(Confirmation),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub token: RequestToken,
    pub call: RemoteCall,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteCall {
    List(ListQuery),
    Search(String),
    Get(u64),
    Create(NewPost),
    Update { id: u64, patch: PostPatch },
    Delete(u64),
}

impl RemoteCall {
    pub fn kind(&self) -> &'static str {
        match self {
            RemoteCall::List(_) => "list",
            RemoteCall::Search(_) => "search",
            RemoteCall::Get(_) => "get",
            RemoteCall::Create(_) => "create",
            RemoteCall::Update { .. } => "update",
            RemoteCall::Delete(_) => "delete",
        }
    }

    pub async fn execute(&self, remote: &dyn PostsRemote) -> Result<RemoteResponse, RemoteError> {
        match self {
            RemoteCall::List(query) => remote.list(*query).await.map(RemoteResponse::Page),
            RemoteCall::Search(keyword) => remote
                .search(keyword)
                .await
                .map(RemoteResponse::SearchResults),
            RemoteCall::Get(id) => remote.get_by_id(*id).await.map(RemoteResponse::Post),
            RemoteCall::Create(post) => remote.create(post).await.map(RemoteResponse::Post),
            RemoteCall::Update { id, patch } => {
                remote.update(*id, patch).await.map(RemoteResponse::Post)
            }
            RemoteCall::Delete(id) => remote
                .delete(*id)
                .await
                .map(|()| RemoteResponse::Acknowledged),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteResponse {
    Page(PostPage),
    SearchResults(Vec<Post>),
    Post(Post),
    Acknowledged,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub token: RequestToken,
    pub outcome: Result<RemoteResponse, RemoteError>,
}
