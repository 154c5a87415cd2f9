use askama::{Error as AskamaError, Template};
use thiserror::Error;

use crate::application::board::BoardSnapshot;
use crate::application::intent::Confirmation;
use crate::application::modal::{ModalState, PostForm};
use crate::application::pagination::PaginationState;
use crate::application::search::ListingMode;
use crate::domain::posts::Post;

#[derive(Debug, Error)]
#[error("{public_message}")]
pub struct TemplateRenderError {
    pub(crate) source: &'static str,
    pub(crate) public_message: &'static str,
    #[source]
    pub(crate) error: AskamaError,
}

impl TemplateRenderError {
    pub fn new(source: &'static str, public_message: &'static str, error: AskamaError) -> Self {
        Self {
            source,
            public_message,
            error,
        }
    }

    pub fn origin(&self) -> &'static str {
        self.source
    }
}

pub fn render_template<T: Template>(template: T) -> Result<String, TemplateRenderError> {
    template.render().map_err(|err| {
        TemplateRenderError::new(
            "presentation::views::render_template",
            "Template rendering failed",
            err,
        )
    })
}

/// Render the whole board: notice, listing, pager and any open dialog.
pub fn render_board(snapshot: &BoardSnapshot<'_>) -> Result<String, TemplateRenderError> {
    render_template(BoardTemplate {
        view: BoardView::from_snapshot(snapshot),
    })
}

/// Render the detail of a single post without the surrounding board.
pub fn render_post(post: &Post) -> Result<String, TemplateRenderError> {
    render_template(PostTemplate {
        view: DetailView::from(post),
    })
}

pub fn render_help() -> Result<String, TemplateRenderError> {
    render_template(HelpTemplate)
}

pub fn confirmation_prompt(confirmation: &Confirmation) -> String {
    format!("{} [y/N] ", confirmation.prompt())
}

#[derive(Debug, Clone)]
pub struct BoardView {
    pub heading: String,
    pub status: Option<&'static str>,
    pub notice: Option<String>,
    pub rows: Vec<PostRowView>,
    pub empty_message: Option<&'static str>,
    pub pagination: Option<PaginationView>,
    pub detail: Option<DetailView>,
    pub form: Option<FormView>,
}

impl BoardView {
    pub fn from_snapshot(snapshot: &BoardSnapshot<'_>) -> Self {
        let heading = match snapshot.mode {
            ListingMode::Paged => format!("Posts ({} first)", snapshot.order.label()),
            ListingMode::Search { keyword } => format!("Search results for \"{keyword}\""),
        };

        let status = if snapshot.busy {
            Some("loading...")
        } else if snapshot.query_pending {
            Some("waiting for typing to stop...")
        } else {
            None
        };

        let rows: Vec<PostRowView> = snapshot.posts.iter().map(PostRowView::from).collect();
        let empty_message = rows.is_empty().then(|| {
            if snapshot.mode.is_search() {
                "No posts match."
            } else {
                "No posts on this page."
            }
        });

        let (detail, form) = match snapshot.modal {
            ModalState::Closed => (None, None),
            ModalState::Details(post) => (Some(DetailView::from(post)), None),
            ModalState::Create(form) => (None, Some(FormView::new("New post".to_string(), form))),
            ModalState::Edit { post, form } => (
                None,
                Some(FormView::new(format!("Edit post #{}", post.id), form)),
            ),
        };

        Self {
            heading,
            status,
            notice: snapshot.notice.map(str::to_string),
            rows,
            empty_message,
            pagination: snapshot.pagination.and_then(PaginationView::from_state),
            detail,
            form,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PostRowView {
    pub id: u64,
    pub title: String,
    pub author: u64,
}

impl From<&Post> for PostRowView {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id,
            title: post.title.clone(),
            author: post.user_id,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PageButtonView {
    pub number: u64,
    pub current: bool,
}

#[derive(Debug, Clone)]
pub struct PaginationView {
    pub pages: Vec<PageButtonView>,
    pub has_prev: bool,
    pub has_next: bool,
    pub total_pages: u64,
    pub total_count: u64,
}

impl PaginationView {
    /// `None` when there is nothing to page through.
    pub fn from_state(state: &PaginationState) -> Option<Self> {
        let window = state.window()?;
        let current = state.current_page();
        Some(Self {
            pages: window
                .pages()
                .map(|number| PageButtonView {
                    number,
                    current: number == current,
                })
                .collect(),
            has_prev: state.prev_group_target().is_some(),
            has_next: state.next_group_target().is_some(),
            total_pages: state.total_pages(),
            total_count: state.total_count(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct DetailView {
    pub id: u64,
    pub title: String,
    pub body: String,
    pub author: u64,
    pub views: u64,
    pub likes: u64,
    pub dislikes: u64,
    pub tags: String,
}

impl From<&Post> for DetailView {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id,
            title: post.title.clone(),
            body: post.body.clone(),
            author: post.user_id,
            views: post.views,
            likes: post.reactions.likes,
            dislikes: post.reactions.dislikes,
            tags: post.tags.join(", "),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FormView {
    pub heading: String,
    pub title: String,
    pub body: String,
    pub dirty: bool,
    pub submitting: bool,
}

impl FormView {
    fn new(heading: String, form: &PostForm) -> Self {
        Self {
            heading,
            title: form.draft().title.clone(),
            body: form.draft().body.clone(),
            dirty: form.is_dirty(),
            submitting: form.is_submitting(),
        }
    }
}

#[derive(Template)]
#[template(path = "board.txt")]
pub struct BoardTemplate {
    pub view: BoardView,
}

#[derive(Template)]
#[template(path = "post.txt")]
pub struct PostTemplate {
    pub view: DetailView,
}

#[derive(Template)]
#[template(path = "help.txt")]
pub struct HelpTemplate;
