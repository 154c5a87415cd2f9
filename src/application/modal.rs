//! Modal dialog state machine.
//!
//! `Closed` is the hub: details, create and edit can only be reached from it
//! and only return to it. Closing a form with unsaved input needs an explicit
//! confirmation; a successful submission force-closes.

use thiserror::Error;

use crate::application::recency::RequestToken;
use crate::domain::error::DomainError;
use crate::domain::posts::{Post, PostDraft, ValidDraft};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ModalError {
    #[error("another dialog is already open")]
    AlreadyOpen,
    #[error("no post form is open")]
    NotEditing,
    #[error("the form is already being submitted")]
    Submitting,
}

/// In-progress create or edit form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostForm {
    draft: PostDraft,
    initial: PostDraft,
    submitting: Option<RequestToken>,
}

impl PostForm {
    fn new(initial: PostDraft) -> Self {
        Self {
            draft: initial.clone(),
            initial,
            submitting: None,
        }
    }

    pub fn draft(&self) -> &PostDraft {
        &self.draft
    }

    pub fn is_dirty(&self) -> bool {
        self.draft != self.initial
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ModalState {
    #[default]
    Closed,
    Details(Post),
    Create(PostForm),
    Edit { post: Post, form: PostForm },
}

/// Result of a close request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    Closed,
    /// Unsaved input; the dialog stays open until the discard is confirmed.
    NeedsConfirmation,
    /// Nothing was open.
    Ignored,
}

/// What a validated form submission should do remotely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitPlan {
    Create(ValidDraft),
    Update { id: u64, draft: ValidDraft },
}

#[derive(Debug, Clone, Default)]
pub struct Modal {
    state: ModalState,
}

impl Modal {
    pub fn state(&self) -> &ModalState {
        &self.state
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.state, ModalState::Closed)
    }

    fn ensure_closed(&self) -> Result<(), ModalError> {
        if self.is_closed() {
            Ok(())
        } else {
            Err(ModalError::AlreadyOpen)
        }
    }

    pub fn open_details(&mut self, post: Post) -> Result<(), ModalError> {
        self.ensure_closed()?;
        self.state = ModalState::Details(post);
        Ok(())
    }

    pub fn open_create(&mut self) -> Result<(), ModalError> {
        self.ensure_closed()?;
        self.state = ModalState::Create(PostForm::new(PostDraft::default()));
        Ok(())
    }

    pub fn open_edit(&mut self, post: Post) -> Result<(), ModalError> {
        self.ensure_closed()?;
        let form = PostForm::new(PostDraft::from_post(&post));
        self.state = ModalState::Edit { post, form };
        Ok(())
    }

    fn form_mut(&mut self) -> Result<&mut PostForm, ModalError> {
        match &mut self.state {
            ModalState::Create(form) | ModalState::Edit { form, .. } => Ok(form),
            ModalState::Closed | ModalState::Details(_) => Err(ModalError::NotEditing),
        }
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> Result<(), ModalError> {
        self.form_mut()?.draft.title = title.into();
        Ok(())
    }

    pub fn set_body(&mut self, body: impl Into<String>) -> Result<(), ModalError> {
        self.form_mut()?.draft.body = body.into();
        Ok(())
    }

    /// Close via the explicit close action.
    pub fn request_close(&mut self) -> CloseOutcome {
        match &self.state {
            ModalState::Closed => CloseOutcome::Ignored,
            ModalState::Details(_) => {
                self.state = ModalState::Closed;
                CloseOutcome::Closed
            }
            ModalState::Create(form) | ModalState::Edit { form, .. } => {
                if form.is_dirty() {
                    CloseOutcome::NeedsConfirmation
                } else {
                    self.state = ModalState::Closed;
                    CloseOutcome::Closed
                }
            }
        }
    }

    /// Click outside the dialog content. Only the details dialog reacts.
    pub fn dismiss_outside(&mut self) -> bool {
        if matches!(self.state, ModalState::Details(_)) {
            self.state = ModalState::Closed;
            true
        } else {
            false
        }
    }

    /// Discard without asking; used after confirmation or a successful save.
    pub fn force_close(&mut self) {
        self.state = ModalState::Closed;
    }

    /// Validate the form and work out the remote call it needs.
    pub fn plan_submit(&self) -> Result<SubmitPlan, SubmitError> {
        match &self.state {
            ModalState::Create(form) => {
                check_idle(form)?;
                Ok(SubmitPlan::Create(form.draft.validate()?))
            }
            ModalState::Edit { post, form } => {
                check_idle(form)?;
                Ok(SubmitPlan::Update {
                    id: post.id,
                    draft: form.draft.validate()?,
                })
            }
            ModalState::Closed | ModalState::Details(_) => {
                Err(SubmitError::Modal(ModalError::NotEditing))
            }
        }
    }

    pub fn mark_submitting(&mut self, token: RequestToken) -> Result<(), ModalError> {
        self.form_mut()?.submitting = Some(token);
        Ok(())
    }

    /// The save behind `token` succeeded: close if that form is still open.
    pub fn finish_submit(&mut self, token: RequestToken) -> bool {
        let owned = matches!(
            &self.state,
            ModalState::Create(form) | ModalState::Edit { form, .. }
                if form.submitting == Some(token)
        );
        if owned {
            self.state = ModalState::Closed;
        }
        owned
    }

    /// The save behind `token` failed: keep the draft and allow a retry.
    pub fn fail_submit(&mut self, token: RequestToken) {
        if let Ok(form) = self.form_mut() {
            if form.submitting == Some(token) {
                form.submitting = None;
            }
        }
    }
}

fn check_idle(form: &PostForm) -> Result<(), ModalError> {
    if form.is_submitting() {
        Err(ModalError::Submitting)
    } else {
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Modal(#[from] ModalError),
    #[error(transparent)]
    Invalid(#[from] DomainError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::recency::RequestSeq;

    fn post(id: u64) -> Post {
        Post {
            id,
            title: format!("title {id}"),
            body: format!("body {id}"),
            user_id: 3,
            views: 10,
            reactions: Default::default(),
            tags: vec!["history".into()],
        }
    }

    #[test]
    fn open_states_require_closed_hub() {
        let mut modal = Modal::default();
        modal.open_details(post(1)).expect("details");

        assert_eq!(modal.open_create(), Err(ModalError::AlreadyOpen));
        assert_eq!(modal.open_edit(post(1)), Err(ModalError::AlreadyOpen));

        assert_eq!(modal.request_close(), CloseOutcome::Closed);
        modal.open_create().expect("create after close");
    }

    #[test]
    fn closing_dirty_create_form_needs_confirmation() {
        let mut modal = Modal::default();
        modal.open_create().expect("create");
        modal.set_title("Draft title").expect("title");

        assert_eq!(modal.request_close(), CloseOutcome::NeedsConfirmation);
        match modal.state() {
            ModalState::Create(form) => assert_eq!(form.draft().title, "Draft title"),
            other => panic!("unexpected state {other:?}"),
        }

        modal.force_close();
        assert!(modal.is_closed());
    }

    #[test]
    fn untouched_edit_form_closes_directly() {
        let mut modal = Modal::default();
        modal.open_edit(post(4)).expect("edit");
        assert_eq!(modal.request_close(), CloseOutcome::Closed);
    }

    #[test]
    fn edit_form_is_prefilled() {
        let mut modal = Modal::default();
        modal.open_edit(post(4)).expect("edit");
        match modal.state() {
            ModalState::Edit { form, .. } => {
                assert_eq!(form.draft().title, "title 4");
                assert_eq!(form.draft().body, "body 4");
                assert!(!form.is_dirty());
            }
            other => panic!("unexpected state {other:?}"),
        }
    }

    #[test]
    fn outside_dismiss_only_closes_details() {
        let mut modal = Modal::default();
        modal.open_create().expect("create");
        assert!(!modal.dismiss_outside());
        assert!(!modal.is_closed());

        modal.force_close();
        modal.open_details(post(2)).expect("details");
        assert!(modal.dismiss_outside());
        assert!(modal.is_closed());
    }

    #[test]
    fn blank_submission_is_rejected_and_form_stays_open() {
        let mut modal = Modal::default();
        modal.open_create().expect("create");
        modal.set_title("Only a title").expect("title");

        let err = modal.plan_submit().expect_err("blank body");
        assert!(matches!(err, SubmitError::Invalid(_)));
        assert!(!modal.is_closed());
    }

    #[test]
    fn submission_lifecycle_closes_on_success_only() {
        let mut seq = RequestSeq::default();
        let mut modal = Modal::default();
        modal.open_edit(post(9)).expect("edit");
        modal.set_body("new body").expect("body");

        let plan = modal.plan_submit().expect("plan");
        assert!(matches!(plan, SubmitPlan::Update { id: 9, .. }));

        let first = seq.next_token();
        modal.mark_submitting(first).expect("mark");
        assert_eq!(
            modal.plan_submit(),
            Err(SubmitError::Modal(ModalError::Submitting))
        );

        modal.fail_submit(first);
        assert!(!modal.is_closed());

        let second = seq.next_token();
        modal.mark_submitting(second).expect("mark again");
        assert!(!modal.finish_submit(first));
        assert!(modal.finish_submit(second));
        assert!(modal.is_closed());
    }

    #[test]
    fn form_input_needs_an_open_form() {
        let mut modal = Modal::default();
        assert_eq!(modal.set_title("x"), Err(ModalError::NotEditing));
    }
}
