//! The board: single owner of everything the view shows.
//!
//! [`Board::dispatch`] turns intents into effects and [`Board::complete`]
//! folds remote responses back in. Both are synchronous; all suspension
//! happens in the runtime between the two. Listing requests (page fetches and
//! searches) share one recency channel and detail fetches another, so a slow
//! response that lost the race is discarded instead of overwriting newer state.

use std::collections::HashMap;
use std::time::Duration;

use metrics::counter;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::application::cache::PostCache;
use crate::application::error::AppError;
use crate::application::intent::{
    Completion, Confirmation, Effect, Intent, RemoteCall, RemoteResponse, Request,
};
use crate::application::modal::{CloseOutcome, Modal, ModalError, ModalState, SubmitPlan};
use crate::application::pagination::{PageGeometry, PaginationState, Paginator};
use crate::application::recency::{Channel, RequestSeq, RequestToken};
use crate::application::remote::ListQuery;
use crate::application::search::{ListingMode, QueryRoute, SearchController};
use crate::config::Settings;
use crate::domain::posts::Post;
use crate::domain::types::SortOrder;

#[derive(Debug, Clone, Copy)]
pub struct BoardConfig {
    pub geometry: PageGeometry,
    pub user_id: u64,
    pub debounce: Duration,
    pub initial_order: SortOrder,
}

impl From<&Settings> for BoardConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            geometry: PageGeometry::new(settings.board.page_size, settings.board.group_size),
            user_id: settings.board.user_id,
            debounce: settings.search.debounce,
            initial_order: SortOrder::Asc,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PendingCall {
    List(ListQuery),
    Search(String),
    Detail,
    Create,
    Update(u64),
    Delete(u64),
}

impl PendingCall {
    fn kind(&self) -> &'static str {
        match self {
            PendingCall::List(_) => "list",
            PendingCall::Search(_) => "search",
            PendingCall::Detail => "get",
            PendingCall::Create => "create",
            PendingCall::Update(_) => "update",
            PendingCall::Delete(_) => "delete",
        }
    }
}

#[derive(Debug, Clone)]
struct InFlight {
    call: PendingCall,
    busy: bool,
}

/// How a completion was folded into the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionOutcome {
    Applied,
    /// Superseded by a newer request, or no longer applicable.
    Discarded,
    Failed,
    Unknown,
}

/// Read-only view of the board for renderers.
#[derive(Debug, Clone, Copy)]
pub struct BoardSnapshot<'a> {
    pub posts: &'a [Post],
    pub order: SortOrder,
    pub mode: &'a ListingMode,
    /// Absent while search results are shown or before the first page loads.
    pub pagination: Option<&'a PaginationState>,
    pub modal: &'a ModalState,
    pub busy: bool,
    pub query_pending: bool,
    pub notice: Option<&'a str>,
}

#[derive(Debug)]
pub struct Board {
    user_id: u64,
    cache: PostCache,
    paginator: Paginator,
    search: SearchController,
    modal: Modal,
    seq: RequestSeq,
    listing: Channel,
    detail: Channel,
    in_flight: HashMap<RequestToken, InFlight>,
    confirmation: Option<Confirmation>,
    notice: Option<String>,
}

impl Board {
    pub fn new(config: BoardConfig) -> Self {
        Self {
            user_id: config.user_id,
            cache: PostCache::new(),
            paginator: Paginator::new(config.geometry),
            search: SearchController::new(config.initial_order, config.debounce),
            modal: Modal::default(),
            seq: RequestSeq::default(),
            listing: Channel::default(),
            detail: Channel::default(),
            in_flight: HashMap::new(),
            confirmation: None,
            notice: None,
        }
    }

    pub fn posts(&self) -> &[Post] {
        self.cache.posts()
    }

    pub fn order(&self) -> SortOrder {
        self.search.order()
    }

    pub fn mode(&self) -> &ListingMode {
        self.search.mode()
    }

    pub fn modal(&self) -> &ModalState {
        self.modal.state()
    }

    pub fn pagination(&self) -> Option<&PaginationState> {
        self.paginator.state()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn pending_confirmation(&self) -> Option<Confirmation> {
        self.confirmation
    }

    /// Whether the loading indicator is shown.
    pub fn is_busy(&self) -> bool {
        self.in_flight.values().any(|request| request.busy)
    }

    /// No request in flight and no query waiting for its debounce window.
    pub fn is_settled(&self) -> bool {
        self.in_flight.is_empty() && !self.search.is_pending()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.search.deadline()
    }

    pub fn snapshot(&self) -> BoardSnapshot<'_> {
        let mode = self.search.mode();
        BoardSnapshot {
            posts: self.cache.posts(),
            order: self.search.order(),
            mode,
            pagination: if mode.is_search() {
                None
            } else {
                self.paginator.state()
            },
            modal: self.modal.state(),
            busy: self.is_busy(),
            query_pending: self.search.is_pending(),
            notice: self.notice.as_deref(),
        }
    }

    /// Handle one user intent. Errors are also kept as the visible notice.
    pub fn dispatch(&mut self, intent: Intent, now: Instant) -> Result<Vec<Effect>, AppError> {
        debug!(?intent, "dispatching intent");
        self.notice = None;
        if !matches!(intent, Intent::Confirm(_) | Intent::Decline) {
            // An unanswered question does not outlive the next action.
            self.confirmation = None;
        }
        let result = self.handle(intent, now);
        if let Err(err) = &result {
            if err.is_validation() {
                info!(error = %err, "intent rejected");
            } else {
                warn!(error = %err, "intent failed");
            }
            self.notice = Some(err.to_string());
        }
        result
    }

    fn handle(&mut self, intent: Intent, now: Instant) -> Result<Vec<Effect>, AppError> {
        match intent {
            Intent::Refresh => Ok(self.refresh()),
            Intent::GoToPage(page) => Ok(self.go_to_page(page)),
            Intent::PrevGroup => Ok(self.jump_group(self.paginator.prev_group_target())),
            Intent::NextGroup => Ok(self.jump_group(self.paginator.next_group_target())),
            Intent::ChangeOrder(order) => Ok(self.change_order(order)),
            Intent::QueryChanged(raw) => {
                self.search.on_query_change(raw, now);
                Ok(Vec::new())
            }
            Intent::ShowDetails(id) => self.show_details(id),
            Intent::OpenCreate => {
                self.modal.open_create()?;
                Ok(Vec::new())
            }
            Intent::OpenEdit(id) => {
                let post = self.cache.get(id).cloned().ok_or(AppError::UnknownPost(id))?;
                self.modal.open_edit(post)?;
                Ok(Vec::new())
            }
            Intent::EditTitle(title) => {
                self.modal.set_title(title)?;
                Ok(Vec::new())
            }
            Intent::EditBody(body) => {
                self.modal.set_body(body)?;
                Ok(Vec::new())
            }
            Intent::SubmitForm => self.submit_form(),
            Intent::CloseModal => Ok(self.close_modal()),
            Intent::DismissOutside => {
                self.modal.dismiss_outside();
                Ok(Vec::new())
            }
            Intent::Delete(id) => {
                if !self.cache.contains(id) {
                    return Err(AppError::UnknownPost(id));
                }
                Ok(self.ask(Confirmation::DeletePost(id)))
            }
            Intent::Confirm(confirmation) => Ok(self.confirm(confirmation)),
            Intent::Decline => {
                self.confirmation = None;
                Ok(Vec::new())
            }
        }
    }

    /// Fire the debounced query if its window has elapsed.
    pub fn poll(&mut self, now: Instant) -> Vec<Effect> {
        match self.search.fire_due(now) {
            Some(QueryRoute::Browse) => {
                debug!("query cleared, back to first page");
                self.go_to_page(1)
            }
            Some(QueryRoute::Search(keyword)) => self.issue_search(keyword),
            None => Vec::new(),
        }
    }

    fn refresh(&mut self) -> Vec<Effect> {
        match self.search.mode() {
            ListingMode::Search { keyword } => {
                let keyword = keyword.clone();
                self.issue_search(keyword)
            }
            ListingMode::Paged => self.go_to_page(self.paginator.current_page()),
        }
    }

    fn go_to_page(&mut self, page: u64) -> Vec<Effect> {
        self.search.cancel_pending();
        let query = self.paginator.request(page, self.search.order());
        let token = self.listing.issue(&mut self.seq);
        self.request(token, PendingCall::List(query), true, RemoteCall::List(query))
    }

    fn change_order(&mut self, order: SortOrder) -> Vec<Effect> {
        self.search.set_order(order);
        self.go_to_page(1)
    }

    fn jump_group(&mut self, target: Option<u64>) -> Vec<Effect> {
        if self.search.mode().is_search() {
            return Vec::new();
        }
        match target {
            Some(page) => self.go_to_page(page),
            None => {
                debug!("group navigation disabled at boundary");
                Vec::new()
            }
        }
    }

    fn issue_search(&mut self, keyword: String) -> Vec<Effect> {
        let token = self.listing.issue(&mut self.seq);
        let call = RemoteCall::Search(keyword.clone());
        self.request(token, PendingCall::Search(keyword), false, call)
    }

    fn show_details(&mut self, id: u64) -> Result<Vec<Effect>, AppError> {
        if !self.modal.is_closed() {
            return Err(ModalError::AlreadyOpen.into());
        }
        let token = self.detail.issue(&mut self.seq);
        Ok(self.request(token, PendingCall::Detail, true, RemoteCall::Get(id)))
    }

    fn submit_form(&mut self) -> Result<Vec<Effect>, AppError> {
        let plan = self.modal.plan_submit()?;
        let token = self.seq.next_token();
        let (pending, call) = match plan {
            SubmitPlan::Create(draft) => (
                PendingCall::Create,
                RemoteCall::Create(draft.into_new_post(self.user_id)),
            ),
            SubmitPlan::Update { id, draft } => (
                PendingCall::Update(id),
                RemoteCall::Update {
                    id,
                    patch: draft.into_patch(),
                },
            ),
        };
        self.modal.mark_submitting(token)?;
        Ok(self.request(token, pending, true, call))
    }

    fn close_modal(&mut self) -> Vec<Effect> {
        match self.modal.request_close() {
            CloseOutcome::NeedsConfirmation => self.ask(Confirmation::DiscardDraft),
            CloseOutcome::Closed | CloseOutcome::Ignored => Vec::new(),
        }
    }

    fn ask(&mut self, confirmation: Confirmation) -> Vec<Effect> {
        self.confirmation = Some(confirmation);
        vec![Effect::Confirm(confirmation)]
    }

    fn confirm(&mut self, confirmation: Confirmation) -> Vec<Effect> {
        if self.confirmation != Some(confirmation) {
            debug!(?confirmation, "ignoring confirmation that was not asked for");
            return Vec::new();
        }
        self.confirmation = None;
        match confirmation {
            Confirmation::DiscardDraft => {
                self.modal.force_close();
                Vec::new()
            }
            Confirmation::DeletePost(id) => {
                let token = self.seq.next_token();
                self.request(token, PendingCall::Delete(id), true, RemoteCall::Delete(id))
            }
        }
    }

    fn request(
        &mut self,
        token: RequestToken,
        call: PendingCall,
        busy: bool,
        remote: RemoteCall,
    ) -> Vec<Effect> {
        debug!(token = token.get(), kind = call.kind(), "issuing request");
        self.in_flight.insert(token, InFlight { call, busy });
        vec![Effect::Request(Request {
            token,
            call: remote,
        })]
    }

    /// Fold a remote response into the board.
    ///
    /// The busy flag of the request is always cleared, whatever the outcome.
    pub fn complete(&mut self, completion: Completion) -> CompletionOutcome {
        let Completion { token, outcome } = completion;
        let Some(InFlight { call, .. }) = self.in_flight.remove(&token) else {
            warn!(token = token.get(), "completion for unknown request");
            return CompletionOutcome::Unknown;
        };
        let kind = call.kind();

        let current = match call {
            PendingCall::List(_) | PendingCall::Search(_) => self.listing.finish_if_current(token),
            PendingCall::Detail => self.detail.finish_if_current(token),
            PendingCall::Create | PendingCall::Update(_) | PendingCall::Delete(_) => true,
        };
        if !current {
            debug!(token = token.get(), kind, "discarding superseded response");
            counter!("postboard_stale_responses_total", "kind" => kind).increment(1);
            return CompletionOutcome::Discarded;
        }

        let response = match outcome {
            Ok(response) => response,
            Err(err) => {
                if matches!(call, PendingCall::Create | PendingCall::Update(_)) {
                    self.modal.fail_submit(token);
                }
                warn!(token = token.get(), kind, error = %err, "remote request failed");
                self.notice = Some(format!("{kind} failed: {err}"));
                return CompletionOutcome::Failed;
            }
        };

        match (call, response) {
            (PendingCall::List(query), RemoteResponse::Page(page)) => {
                self.cache.replace(page.posts);
                let state = self.paginator.apply(query, page.total);
                self.search.enter_paged();
                debug!(
                    page = state.current_page(),
                    total_pages = state.total_pages(),
                    shown = self.cache.len(),
                    "page loaded"
                );
            }
            (PendingCall::Search(keyword), RemoteResponse::SearchResults(posts)) => {
                self.cache.replace(posts);
                debug!(%keyword, shown = self.cache.len(), "search results loaded");
                self.search.enter_search(keyword);
            }
            (PendingCall::Detail, RemoteResponse::Post(post)) => {
                if let Err(err) = self.modal.open_details(post) {
                    debug!(error = %err, "details arrived while another dialog is open");
                    return CompletionOutcome::Discarded;
                }
            }
            (PendingCall::Create, RemoteResponse::Post(post)) => {
                info!(id = post.id, "post created");
                self.cache.insert_front(post);
                if self.search.order() == SortOrder::Asc {
                    self.search.set_order(SortOrder::Desc);
                }
                self.modal.finish_submit(token);
            }
            (PendingCall::Update(id), RemoteResponse::Post(post)) => {
                info!(id, "post updated");
                self.cache.replace_by_id(id, post);
                self.modal.finish_submit(token);
            }
            (PendingCall::Delete(id), _) => {
                info!(id, "post deleted");
                self.cache.remove_by_id(id);
            }
            (call, response) => {
                warn!(?call, ?response, "response does not match request");
                self.notice = Some(format!("{kind} failed: unexpected response"));
                return CompletionOutcome::Failed;
            }
        }
        CompletionOutcome::Applied
    }
}
