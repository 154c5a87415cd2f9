use std::collections::HashMap;
use std::num::NonZeroU32;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use postboard::application::board::{Board, BoardConfig, CompletionOutcome};
use postboard::application::intent::{Confirmation, Intent};
use postboard::application::modal::ModalState;
use postboard::application::pagination::{PageGeometry, PaginationState};
use postboard::application::remote::{ListQuery, PostsRemote, RemoteError};
use postboard::application::runtime::{Runtime, Wake};
use postboard::application::search::ListingMode;
use postboard::domain::posts::{NewPost, Post, PostPage, PostPatch, Reactions};
use postboard::domain::types::SortOrder;

/// In-memory post store whose responses take a configurable time.
#[derive(Default)]
struct SlowRemote {
    posts: Mutex<Vec<Post>>,
    page_delays: HashMap<u64, Duration>,
    search_delays: HashMap<String, Duration>,
    searches: Mutex<Vec<String>>,
    fail_writes: bool,
}

impl SlowRemote {
    fn with_posts(count: u64) -> Self {
        Self {
            posts: Mutex::new((1..=count).map(post).collect()),
            ..Self::default()
        }
    }

    fn page_delay(mut self, page: u64, millis: u64) -> Self {
        self.page_delays.insert(page, Duration::from_millis(millis));
        self
    }

    fn search_delay(mut self, keyword: &str, millis: u64) -> Self {
        self.search_delays
            .insert(keyword.to_string(), Duration::from_millis(millis));
        self
    }

    fn searches(&self) -> Vec<String> {
        self.searches.lock().expect("lock").clone()
    }
}

fn post(id: u64) -> Post {
    Post {
        id,
        title: format!("Post {id} about {}", if id % 2 == 0 { "rust" } else { "go" }),
        body: format!("Body {id}"),
        user_id: 1,
        views: 0,
        reactions: Reactions::default(),
        tags: Vec::new(),
    }
}

#[async_trait]
impl PostsRemote for SlowRemote {
    async fn list(&self, query: ListQuery) -> Result<PostPage, RemoteError> {
        let delay = self
            .page_delays
            .get(&query.page)
            .copied()
            .unwrap_or(Duration::from_millis(20));
        tokio::time::sleep(delay).await;

        let mut posts = self.posts.lock().expect("lock").clone();
        if query.order == SortOrder::Desc {
            posts.reverse();
        }
        let total = posts.len() as u64;
        let page = posts
            .into_iter()
            .skip(query.skip() as usize)
            .take(query.page_size as usize)
            .collect();
        Ok(PostPage {
            posts: page,
            total,
            skip: query.skip(),
            limit: query.page_size,
        })
    }

    async fn search(&self, keyword: &str) -> Result<Vec<Post>, RemoteError> {
        self.searches.lock().expect("lock").push(keyword.to_string());
        let delay = self
            .search_delays
            .get(keyword)
            .copied()
            .unwrap_or(Duration::from_millis(20));
        tokio::time::sleep(delay).await;

        Ok(self
            .posts
            .lock()
            .expect("lock")
            .iter()
            .filter(|post| post.title.contains(keyword))
            .cloned()
            .collect())
    }

    async fn get_by_id(&self, id: u64) -> Result<Post, RemoteError> {
        tokio::time::sleep(Duration::from_millis(20)).await;
        self.posts
            .lock()
            .expect("lock")
            .iter()
            .find(|post| post.id == id)
            .cloned()
            .ok_or(RemoteError::Status {
                status: 404,
                body: format!("Post with id '{id}' not found"),
            })
    }

    async fn create(&self, new_post: &NewPost) -> Result<Post, RemoteError> {
        tokio::time::sleep(Duration::from_millis(20)).await;
        if self.fail_writes {
            return Err(RemoteError::Transport("connection reset".to_string()));
        }
        let posts = self.posts.lock().expect("lock");
        Ok(Post {
            id: posts.len() as u64 + 1,
            title: new_post.title.clone(),
            body: new_post.body.clone(),
            user_id: new_post.user_id,
            views: 0,
            reactions: Reactions::default(),
            tags: Vec::new(),
        })
    }

    async fn update(&self, id: u64, patch: &PostPatch) -> Result<Post, RemoteError> {
        tokio::time::sleep(Duration::from_millis(20)).await;
        let mut updated = post(id);
        updated.title = patch.title.clone();
        updated.body = patch.body.clone();
        Ok(updated)
    }

    async fn delete(&self, _id: u64) -> Result<(), RemoteError> {
        tokio::time::sleep(Duration::from_millis(20)).await;
        Ok(())
    }
}

fn runtime(remote: SlowRemote) -> (Runtime, Arc<SlowRemote>) {
    let remote = Arc::new(remote);
    let config = BoardConfig {
        geometry: PageGeometry::new(
            NonZeroU32::new(10).expect("page size"),
            NonZeroU32::new(10).expect("group size"),
        ),
        user_id: 42,
        debounce: Duration::from_millis(500),
        initial_order: SortOrder::Asc,
    };
    let runtime = Runtime::new(Board::new(config), remote.clone());
    (runtime, remote)
}

fn ids(runtime: &Runtime) -> Vec<u64> {
    runtime.board().posts().iter().map(|post| post.id).collect()
}

async fn loaded(remote: SlowRemote) -> (Runtime, Arc<SlowRemote>) {
    let (mut runtime, remote) = runtime(remote);
    runtime.dispatch(Intent::GoToPage(1)).expect("load");
    runtime.settle().await;
    (runtime, remote)
}

#[tokio::test(start_paused = true)]
async fn slow_first_page_does_not_overwrite_second() {
    let (mut runtime, _) = runtime(
        SlowRemote::with_posts(25)
            .page_delay(1, 300)
            .page_delay(2, 50),
    );

    runtime.dispatch(Intent::GoToPage(1)).expect("page 1");
    runtime.dispatch(Intent::GoToPage(2)).expect("page 2");
    let wakes = runtime.settle().await;

    assert_eq!(ids(&runtime), (11..=20).collect::<Vec<_>>());
    assert_eq!(
        runtime.board().pagination().map(PaginationState::current_page),
        Some(2)
    );
    assert_eq!(
        wakes,
        vec![
            Wake::Completed(CompletionOutcome::Applied),
            Wake::Completed(CompletionOutcome::Discarded),
        ]
    );
    assert!(!runtime.board().is_busy());
}

#[tokio::test(start_paused = true)]
async fn typing_burst_issues_one_search() {
    let (mut runtime, remote) = loaded(SlowRemote::with_posts(25)).await;

    for (step, text) in ["r", "ru", "rus", "rust"].into_iter().enumerate() {
        if step > 0 {
            tokio::time::advance(Duration::from_millis(100)).await;
        }
        runtime
            .dispatch(Intent::QueryChanged(text.to_string()))
            .expect("keystroke");
    }
    runtime.settle().await;

    assert_eq!(remote.searches(), vec!["rust".to_string()]);
    assert_eq!(
        runtime.board().mode(),
        &ListingMode::Search {
            keyword: "rust".to_string()
        }
    );
    assert!(runtime.board().pagination().is_some());
    assert!(runtime.board().snapshot().pagination.is_none());
    assert!(ids(&runtime).iter().all(|id| id % 2 == 0));
}

#[tokio::test(start_paused = true)]
async fn page_jump_supersedes_slow_search() {
    let (mut runtime, _) =
        loaded(SlowRemote::with_posts(25).search_delay("rust", 400)).await;

    runtime
        .dispatch(Intent::QueryChanged("rust".to_string()))
        .expect("query");
    assert_eq!(runtime.step().await, Wake::QueryFired);
    runtime.dispatch(Intent::GoToPage(3)).expect("page 3");
    runtime.settle().await;

    assert_eq!(runtime.board().mode(), &ListingMode::Paged);
    assert_eq!(ids(&runtime), (21..=25).collect::<Vec<_>>());
}

#[tokio::test(start_paused = true)]
async fn clearing_the_query_returns_to_first_page() {
    let (mut runtime, remote) = loaded(SlowRemote::with_posts(25)).await;
    runtime.dispatch(Intent::GoToPage(2)).expect("page 2");
    runtime.settle().await;

    runtime
        .dispatch(Intent::QueryChanged("go".to_string()))
        .expect("query");
    runtime.settle().await;
    assert!(runtime.board().mode().is_search());

    runtime
        .dispatch(Intent::QueryChanged("   ".to_string()))
        .expect("clear");
    runtime.settle().await;

    assert_eq!(remote.searches(), vec!["go".to_string()]);
    assert_eq!(runtime.board().mode(), &ListingMode::Paged);
    assert_eq!(ids(&runtime), (1..=10).collect::<Vec<_>>());
}

#[tokio::test(start_paused = true)]
async fn created_post_is_prepended_and_sort_flips_to_newest() {
    let (mut runtime, _) = loaded(SlowRemote::with_posts(25)).await;

    runtime.dispatch(Intent::OpenCreate).expect("open");
    runtime
        .dispatch(Intent::EditTitle("  Fresh  ".to_string()))
        .expect("title");
    runtime
        .dispatch(Intent::EditBody("Brand new".to_string()))
        .expect("body");
    runtime.dispatch(Intent::SubmitForm).expect("submit");
    assert!(runtime.board().is_busy());
    runtime.settle().await;

    let first = &runtime.board().posts()[0];
    assert_eq!(first.id, 26);
    assert_eq!(first.title, "Fresh");
    assert_eq!(first.user_id, 42);
    assert_eq!(runtime.board().posts().len(), 11);
    assert_eq!(runtime.board().order(), SortOrder::Desc);
    assert_eq!(runtime.board().modal(), &ModalState::Closed);
}

#[tokio::test(start_paused = true)]
async fn failed_create_keeps_the_form_open() {
    let remote = SlowRemote {
        fail_writes: true,
        ..SlowRemote::with_posts(5)
    };
    let (mut runtime, _) = loaded(remote).await;

    runtime.dispatch(Intent::OpenCreate).expect("open");
    runtime
        .dispatch(Intent::EditTitle("Title".to_string()))
        .expect("title");
    runtime
        .dispatch(Intent::EditBody("Body".to_string()))
        .expect("body");
    runtime.dispatch(Intent::SubmitForm).expect("submit");
    let wakes = runtime.settle().await;

    assert_eq!(wakes, vec![Wake::Completed(CompletionOutcome::Failed)]);
    match runtime.board().modal() {
        ModalState::Create(form) => {
            assert!(!form.is_submitting());
            assert_eq!(form.draft().title, "Title");
        }
        other => panic!("form should stay open, got {other:?}"),
    }
    assert_eq!(ids(&runtime), (1..=5).collect::<Vec<_>>());
    assert!(
        runtime
            .board()
            .notice()
            .is_some_and(|notice| notice.contains("connection reset"))
    );
}

#[tokio::test(start_paused = true)]
async fn edit_replaces_post_in_place() {
    let (mut runtime, _) = loaded(SlowRemote::with_posts(10)).await;

    runtime.dispatch(Intent::OpenEdit(4)).expect("open");
    runtime
        .dispatch(Intent::EditTitle("Renamed".to_string()))
        .expect("title");
    runtime.dispatch(Intent::SubmitForm).expect("submit");
    runtime.settle().await;

    let posts = runtime.board().posts();
    assert_eq!(posts.len(), 10);
    assert_eq!(posts[3].id, 4);
    assert_eq!(posts[3].title, "Renamed");
    assert_eq!(runtime.board().modal(), &ModalState::Closed);
}

#[tokio::test(start_paused = true)]
async fn delete_waits_for_confirmation() {
    let (mut runtime, _) = loaded(SlowRemote::with_posts(10)).await;

    let asked = runtime.dispatch(Intent::Delete(3)).expect("delete");
    assert_eq!(asked, vec![Confirmation::DeletePost(3)]);
    assert!(runtime.board().is_settled());

    runtime
        .dispatch(Intent::Confirm(Confirmation::DeletePost(3)))
        .expect("confirm");
    runtime.settle().await;

    assert_eq!(ids(&runtime), vec![1, 2, 4, 5, 6, 7, 8, 9, 10]);
}

#[tokio::test(start_paused = true)]
async fn declined_delete_keeps_the_post() {
    let (mut runtime, _) = loaded(SlowRemote::with_posts(10)).await;

    runtime.dispatch(Intent::Delete(3)).expect("delete");
    runtime.dispatch(Intent::Decline).expect("decline");

    assert!(runtime.board().is_settled());
    assert_eq!(ids(&runtime), (1..=10).collect::<Vec<_>>());
}

#[tokio::test(start_paused = true)]
async fn details_open_after_fetch() {
    let (mut runtime, _) = loaded(SlowRemote::with_posts(10)).await;

    runtime.dispatch(Intent::ShowDetails(7)).expect("show");
    assert_eq!(runtime.board().modal(), &ModalState::Closed);
    runtime.settle().await;

    match runtime.board().modal() {
        ModalState::Details(post) => assert_eq!(post.id, 7),
        other => panic!("expected details, got {other:?}"),
    }

    runtime.dispatch(Intent::DismissOutside).expect("dismiss");
    assert_eq!(runtime.board().modal(), &ModalState::Closed);
}
