use std::time::Duration;

use httpmock::MockServer;
use postboard::application::remote::{ListQuery, PostsRemote, RemoteError};
use postboard::domain::posts::{NewPost, PostPatch};
use postboard::domain::types::SortOrder;
use postboard::infra::remote::HttpPostsRemote;
use url::Url;

fn remote(server: &MockServer) -> HttpPostsRemote {
    let base = Url::parse(&server.base_url()).expect("base url");
    HttpPostsRemote::new(&base, Duration::from_secs(5)).expect("remote")
}

const POST_JSON: &str = r#"{"id":3,"title":"His mother had always taught him","body":"Body three","userId":9,"views":305,"reactions":{"likes":192,"dislikes":25},"tags":["history","american"]}"#;

#[tokio::test]
async fn list_sends_window_and_sort_parameters() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("GET")
            .path("/posts")
            .query_param("limit", "10")
            .query_param("skip", "10")
            .query_param("sortBy", "id")
            .query_param("order", "desc");
        then.status(200)
            .header("content-type", "application/json")
            .body(format!(
                r#"{{"posts":[{POST_JSON}],"total":251,"skip":10,"limit":10}}"#
            ));
    });

    let page = remote(&server)
        .list(ListQuery::new(2, 10, SortOrder::Desc))
        .await
        .expect("page");

    mock.assert();
    assert_eq!(page.total, 251);
    assert_eq!(page.posts.len(), 1);
    assert_eq!(page.posts[0].user_id, 9);
    assert_eq!(page.posts[0].reactions.likes, 192);
}

#[tokio::test]
async fn search_sends_keyword() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("GET")
            .path("/posts/search")
            .query_param("q", "love story");
        then.status(200)
            .header("content-type", "application/json")
            .body(format!(
                r#"{{"posts":[{POST_JSON}],"total":1,"skip":0,"limit":1}}"#
            ));
    });

    let posts = remote(&server).search("love story").await.expect("results");

    mock.assert();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].id, 3);
}

#[tokio::test]
async fn get_by_id_fetches_single_post() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("GET").path("/posts/3");
        then.status(200)
            .header("content-type", "application/json")
            .body(POST_JSON);
    });

    let post = remote(&server).get_by_id(3).await.expect("post");

    mock.assert();
    assert_eq!(post.title, "His mother had always taught him");
    assert_eq!(post.tags, vec!["history", "american"]);
}

#[tokio::test]
async fn create_posts_author_and_content() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("POST")
            .path("/posts/add")
            .json_body_includes(r#"{"title":"Hello","body":"World","userId":5}"#);
        then.status(201)
            .header("content-type", "application/json")
            .body(r#"{"id":252,"title":"Hello","body":"World","userId":5}"#);
    });

    let created = remote(&server)
        .create(&NewPost {
            title: "Hello".to_string(),
            body: "World".to_string(),
            user_id: 5,
        })
        .await
        .expect("created");

    mock.assert();
    assert_eq!(created.id, 252);
    assert_eq!(created.views, 0);
    assert!(created.tags.is_empty());
}

#[tokio::test]
async fn update_puts_title_and_body() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("PUT")
            .path("/posts/3")
            .json_body_includes(r#"{"title":"New title","body":"New body"}"#);
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"id":3,"title":"New title","body":"New body","userId":9}"#);
    });

    let updated = remote(&server)
        .update(
            3,
            &PostPatch {
                title: "New title".to_string(),
                body: "New body".to_string(),
            },
        )
        .await
        .expect("updated");

    mock.assert();
    assert_eq!(updated.title, "New title");
}

#[tokio::test]
async fn delete_ignores_response_body() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("DELETE").path("/posts/3");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"id":3,"isDeleted":true}"#);
    });

    remote(&server).delete(3).await.expect("deleted");
    mock.assert();
}

#[tokio::test]
async fn non_success_status_is_reported() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method("GET").path("/posts/999");
        then.status(404).body(r#"{"message":"Post with id '999' not found"}"#);
    });

    let err = remote(&server).get_by_id(999).await.expect_err("missing");

    match err {
        RemoteError::Status { status, body } => {
            assert_eq!(status, 404);
            assert!(body.contains("not found"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn malformed_body_is_a_decode_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method("GET").path("/posts/1");
        then.status(200).body("not json");
    });

    let err = remote(&server).get_by_id(1).await.expect_err("garbage");
    assert!(matches!(err, RemoteError::Decode(_)));
}
