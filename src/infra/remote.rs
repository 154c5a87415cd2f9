//! reqwest-backed [`PostsRemote`] for dummyjson-style post APIs.

use std::time::Duration;

use async_trait::async_trait;
use metrics::counter;
use reqwest::{Client, Method, Response, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::application::remote::{ListQuery, PostsRemote, RemoteError};
use crate::domain::posts::{NewPost, Post, PostPage, PostPatch};

#[derive(Clone, Debug)]
pub struct HttpPostsRemote {
    client: Client,
    base: Url,
}

impl HttpPostsRemote {
    pub fn new(base: &Url, timeout: Duration) -> Result<Self, RemoteError> {
        let mut base = base.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let client = Client::builder()
            .user_agent(Self::user_agent())
            .timeout(timeout)
            .build()
            .map_err(RemoteError::transport)?;
        Ok(Self { client, base })
    }

    pub fn user_agent() -> &'static str {
        concat!("postboard/", env!("CARGO_PKG_VERSION"))
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    fn url(&self, path: &str, query: &[(&str, String)]) -> Result<Url, RemoteError> {
        let mut url = self
            .base
            .join(path)
            .map_err(|err| RemoteError::Url(err.to_string()))?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    async fn request<T: DeserializeOwned>(
        &self,
        kind: &'static str,
        method: Method,
        url: Url,
        body: Option<serde_json::Value>,
    ) -> Result<T, RemoteError> {
        let resp = self.send(kind, method, url, body).await?;
        let result = Self::handle(resp).await;
        record(kind, result.is_ok());
        result
    }

    async fn request_unit(
        &self,
        kind: &'static str,
        method: Method,
        url: Url,
    ) -> Result<(), RemoteError> {
        let resp = self.send(kind, method, url, None).await?;
        let status = resp.status();
        let result = if status.is_success() {
            Ok(())
        } else {
            let text = resp.text().await.unwrap_or_default();
            Err(RemoteError::Status {
                status: status.as_u16(),
                body: text,
            })
        };
        record(kind, result.is_ok());
        result
    }

    async fn send(
        &self,
        kind: &'static str,
        method: Method,
        url: Url,
        body: Option<serde_json::Value>,
    ) -> Result<Response, RemoteError> {
        debug!(kind, %method, %url, "sending request");
        let mut req = self.client.request(method, url);
        if let Some(b) = body {
            req = req.json(&b);
        }
        req.send().await.map_err(|err| {
            record(kind, false);
            RemoteError::transport(err)
        })
    }

    async fn handle<T: DeserializeOwned>(resp: Response) -> Result<T, RemoteError> {
        let status = resp.status();
        let bytes = resp.bytes().await.map_err(RemoteError::transport)?;
        if !status.is_success() {
            let text = String::from_utf8_lossy(&bytes).into_owned();
            return Err(RemoteError::Status {
                status: status.as_u16(),
                body: text,
            });
        }
        serde_json::from_slice(&bytes).map_err(RemoteError::decode)
    }
}

fn record(kind: &'static str, ok: bool) {
    let outcome = if ok { "ok" } else { "error" };
    counter!("postboard_remote_requests_total", "kind" => kind, "outcome" => outcome)
        .increment(1);
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<serde_json::Value, RemoteError> {
    serde_json::to_value(value).map_err(RemoteError::decode)
}

#[async_trait]
impl PostsRemote for HttpPostsRemote {
    async fn list(&self, query: ListQuery) -> Result<PostPage, RemoteError> {
        let url = self.url(
            "posts",
            &[
                ("limit", query.page_size.to_string()),
                ("skip", query.skip().to_string()),
                ("sortBy", "id".to_string()),
                ("order", query.order.as_str().to_string()),
            ],
        )?;
        self.request("list", Method::GET, url, None).await
    }

    async fn search(&self, keyword: &str) -> Result<Vec<Post>, RemoteError> {
        let url = self.url("posts/search", &[("q", keyword.to_string())])?;
        let page: PostPage = self.request("search", Method::GET, url, None).await?;
        Ok(page.posts)
    }

    async fn get_by_id(&self, id: u64) -> Result<Post, RemoteError> {
        let url = self.url(&format!("posts/{id}"), &[])?;
        self.request("get", Method::GET, url, None).await
    }

    async fn create(&self, post: &NewPost) -> Result<Post, RemoteError> {
        let url = self.url("posts/add", &[])?;
        self.request("create", Method::POST, url, Some(to_json(post)?))
            .await
    }

    async fn update(&self, id: u64, patch: &PostPatch) -> Result<Post, RemoteError> {
        let url = self.url(&format!("posts/{id}"), &[])?;
        self.request("update", Method::PUT, url, Some(to_json(patch)?))
            .await
    }

    async fn delete(&self, id: u64) -> Result<(), RemoteError> {
        let url = self.url(&format!("posts/{id}"), &[])?;
        self.request_unit("delete", Method::DELETE, url).await
    }
}
