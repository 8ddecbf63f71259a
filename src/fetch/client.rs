use std::fmt::Debug;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use log::debug;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::request::join_url;
use super::FetchResult;
use crate::error::{AppError, Context};

/// HTTP client for the construction-management backend.
///
/// Clones share the bearer token, so a login performed through one handle is
/// visible to every repository built from the same client.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Arc<RwLock<Option<String>>>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> FetchResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to construct HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            token: Arc::new(RwLock::new(None)),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn set_token(&self, token: Option<String>) {
        match self.token.write() {
            Ok(mut guard) => *guard = token,
            Err(poisoned) => *poisoned.into_inner() = token,
        }
    }

    pub fn token(&self) -> Option<String> {
        match self.token.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn has_token(&self) -> bool {
        self.token().is_some()
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> FetchResult<Option<T>> {
        let builder = self.client.get(self.url(path)).query(query);
        self.read_json(builder).await
    }

    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> FetchResult<T> {
        let builder = self.client.post(self.url(path)).json(body);
        self.read_json(builder)
            .await?
            .ok_or_else(|| AppError::message(format!("Endpoint {path} not found")))
    }

    pub async fn put_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> FetchResult<Option<T>> {
        let builder = self.client.put(self.url(path)).json(body);
        self.read_json(builder).await
    }

    /// Returns `false` when the record did not exist.
    pub async fn delete(&self, path: &str) -> FetchResult<bool> {
        let builder = self.client.delete(self.url(path));
        Ok(self.execute(builder).await?.is_some())
    }

    pub async fn post_empty(&self, path: &str) -> FetchResult<()> {
        let builder = self.client.post(self.url(path));
        self.execute(builder).await?;
        Ok(())
    }

    fn url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    async fn read_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> FetchResult<Option<T>> {
        match self.execute(builder).await? {
            Some(response) => Ok(Some(response.json::<T>().await?)),
            None => Ok(None),
        }
    }

    /// Send a request with the bearer token attached. `None` means 404.
    async fn execute(&self, builder: RequestBuilder) -> FetchResult<Option<Response>> {
        let builder = match self.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        };

        let response = builder.send().await?;
        let status = response.status();
        debug!("{} {}", status.as_u16(), response.url());

        match status {
            StatusCode::NOT_FOUND => Ok(None),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(AppError::Unauthorized),
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                let body = response.text().await.unwrap_or_default();
                Err(AppError::validation(if body.is_empty() {
                    format!("request rejected with status {status}")
                } else {
                    body
                }))
            }
            _ => Ok(Some(response.error_for_status()?)),
        }
    }
}

impl Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("authenticated", &self.has_token())
            .finish()
    }
}
