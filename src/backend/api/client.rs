use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::backend::error::{ApiError, ApiResult};

pub type Query<'a> = &'a [(&'a str, String)];

/// JSON over HTTP against one base URL.
///
/// Every call is a fresh request: no retries, no timeout, no caching. Any
/// non-2xx answer fails with the response body as the message.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    http: Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http: Client::new(),
        }
    }

    fn url(&self, path: &str, query: Query<'_>) -> ApiResult<Url> {
        let raw = format!("{}{}", self.base_url, path);
        let mut url = Url::parse(&raw).map_err(|e| ApiError::Url(format!("{}: {}", raw, e)))?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    pub async fn fetch_json<T: DeserializeOwned>(&self, path: &str, query: Query<'_>) -> ApiResult<T> {
        let url = self.url(path, query)?;
        let body = self.execute(self.http.get(url)).await?;
        decode(&body)
    }

    /// POST with a JSON body. Resolves to `None` when the server sends no body.
    pub async fn create_json<B, T>(&self, path: &str, body: &B) -> ApiResult<Option<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path, &[])?;
        let text = self.execute(self.http.post(url).json(body)).await?;
        decode_optional(&text)
    }

    /// PUT with a JSON body. Resolves to `None` when the server sends no body.
    pub async fn replace_json<B, T>(&self, path: &str, body: &B) -> ApiResult<Option<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path, &[])?;
        let text = self.execute(self.http.put(url).json(body)).await?;
        decode_optional(&text)
    }

    /// POST carrying its arguments in the query string only.
    pub async fn post_query<T: DeserializeOwned>(&self, path: &str, query: Query<'_>) -> ApiResult<Option<T>> {
        let url = self.url(path, query)?;
        let text = self.execute(self.http.post(url)).await?;
        decode_optional(&text)
    }

    pub async fn delete_resource(&self, path: &str) -> ApiResult<()> {
        let url = self.url(path, &[])?;
        self.execute(self.http.delete(url)).await?;
        Ok(())
    }

    async fn execute(&self, request: RequestBuilder) -> ApiResult<String> {
        let response = request.send().await.map_err(|e| ApiError::Network(e.to_string()))?;
        let status = response.status();
        debug!("{} {}", status.as_u16(), response.url());
        let body = response.text().await.map_err(|e| ApiError::Network(e.to_string()))?;
        if !status.is_success() {
            return Err(ApiError::Status { status: status.as_u16(), body });
        }
        Ok(body)
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> ApiResult<T> {
    serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
}

fn decode_optional<T: DeserializeOwned>(body: &str) -> ApiResult<Option<T>> {
    if body.trim().is_empty() {
        return Ok(None);
    }
    decode(body).map(Some)
}
