//! HTTP transport for the Hammergen REST API

use super::error::{ApiError, ApiResult};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use url::Url;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

const USER_AGENT: &str = concat!("hammergen-client/", env!("CARGO_PKG_VERSION"));

/// Sanitize response body for logging
/// Truncates long responses and strips control characters
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let mut end = MAX_LOG_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... [truncated, {} bytes total]", &body[..end], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// Path-addressed request primitives the resource clients are built on.
///
/// `get` is a read, `post` a non-idempotent write, `put` an idempotent write
/// and `delete` a removal. Implementations decide how those map onto the wire.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, path: &str) -> ApiResult<Value>;

    async fn post(&self, path: &str, body: &Value) -> ApiResult<Value>;

    async fn put(&self, path: &str, body: &Value) -> ApiResult<Value>;

    async fn delete(&self, path: &str) -> ApiResult<()>;
}

/// reqwest-backed transport bound to one API server
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl HttpTransport {
    /// Create a transport for the server at `base_url`
    pub fn new(base_url: &str, token: Option<String>) -> ApiResult<Self> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        let base_url = Url::parse(base_url)?;

        Ok(Self {
            client,
            base_url,
            token,
        })
    }

    /// Resolve an API path (e.g. `/api/mutation/42`) against the base URL,
    /// keeping any path prefix the base URL carries
    pub fn url_for(&self, path: &str) -> ApiResult<Url> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Ok(Url::parse(&format!("{}/{}", base, path))?)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Send the request and return the raw body of a successful response
    async fn send(&self, request: RequestBuilder) -> ApiResult<String> {
        let response = self.authorize(request).send().await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            // Security: Only log sanitized/truncated error body to avoid leaking sensitive data
            tracing::error!("API error: {} - {}", status, sanitize_for_log(&body));
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }

    async fn execute(&self, request: RequestBuilder) -> ApiResult<Value> {
        let body = self.send(request).await?;

        // Handle empty response
        if body.is_empty() {
            return Ok(Value::Null);
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, path: &str) -> ApiResult<Value> {
        let url = self.url_for(path)?;
        tracing::debug!("GET {}", url);
        self.execute(self.client.get(url)).await
    }

    async fn post(&self, path: &str, body: &Value) -> ApiResult<Value> {
        let url = self.url_for(path)?;
        tracing::debug!("POST {}", url);
        self.execute(self.client.post(url).json(body)).await
    }

    async fn put(&self, path: &str, body: &Value) -> ApiResult<Value> {
        let url = self.url_for(path)?;
        tracing::debug!("PUT {}", url);
        self.execute(self.client.put(url).json(body)).await
    }

    async fn delete(&self, path: &str) -> ApiResult<()> {
        let url = self.url_for(path)?;
        tracing::debug!("DELETE {}", url);
        // Success body is ignored; servers answer deletes with anything from 204 to plain text
        self.send(self.client.delete(url)).await.map(|_| ())
    }
}
