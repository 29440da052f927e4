//! HTTP transport
//!
//! Thin JSON-over-HTTP layer. Attaches `Authorization: Bearer <token>` from
//! the session on every request and turns non-2xx answers into
//! [`ClientError::Api`] with the backend's message.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Serialize, de::DeserializeOwned};

use crate::error::extract_message;
use crate::{ClientConfig, ClientError, ClientResult, Session};

/// HTTP transport trait
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get<T: DeserializeOwned + Send>(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> ClientResult<T>;
    async fn post<T: DeserializeOwned + Send, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T>;
    async fn patch<T: DeserializeOwned + Send, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T>;
    async fn delete<T: DeserializeOwned + Send>(&self, path: &str) -> ClientResult<T>;

    /// Session whose token authenticates the calls
    fn session(&self) -> &Session;
}

/// Network HTTP transport backed by reqwest
#[derive(Debug, Clone)]
pub struct NetworkHttpClient {
    client: Client,
    api_root: String,
    session: Session,
}

impl NetworkHttpClient {
    pub fn new(config: &ClientConfig, session: Session) -> ClientResult<Self> {
        let mut builder = Client::builder();
        if let Some(seconds) = config.timeout {
            builder = builder.timeout(std::time::Duration::from_secs(seconds));
        }
        Ok(Self {
            client: builder.build()?,
            api_root: config.api_root(),
            session,
        })
    }

    /// Base URL including the API prefix
    pub fn api_root(&self) -> &str {
        &self.api_root
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_root, path.trim_start_matches('/'))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.session.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> ClientResult<T> {
        let response = self.authorize(request).send().await?;
        Self::handle_response(response).await
    }

    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = extract_message(&text);
            tracing::debug!(status = status.as_u16(), %message, "request rejected");
            return match status {
                StatusCode::UNAUTHORIZED => Err(ClientError::Unauthorized(message)),
                _ => Err(ClientError::Api {
                    status: status.as_u16(),
                    message,
                }),
            };
        }

        // Empty bodies (204, bare 200) decode as JSON null so `()` and Option work
        let body = if text.trim().is_empty() { "null" } else { text.as_str() };
        serde_json::from_str(body).map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl HttpClient for NetworkHttpClient {
    async fn get<T: DeserializeOwned + Send>(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> ClientResult<T> {
        tracing::debug!(%path, "GET");
        let req = self.client.get(self.url(path)).query(query);
        self.send(req).await
    }

    async fn post<T: DeserializeOwned + Send, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        tracing::debug!(%path, "POST");
        let req = self.client.post(self.url(path)).json(body);
        self.send(req).await
    }

    async fn patch<T: DeserializeOwned + Send, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        tracing::debug!(%path, "PATCH");
        let req = self.client.patch(self.url(path)).json(body);
        self.send(req).await
    }

    async fn delete<T: DeserializeOwned + Send>(&self, path: &str) -> ClientResult<T> {
        tracing::debug!(%path, "DELETE");
        let req = self.client.delete(self.url(path));
        self.send(req).await
    }

    fn session(&self) -> &Session {
        &self.session
    }
}
