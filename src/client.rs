use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{ConsoleError, Result};
use crate::responses::{ApiErrorBody, LoginRequest, LoginResponse, UpdatedUser};
use crate::types::{UserUpdate, UsersPage};

/// Operations the console needs from the remote user API.
#[async_trait]
pub trait UserApi {
    /// Exchange credentials for a bearer token.
    async fn login(&self, email: &str, password: &str) -> Result<String>;

    /// Fetch one upstream page (1-based).
    async fn list_users(&self, token: &str, page: u32) -> Result<UsersPage>;

    async fn update_user(&self, id: u64, update: &UserUpdate) -> Result<UpdatedUser>;

    async fn delete_user(&self, id: u64) -> Result<()>;
}

pub struct ApiClient {
    http: Client,
    base_url: Url,
    api_key: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str, api_key: Option<String>) -> Result<Self> {
        Ok(Self {
            http: Client::new(),
            base_url: parse_base_url(base_url)?,
            api_key,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| ConsoleError::InvalidBaseUrl {
                url: format!("{}{path}", self.base_url),
                source: e,
            })
    }

    fn with_api_key(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.header("x-api-key", key),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = self.with_api_key(request).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<failed to read response body>".to_string());
            return Err(ConsoleError::ApiError {
                status,
                message: error_message(&body),
            });
        }

        Ok(response)
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        Ok(self.send(request).await?.json().await?)
    }
}

#[async_trait]
impl UserApi for ApiClient {
    async fn login(&self, email: &str, password: &str) -> Result<String> {
        let url = self.endpoint("login")?;
        tracing::debug!(%url, "logging in");

        let body = LoginRequest { email, password };
        let response: LoginResponse = self.send_json(self.http.post(url).json(&body)).await?;
        Ok(response.token)
    }

    async fn list_users(&self, token: &str, page: u32) -> Result<UsersPage> {
        let url = self.endpoint("users")?;
        tracing::debug!(%url, page, "fetching users");

        let request = self
            .http
            .get(url)
            .query(&[("page", page)])
            .bearer_auth(token);
        self.send_json(request).await
    }

    async fn update_user(&self, id: u64, update: &UserUpdate) -> Result<UpdatedUser> {
        let url = self.endpoint(&format!("users/{id}"))?;
        tracing::debug!(%url, "updating user");

        self.send_json(self.http.put(url).json(update)).await
    }

    async fn delete_user(&self, id: u64) -> Result<()> {
        let url = self.endpoint(&format!("users/{id}"))?;
        tracing::debug!(%url, "deleting user");

        self.send(self.http.delete(url)).await?;
        Ok(())
    }
}

/// Parse the configured base URL so relative endpoints join under it.
fn parse_base_url(raw: &str) -> Result<Url> {
    let mut normalized = raw.trim().to_string();
    if !normalized.ends_with('/') {
        normalized.push('/');
    }

    Url::parse(&normalized).map_err(|e| ConsoleError::InvalidBaseUrl {
        url: raw.to_string(),
        source: e,
    })
}

/// Prefer the API's `{"error": ...}` message over the raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<ApiErrorBody>(body)
        .map(|b| b.error)
        .unwrap_or_else(|_| body.to_string())
}
