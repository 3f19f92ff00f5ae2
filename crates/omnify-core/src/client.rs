//! HTTP gateway to the Omnify API.
//!
//! A thin reqwest wrapper over the remote endpoints. Authorization is never
//! stored on the client: authorized methods take the bearer credential
//! explicitly per call, so no default header leaks across requests.

use anyhow::{Context, Result};
use serde_json::json;

use omnify_types::{RemotePage, RemotePost, TokenResponse};

use crate::config::Config;
use crate::error::{ApiError, ApiResult};

/// A bearer credential issued by the server at login/signup.
///
/// Opaque; the client never parses it. Display and logs only ever see the
/// masked form.
#[derive(Debug, Clone)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Credential(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns a masked version of the token for display (first 12 chars + ...).
    pub fn masked(&self) -> String {
        if self.0.len() <= 16 {
            return "***".to_string();
        }
        format!("{}...", &self.0[..12])
    }
}

/// Omnify API client.
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    /// Creates a client from configuration.
    ///
    /// # Errors
    /// Returns an error if the configured base URL is not a valid URL.
    pub fn new(config: &Config) -> Result<Self> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        url::Url::parse(&base_url)
            .with_context(|| format!("Invalid Omnify API base URL: {base_url}"))?;

        Ok(Self {
            base_url,
            http: reqwest::Client::new(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `POST /auth/login`
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<TokenResponse> {
        let url = format!("{}/auth/login", self.base_url);
        tracing::debug!(%url, "login request");

        let response = self
            .http
            .post(&url)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        parse_json(response, "Login failed").await
    }

    /// `POST /auth/signup`
    pub async fn signup(&self, name: &str, email: &str, password: &str) -> ApiResult<TokenResponse> {
        let url = format!("{}/auth/signup", self.base_url);
        tracing::debug!(%url, "signup request");

        let response = self
            .http
            .post(&url)
            .json(&json!({ "name": name, "email": email, "password": password }))
            .send()
            .await?;

        parse_json(response, "Signup failed").await
    }

    /// `GET /blogs?page={index}&size={size}`
    pub async fn fetch_page(&self, index: u32, size: u32) -> ApiResult<RemotePage> {
        let url = format!("{}/blogs", self.base_url);
        tracing::debug!(%url, index, size, "fetch page");

        let response = self
            .http
            .get(&url)
            .query(&[("page", index), ("size", size)])
            .send()
            .await?;

        parse_json(response, "Failed to load blogs. Try again.").await
    }

    /// `GET /blogs/{id}`
    pub async fn fetch_post(&self, id: &str) -> ApiResult<RemotePost> {
        let url = format!("{}/blogs/{id}", self.base_url);
        tracing::debug!(%url, "fetch post");

        let response = self.http.get(&url).send().await?;

        parse_json(response, "Failed to load blog. Try again.").await
    }

    /// `POST /blogs` (auth required)
    pub async fn create_post(
        &self,
        cred: &Credential,
        title: &str,
        content: &str,
    ) -> ApiResult<RemotePost> {
        let url = format!("{}/blogs", self.base_url);
        tracing::debug!(%url, token = %cred.masked(), "create post");

        let response = self
            .http
            .post(&url)
            .bearer_auth(cred.as_str())
            .json(&json!({ "title": title, "content": content }))
            .send()
            .await?;

        parse_json(response, "Failed to create blog. Try again.").await
    }

    /// `PATCH /blogs/{id}` (auth required)
    pub async fn update_post(
        &self,
        cred: &Credential,
        id: &str,
        title: &str,
        content: &str,
    ) -> ApiResult<RemotePost> {
        let url = format!("{}/blogs/{id}", self.base_url);
        tracing::debug!(%url, token = %cred.masked(), "update post");

        let response = self
            .http
            .patch(&url)
            .bearer_auth(cred.as_str())
            .json(&json!({ "title": title, "content": content }))
            .send()
            .await?;

        parse_json(response, "Failed to update blog. Try again.").await
    }

    /// `DELETE /blogs/{id}` (auth required). Any 2xx counts as success; the
    /// body is ignored.
    pub async fn delete_post(&self, cred: &Credential, id: &str) -> ApiResult<()> {
        let url = format!("{}/blogs/{id}", self.base_url);
        tracing::debug!(%url, token = %cred.masked(), "delete post");

        let response = self
            .http
            .delete(&url)
            .bearer_auth(cred.as_str())
            .send()
            .await?;

        check_status(response, "Failed to delete blog. Try again.")
            .await
            .map(|_| ())
    }
}

/// Checks the status and deserializes a 2xx body.
async fn parse_json<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
    fallback: &str,
) -> ApiResult<T> {
    let response = check_status(response, fallback).await?;
    Ok(response.json::<T>().await?)
}

/// Maps a non-2xx reply into the error taxonomy, preferring the server's
/// `{"message": ...}` body over the per-operation fallback.
async fn check_status(response: reqwest::Response, fallback: &str) -> ApiResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = server_message(&body).unwrap_or_else(|| fallback.to_string());
    tracing::warn!(status = status.as_u16(), %message, "request failed");

    if status == reqwest::StatusCode::UNAUTHORIZED {
        return Err(ApiError::Auth(message));
    }
    Err(ApiError::Remote {
        status: status.as_u16(),
        message,
    })
}

/// Extracts `message` from an error body, if it is JSON and carries one.
fn server_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .and_then(|m| m.as_str())
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test: server message extraction from error bodies.
    #[test]
    fn test_server_message() {
        assert_eq!(
            server_message(r#"{"message":"Email already exists"}"#),
            Some("Email already exists".to_string())
        );
        assert_eq!(server_message(r#"{"error":"nope"}"#), None);
        assert_eq!(server_message("not json"), None);
        assert_eq!(server_message(r#"{"message":""}"#), None);
    }

    /// Test: credential masking never reveals short tokens.
    #[test]
    fn test_credential_masked() {
        assert_eq!(Credential::new("short").masked(), "***");
        assert_eq!(
            Credential::new("eyJhbGciOiJIUzI1NiJ9.payload.sig").masked(),
            "eyJhbGciOiJI..."
        );
    }

    /// Test: an invalid base URL is rejected at construction.
    #[test]
    fn test_invalid_base_url() {
        let config = Config {
            base_url: "not a url".to_string(),
        };
        assert!(ApiClient::new(&config).is_err());
    }
}
