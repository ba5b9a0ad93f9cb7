//! Common utilities for the vSphere API client
//!
//! Provides the authenticated HTTP wrapper shared by all API calls. The
//! backend uses session-token authentication: a login call exchanges
//! credentials for a token that subsequent requests carry in the
//! `vmware-api-session-id` header.

use reqwest::Client;
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::VsphereError;

/// HTTP client wrapper with session authentication
#[derive(Debug)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    session_id: RwLock<Option<String>>,
}

impl HttpClient {
    /// Create a new HTTP client wrapper
    pub fn new(client: Client, base_url: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            session_id: RwLock::new(None),
        }
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a full URL from a path
    pub fn build_url(&self, path: &str) -> String {
        if path.starts_with("http") {
            path.to_string()
        } else {
            format!("{}{}", self.base_url, path)
        }
    }

    /// Build a URL-encoded query string from filter pairs
    pub fn build_query_string(&self, filters: &[(&str, &str)]) -> String {
        filters
            .iter()
            .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Exchange credentials for a session token
    pub async fn login(&self, username: &str, password: &str) -> Result<(), VsphereError> {
        let url = self.build_url("/api/session");
        debug!("POST {} (session login)", url);

        let response = self
            .client
            .post(&url)
            .basic_auth(username, Some(password))
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(VsphereError::Http)?;

        let status = response.status();
        if status == 401 || status == 403 {
            let body = response.text().await.unwrap_or_default();
            return Err(VsphereError::Authentication(format!(
                "session login rejected: {} - {}",
                status, body
            )));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VsphereError::Api(format!(
                "session login failed: {} - {}",
                status, body
            )));
        }

        let token: String = response.json().await.map_err(VsphereError::Http)?;
        *self.session_id.write().await = Some(token);
        debug!("Session established");
        Ok(())
    }

    async fn session_header(&self) -> Result<String, VsphereError> {
        self.session_id
            .read()
            .await
            .clone()
            .ok_or_else(|| VsphereError::Authentication("no active session, call login first".to_string()))
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, VsphereError> {
        let url = self.build_url(path);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .header("vmware-api-session-id", self.session_header().await?)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(VsphereError::Http)?;

        let status = response.status();
        if status == 404 {
            let body = response.text().await.unwrap_or_default();
            return Err(VsphereError::NotFound(format!(
                "Object not found: {} - {}",
                path, body
            )));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VsphereError::Api(format!(
                "GET {} failed: {} - {}",
                path, status, body
            )));
        }

        response.json().await.map_err(VsphereError::Http)
    }

    /// Make a POST request, returning the deserialized response body
    pub async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<T, VsphereError> {
        let url = self.build_url(path);
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .header("vmware-api-session-id", self.session_header().await?)
            .header("Accept", "application/json")
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(VsphereError::Http)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VsphereError::Api(format!(
                "POST {} failed: {} - {}",
                path, status, body
            )));
        }

        response.json().await.map_err(VsphereError::Http)
    }

    /// Make a PATCH request with no response body
    pub async fn patch(&self, path: &str, body: &serde_json::Value) -> Result<(), VsphereError> {
        let url = self.build_url(path);
        debug!("PATCH {}", url);

        let response = self
            .client
            .patch(&url)
            .header("vmware-api-session-id", self.session_header().await?)
            .header("Accept", "application/json")
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(VsphereError::Http)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VsphereError::Api(format!(
                "PATCH {} failed: {} - {}",
                path, status, body
            )));
        }
        Ok(())
    }

    /// Make a DELETE request
    pub async fn delete(&self, path: &str) -> Result<(), VsphereError> {
        let url = self.build_url(path);
        debug!("DELETE {}", url);

        let response = self
            .client
            .delete(&url)
            .header("vmware-api-session-id", self.session_header().await?)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(VsphereError::Http)?;

        let status = response.status();
        if status == 404 {
            let body = response.text().await.unwrap_or_default();
            return Err(VsphereError::NotFound(format!(
                "Object not found: {} - {}",
                path, body
            )));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VsphereError::Api(format!(
                "DELETE {} failed: {} - {}",
                path, status, body
            )));
        }
        Ok(())
    }
}
