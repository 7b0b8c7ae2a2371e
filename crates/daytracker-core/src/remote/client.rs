//! HTTP client for the Days API.
//!
//! The contract is fixed and small: `POST /api/auth/login`,
//! `POST /api/users`, and calendar CRUD under `/api/calendars`. Requests
//! carry a bearer token when one is held; any non-2xx response surfaces as
//! [`NetworkError::Status`] so the caller can fall back to local storage.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::NetworkError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct CreateUserRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct CalendarRequest<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
}

/// User payload as the API returns it.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiUser {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub created_at: String,
}

/// `POST /api/auth/login` response body.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub user: ApiUser,
    pub token: String,
}

/// Calendar payload as the API returns it.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiCalendar {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

/// Client for the Days API.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: std::sync::RwLock<Option<String>>,
}

impl ApiClient {
    /// Creates a client for `base_url`, initially holding `token`.
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Result<Self, NetworkError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self {
            http,
            base_url,
            token: std::sync::RwLock::new(token),
        })
    }

    /// Replaces the bearer token used for subsequent requests.
    pub fn set_token(&self, token: Option<String>) {
        *self.token.write().expect("token lock") = token;
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, NetworkError> {
        let request = self
            .http
            .post(self.url("/api/auth/login"))
            .json(&LoginRequest { email, password });
        self.send(request, false).await?.json().await.map_err(Into::into)
    }

    /// Registers a new user. Deliberately unauthenticated: registration
    /// must work without a session.
    pub async fn create_user(&self, email: &str, password: &str) -> Result<ApiUser, NetworkError> {
        let request = self
            .http
            .post(self.url("/api/users"))
            .json(&CreateUserRequest { email, password });
        self.send(request, false).await?.json().await.map_err(Into::into)
    }

    pub async fn calendars(&self) -> Result<Vec<ApiCalendar>, NetworkError> {
        let request = self.http.get(self.url("/api/calendars"));
        self.send(request, true).await?.json().await.map_err(Into::into)
    }

    pub async fn calendar(&self, id: &str) -> Result<ApiCalendar, NetworkError> {
        let request = self.http.get(self.url(&format!("/api/calendars/{id}")));
        self.send(request, true).await?.json().await.map_err(Into::into)
    }

    pub async fn create_calendar(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> Result<ApiCalendar, NetworkError> {
        let request = self
            .http
            .post(self.url("/api/calendars"))
            .json(&CalendarRequest { name, description });
        self.send(request, true).await?.json().await.map_err(Into::into)
    }

    pub async fn update_calendar(
        &self,
        id: &str,
        name: &str,
        description: Option<&str>,
    ) -> Result<ApiCalendar, NetworkError> {
        let request = self
            .http
            .put(self.url(&format!("/api/calendars/{id}")))
            .json(&CalendarRequest { name, description });
        self.send(request, true).await?.json().await.map_err(Into::into)
    }

    pub async fn delete_calendar(&self, id: &str) -> Result<(), NetworkError> {
        let request = self.http.delete(self.url(&format!("/api/calendars/{id}")));
        self.send(request, true).await.map(|_| ())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        with_auth: bool,
    ) -> Result<reqwest::Response, NetworkError> {
        let request = if with_auth {
            match self.token.read().expect("token lock").clone() {
                Some(token) => request.bearer_auth(token),
                None => request,
            }
        } else {
            request
        };
        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(NetworkError::Status {
                status: response.status().as_u16(),
            });
        }
        Ok(response)
    }
}
