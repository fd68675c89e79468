//! Session transport for the Itinero backend. Exchanges credentials for a
//! server-side session (an opaque token carried in a cookie) and invalidates
//! it on logout. The cookie jar lives inside the shared `reqwest` client, so
//! every resource call made through this session is authenticated once login
//! succeeds.

use crate::itinero::{api_error_message, endpoint_url, APP_USER_AGENT};
use anyhow::{anyhow, Result};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::{debug, instrument};
use ulid::Ulid;

/// Login form payload. The password is never printed or logged.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
    pub remember_me: bool,
}

impl Credentials {
    #[must_use]
    pub fn new(username: &str, password: SecretString, remember_me: bool) -> Self {
        Self {
            username: username.to_string(),
            password,
            remember_me,
        }
    }
}

/// Cookie-backed HTTP session against the Itinero API.
#[derive(Debug, Clone)]
pub struct Session {
    client: Client,
    api_url: String,
}

impl Session {
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(api_url: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(APP_USER_AGENT)
            .cookie_store(true)
            .build()?;

        Ok(Self {
            client,
            api_url: api_url.to_string(),
        })
    }

    #[must_use]
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// # Errors
    /// Returns an error if the API base URL is invalid.
    pub fn endpoint(&self, path: &str) -> Result<String> {
        endpoint_url(&self.api_url, path)
    }

    /// Exchange credentials for a backend session. On success the session
    /// cookie is stored in the client's jar and the response body is returned
    /// as-is for the caller.
    /// # Errors
    /// Returns an error if the request fails or the backend rejects the credentials.
    #[instrument(skip(credentials))]
    pub async fn login(&self, credentials: &Credentials) -> Result<Value> {
        let login_url = self.endpoint("/api/authentication")?;

        debug!("login URL: {}, username: {}", login_url, credentials.username);

        let form = [
            ("j_username", credentials.username.as_str()),
            ("j_password", credentials.password.expose_secret()),
            (
                "remember-me",
                if credentials.remember_me { "true" } else { "false" },
            ),
            ("submit", "Login"),
        ];

        let response = self
            .client
            .post(&login_url)
            .header("X-Request-Id", Ulid::new().to_string())
            .form(&form)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            return Err(anyhow!(
                "{} - {}, {}",
                login_url,
                status,
                api_error_message(&body)
            ));
        }

        let body = response.text().await.unwrap_or_default();

        // Some backends answer the form login with an empty body
        Ok(serde_json::from_str(&body).unwrap_or(Value::Null))
    }

    /// Invalidate the backend session. The cookie jar keeps whatever the
    /// server sends back; an expired cookie replaces the live one.
    /// # Errors
    /// Returns an error if the request fails or the backend answers with a failure status.
    #[instrument]
    pub async fn logout(&self) -> Result<()> {
        let logout_url = self.endpoint("/api/logout")?;

        let response = self
            .client
            .post(&logout_url)
            .header("X-Request-Id", Ulid::new().to_string())
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            return Err(anyhow!(
                "{} - {}, {}",
                logout_url,
                status,
                api_error_message(&body)
            ));
        }

        Ok(())
    }
}
