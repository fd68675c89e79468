//! Typed wrappers over the backend account endpoints: registration,
//! activation, the current account, and the password flows. Each function is a
//! single request with no retries; failures carry the URL, status and the
//! backend's problem message.

use crate::itinero::{api_error_message, session::Session};
use anyhow::{anyhow, Result};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, instrument};
use ulid::Ulid;

/// The authenticated user's profile as served by `GET /api/account`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub login: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    pub email: String,
    #[serde(default)]
    pub activated: bool,
    #[serde(default)]
    pub lang_key: Option<String>,
    #[serde(default)]
    pub authorities: Vec<String>,
}

/// Fetch the current account for the active session.
/// # Errors
/// Returns an error if the request fails or the session is not authenticated.
#[instrument]
pub async fn current(session: &Session) -> Result<Account> {
    let account_url = session.endpoint("/api/account")?;

    let response = session
        .client()
        .get(&account_url)
        .header("X-Request-Id", Ulid::new().to_string())
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        return Err(anyhow!(
            "{} - {}, {}",
            account_url,
            status,
            api_error_message(&body)
        ));
    }

    let account: Account = response.json().await?;

    debug!("current account: {}", account.login);

    Ok(account)
}

/// Update the current account's profile.
/// # Errors
/// Returns an error if the request fails or the backend rejects the update.
#[instrument(skip(account))]
pub async fn save(session: &Session, account: &Account) -> Result<()> {
    let account_url = session.endpoint("/api/account")?;

    let response = session
        .client()
        .post(&account_url)
        .header("X-Request-Id", Ulid::new().to_string())
        .json(account)
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        return Err(anyhow!(
            "{} - {}, {}",
            account_url,
            status,
            api_error_message(&body)
        ));
    }

    Ok(())
}

/// Register a new account. The payload is the profile plus the password,
/// matching the backend's managed-user shape.
/// # Errors
/// Returns an error if the request fails or the login/e-mail is already taken.
#[instrument(skip(account, password))]
pub async fn register(session: &Session, account: &Account, password: &SecretString) -> Result<()> {
    let register_url = session.endpoint("/api/register")?;

    let mut payload = serde_json::to_value(account)?;
    payload["password"] = json!(password.expose_secret());

    let response = session
        .client()
        .post(&register_url)
        .header("X-Request-Id", Ulid::new().to_string())
        .json(&payload)
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        return Err(anyhow!(
            "{} - {}, {}",
            register_url,
            status,
            api_error_message(&body)
        ));
    }

    Ok(())
}

/// Activate a registered account with the key from the activation e-mail.
/// # Errors
/// Returns an error if the request fails or the key is unknown.
#[instrument]
pub async fn activate(session: &Session, key: &str) -> Result<()> {
    let activate_url = session.endpoint("/api/activate")?;

    let response = session
        .client()
        .get(&activate_url)
        .query(&[("key", key)])
        .header("X-Request-Id", Ulid::new().to_string())
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        return Err(anyhow!(
            "{} - {}, {}",
            activate_url,
            status,
            api_error_message(&body)
        ));
    }

    Ok(())
}

/// Change the password of the authenticated account. The backend expects the
/// new password as the raw request body.
/// # Errors
/// Returns an error if the request fails or the session is not authenticated.
#[instrument(skip(new_password))]
pub async fn change_password(session: &Session, new_password: &SecretString) -> Result<()> {
    let password_url = session.endpoint("/api/account/change_password")?;

    let response = session
        .client()
        .post(&password_url)
        .header("X-Request-Id", Ulid::new().to_string())
        .body(new_password.expose_secret().to_string())
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        return Err(anyhow!(
            "{} - {}, {}",
            password_url,
            status,
            api_error_message(&body)
        ));
    }

    Ok(())
}

/// Start a password reset by e-mail. The address is the raw request body.
/// # Errors
/// Returns an error if the request fails or the address is not registered.
#[instrument]
pub async fn reset_password_init(session: &Session, email: &str) -> Result<()> {
    let reset_url = session.endpoint("/api/account/reset_password/init")?;

    let response = session
        .client()
        .post(&reset_url)
        .header("X-Request-Id", Ulid::new().to_string())
        .body(email.to_string())
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        return Err(anyhow!(
            "{} - {}, {}",
            reset_url,
            status,
            api_error_message(&body)
        ));
    }

    Ok(())
}

/// Finish a password reset with the key from the reset e-mail.
/// # Errors
/// Returns an error if the request fails or the key is expired or unknown.
#[instrument(skip(new_password))]
pub async fn reset_password_finish(
    session: &Session,
    key: &str,
    new_password: &SecretString,
) -> Result<()> {
    let reset_url = session.endpoint("/api/account/reset_password/finish")?;

    let payload = json!({
        "key": key,
        "newPassword": new_password.expose_secret(),
    });

    let response = session
        .client()
        .post(&reset_url)
        .header("X-Request-Id", Ulid::new().to_string())
        .json(&payload)
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        return Err(anyhow!(
            "{} - {}, {}",
            reset_url,
            status,
            api_error_message(&body)
        ));
    }

    Ok(())
}
