//! Auth façade. Composes the session transport, the identity cache, the
//! activity tracker and the account resources into the operations the rest of
//! the application calls: login, logout, registration, password flows and the
//! route guard.
//!
//! Operations that can leave a half-authenticated state behind (failed login,
//! failed registration) perform a logout before surfacing the error, so the
//! identity cache never outlives the session it was fetched with.

use crate::itinero::{
    account,
    guard::{self, GuardDecision, NavMemory, RouteTarget},
    principal::Principal,
    session::{Credentials, Session},
    tracker, valid_email, valid_login, valid_password,
};
use anyhow::{anyhow, Result};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::{debug, instrument};

#[derive(Debug)]
pub struct Auth {
    session: Session,
    principal: Principal,
    lang: Option<String>,
}

impl Auth {
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(api_url: &str) -> Result<Self> {
        Ok(Self {
            session: Session::new(api_url)?,
            principal: Principal::new(),
            lang: None,
        })
    }

    #[must_use]
    pub fn principal(&self) -> &Principal {
        &self.principal
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Language key of the logged-in account, recorded at login.
    #[must_use]
    pub fn current_language(&self) -> Option<&str> {
        self.lang.as_deref()
    }

    /// Log in and populate the identity cache. On success the account's
    /// language preference becomes the active language and an activity signal
    /// is sent. On failure any partial state is cleared via logout before the
    /// error is returned.
    /// # Errors
    /// Returns an error if the backend rejects the credentials or the request fails.
    #[instrument(skip(self, credentials, memory))]
    pub async fn login(
        &mut self,
        credentials: &Credentials,
        memory: &mut NavMemory,
    ) -> Result<Value> {
        let data = match self.session.login(credentials).await {
            Ok(data) => data,
            Err(err) => {
                self.logout(memory).await;
                return Err(err);
            }
        };

        if let Some(account) = self.principal.identity(&self.session, true).await {
            // switch to the language the user picked at registration
            self.lang = account.lang_key.clone();
        }

        tracker::send_activity(&self.session);

        Ok(data)
    }

    /// Invalidate the session and clear the identity cache. Transport errors
    /// are logged and swallowed; logout always succeeds locally. The pending
    /// redirect is kept while a redirect is in flight.
    #[instrument(skip(self, memory))]
    pub async fn logout(&mut self, memory: &mut NavMemory) {
        if let Err(err) = self.session.logout().await {
            debug!("logout transport call failed: {}", err);
        }

        self.principal.authenticate(None);

        if !memory.is_redirected() {
            memory.clear();
        }
    }

    /// Route guard: resolve the identity (cached unless `force`) and decide
    /// whether navigation to `target` may proceed.
    #[instrument(skip(self, target, memory))]
    pub async fn authorize(
        &mut self,
        target: &RouteTarget,
        memory: &mut NavMemory,
        force: bool,
    ) -> GuardDecision {
        self.principal.identity(&self.session, force).await;

        guard::decide(&self.principal, target, memory)
    }

    /// Register a new account. On failure the session is logged out so no
    /// partial state survives.
    /// # Errors
    /// Returns an error if the profile is invalid or the backend rejects the registration.
    #[instrument(skip(self, new_account, password, memory))]
    pub async fn create_account(
        &mut self,
        new_account: &account::Account,
        password: &SecretString,
        memory: &mut NavMemory,
    ) -> Result<()> {
        if !valid_login(&new_account.login) {
            return Err(anyhow!("Invalid login: {}", new_account.login));
        }

        if !valid_email(&new_account.email) {
            return Err(anyhow!("Invalid e-mail address: {}", new_account.email));
        }

        if !valid_password(password.expose_secret()) {
            return Err(anyhow!("Invalid password: must be 4 to 100 characters"));
        }

        match account::register(&self.session, new_account, password).await {
            Ok(()) => Ok(()),
            Err(err) => {
                self.logout(memory).await;
                Err(err)
            }
        }
    }

    /// Change the password of the authenticated account.
    /// # Errors
    /// Returns an error if the password is invalid or the request fails.
    #[instrument(skip(self, new_password))]
    pub async fn change_password(&self, new_password: &SecretString) -> Result<()> {
        if !valid_password(new_password.expose_secret()) {
            return Err(anyhow!("Invalid password: must be 4 to 100 characters"));
        }

        account::change_password(&self.session, new_password).await
    }

    /// Request a password-reset e-mail.
    /// # Errors
    /// Returns an error if the address is invalid or the request fails.
    #[instrument(skip(self))]
    pub async fn reset_password_init(&self, email: &str) -> Result<()> {
        if !valid_email(email) {
            return Err(anyhow!("Invalid e-mail address: {email}"));
        }

        account::reset_password_init(&self.session, email).await
    }

    /// Finish a password reset with the e-mailed key.
    /// # Errors
    /// Returns an error if the password is invalid or the request fails.
    #[instrument(skip(self, new_password))]
    pub async fn reset_password_finish(&self, key: &str, new_password: &SecretString) -> Result<()> {
        if !valid_password(new_password.expose_secret()) {
            return Err(anyhow!("Invalid password: must be 4 to 100 characters"));
        }

        account::reset_password_finish(&self.session, key, new_password).await
    }

    /// Update the profile of the authenticated account and refresh the cache.
    /// # Errors
    /// Returns an error if the request fails.
    #[instrument(skip(self, updated))]
    pub async fn update_account(&mut self, updated: &account::Account) -> Result<()> {
        account::save(&self.session, updated).await?;

        self.principal.identity(&self.session, true).await;

        Ok(())
    }

    /// Activate a registered account with the e-mailed key.
    /// # Errors
    /// Returns an error if the key is unknown or the request fails.
    #[instrument(skip(self))]
    pub async fn activate_account(&self, key: &str) -> Result<()> {
        account::activate(&self.session, key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::itinero::account::Account;
    use serde_json::json;
    use std::net::TcpListener;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn can_bind_localhost() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    fn credentials() -> Credentials {
        Credentials::new("admin", SecretString::from("admin".to_string()), false)
    }

    async fn mount_account(server: &MockServer, lang: &str) {
        Mock::given(method("GET"))
            .and(path("/api/account"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "login": "admin",
                "email": "admin@localhost",
                "activated": true,
                "langKey": lang,
                "authorities": ["ROLE_ADMIN", "ROLE_USER"]
            })))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn login_failure_clears_identity_before_error() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/authentication"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Bad credentials"))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/logout"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let mut auth = Auth::new(&server.uri())?;
        let mut memory = NavMemory::new();

        let result = auth.login(&credentials(), &mut memory).await;
        assert!(result.is_err());
        assert!(!auth.principal().is_authenticated());
        Ok(())
    }

    #[tokio::test]
    async fn create_account_failure_triggers_logout() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/register"))
            .respond_with(ResponseTemplate::new(400).set_body_string("login already in use"))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/logout"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let mut auth = Auth::new(&server.uri())?;
        let mut memory = NavMemory::new();
        let new_account = Account {
            login: "joe".to_string(),
            email: "joe@example.com".to_string(),
            lang_key: Some("en".to_string()),
            ..Account::default()
        };

        let result = auth
            .create_account(
                &new_account,
                &SecretString::from("password".to_string()),
                &mut memory,
            )
            .await;
        assert!(result.is_err());
        assert!(!auth.principal().is_authenticated());
        Ok(())
    }

    #[tokio::test]
    async fn create_account_rejects_invalid_email_without_network() -> Result<()> {
        // unroutable base URL: validation must fail before any request
        let mut auth = Auth::new("http://localhost:1")?;
        let mut memory = NavMemory::new();
        let new_account = Account {
            login: "joe".to_string(),
            email: "not-an-email".to_string(),
            ..Account::default()
        };

        let err = auth
            .create_account(
                &new_account,
                &SecretString::from("password".to_string()),
                &mut memory,
            )
            .await
            .err()
            .expect("expected validation error");
        assert!(err.to_string().contains("Invalid e-mail"));
        Ok(())
    }

    #[tokio::test]
    async fn change_password_rejects_short_password() -> Result<()> {
        let auth = Auth::new("http://localhost:1")?;
        let err = auth
            .change_password(&SecretString::from("abc".to_string()))
            .await
            .err()
            .expect("expected validation error");
        assert!(err.to_string().contains("4 to 100"));
        Ok(())
    }

    #[tokio::test]
    async fn logout_keeps_pending_redirect_while_in_flight() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/logout"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let mut auth = Auth::new(&server.uri())?;
        let mut memory = NavMemory::new();
        memory.stow(&RouteTarget::new("trip"));

        auth.logout(&mut memory).await;
        assert!(memory.pending().is_some());

        // once the redirect is claimed, the next logout clears nothing more
        memory.take_pending();
        memory.stow(&RouteTarget::new("scenic-spot"));
        memory.take_pending();
        auth.logout(&mut memory).await;
        assert!(memory.pending().is_none());
        Ok(())
    }

    #[tokio::test]
    async fn logout_swallows_transport_errors() -> Result<()> {
        // no server listening: the transport call fails, logout still clears state
        let mut auth = Auth::new("http://localhost:1")?;
        let mut memory = NavMemory::new();

        auth.logout(&mut memory).await;
        assert!(!auth.principal().is_authenticated());
        Ok(())
    }

    #[tokio::test]
    async fn successful_login_switches_language() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/authentication"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/activity"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
        mount_account(&server, "fr").await;

        let mut auth = Auth::new(&server.uri())?;
        let mut memory = NavMemory::new();

        auth.login(&credentials(), &mut memory).await?;
        assert!(auth.principal().is_authenticated());
        assert_eq!(auth.current_language(), Some("fr"));
        Ok(())
    }
}
