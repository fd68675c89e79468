//! Identity cache for the authenticated user. The cached profile is replaced
//! wholesale on each forced fetch and cleared on logout; a failed fetch is
//! treated as "not authenticated", not as a hard error, so route guards can
//! always reach a decision.

use crate::itinero::{account, session::Session};
use tracing::debug;

#[derive(Debug, Default)]
pub struct Principal {
    account: Option<account::Account>,
    authenticated: bool,
}

impl Principal {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the cached identity. `None` clears it, as on logout.
    pub fn authenticate(&mut self, account: Option<account::Account>) {
        self.authenticated = account.is_some();
        self.account = account;
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    #[must_use]
    pub fn account(&self) -> Option<&account::Account> {
        self.account.as_ref()
    }

    /// True when the cached identity holds at least one of the given
    /// authorities. Always false while unauthenticated.
    #[must_use]
    pub fn has_any_authority(&self, authorities: &[impl AsRef<str>]) -> bool {
        if !self.authenticated {
            return false;
        }

        self.account.as_ref().is_some_and(|account| {
            authorities.iter().any(|authority| {
                account
                    .authorities
                    .iter()
                    .any(|held| held.as_str() == authority.as_ref())
            })
        })
    }

    /// Resolve the identity, fetching from the backend when the cache is
    /// empty or `force` is set. A transport or authentication failure clears
    /// the cache and resolves to `None`.
    pub async fn identity(
        &mut self,
        session: &Session,
        force: bool,
    ) -> Option<&account::Account> {
        if force || self.account.is_none() {
            match account::current(session).await {
                Ok(account) => self.authenticate(Some(account)),
                Err(err) => {
                    debug!("identity fetch failed: {}", err);
                    self.authenticate(None);
                }
            }
        }

        self.account.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::itinero::account::Account;
    use anyhow::Result;
    use serde_json::json;
    use std::net::TcpListener;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn can_bind_localhost() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    fn user_account(authorities: &[&str]) -> Account {
        Account {
            login: "user".to_string(),
            email: "user@localhost".to_string(),
            activated: true,
            lang_key: Some("en".to_string()),
            authorities: authorities.iter().map(ToString::to_string).collect(),
            ..Account::default()
        }
    }

    #[test]
    fn authenticate_none_clears_identity() {
        let mut principal = Principal::new();
        principal.authenticate(Some(user_account(&["ROLE_USER"])));
        assert!(principal.is_authenticated());

        principal.authenticate(None);
        assert!(!principal.is_authenticated());
        assert!(principal.account().is_none());
    }

    #[test]
    fn has_any_authority_matches_held_roles() {
        let mut principal = Principal::new();
        principal.authenticate(Some(user_account(&["ROLE_USER"])));

        assert!(principal.has_any_authority(&["ROLE_ADMIN", "ROLE_USER"]));
        assert!(!principal.has_any_authority(&["ROLE_ADMIN"]));
    }

    #[test]
    fn has_any_authority_is_false_when_unauthenticated() {
        let principal = Principal::new();
        assert!(!principal.has_any_authority(&["ROLE_USER"]));
    }

    #[tokio::test]
    async fn identity_caches_until_forced() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/account"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "login": "user",
                "email": "user@localhost",
                "activated": true,
                "langKey": "en",
                "authorities": ["ROLE_USER"]
            })))
            .expect(2)
            .mount(&server)
            .await;

        let session = Session::new(&server.uri())?;
        let mut principal = Principal::new();

        assert!(principal.identity(&session, false).await.is_some());
        // cached, no second request
        assert!(principal.identity(&session, false).await.is_some());
        // forced, hits the backend again
        assert!(principal.identity(&session, true).await.is_some());
        assert!(principal.is_authenticated());
        Ok(())
    }

    #[tokio::test]
    async fn identity_fetch_failure_resolves_unauthenticated() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/account"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let session = Session::new(&server.uri())?;
        let mut principal = Principal::new();
        principal.authenticate(Some(user_account(&["ROLE_USER"])));

        assert!(principal.identity(&session, true).await.is_none());
        assert!(!principal.is_authenticated());
        Ok(())
    }
}
