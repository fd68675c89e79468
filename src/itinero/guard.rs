//! Route guard. The guard is a pure decision over the identity cache, the
//! target route and the caller's navigation memory; it never touches shared
//! state. Redirect targets are route names from the UI contract.

use crate::itinero::principal::Principal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

pub const HOME: &str = "home";
pub const LOGIN: &str = "login";
pub const REGISTER: &str = "register";
pub const ACCESS_DENIED: &str = "accessdenied";

/// Parent state grouping the public account pages (login/register).
pub const ACCOUNT_PARENT: &str = "account";

/// The route the caller is about to enter.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RouteTarget {
    pub name: String,
    pub parent: Option<String>,
    pub params: Map<String, Value>,
    pub authorities: Vec<String>,
}

impl RouteTarget {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_parent(mut self, parent: &str) -> Self {
        self.parent = Some(parent.to_string());
        self
    }

    #[must_use]
    pub fn with_params(mut self, params: Map<String, Value>) -> Self {
        self.params = params;
        self
    }

    #[must_use]
    pub fn with_authorities(mut self, authorities: &[&str]) -> Self {
        self.authorities = authorities.iter().map(ToString::to_string).collect();
        self
    }

    fn is_public_account_page(&self) -> bool {
        self.parent.as_deref() == Some(ACCOUNT_PARENT)
            && (self.name == LOGIN || self.name == REGISTER)
    }
}

/// The route stowed away when an unauthenticated user is turned back.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingRedirect {
    pub name: String,
    pub params: Map<String, Value>,
}

/// Navigation memory owned by the caller. Holds at most one pending redirect
/// target; a later stow replaces an earlier one.
#[derive(Debug, Default)]
pub struct NavMemory {
    previous: Option<PendingRedirect>,
    redirected: bool,
}

impl NavMemory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember the target the user wanted before being sent to login.
    pub fn stow(&mut self, target: &RouteTarget) {
        self.previous = Some(PendingRedirect {
            name: target.name.clone(),
            params: target.params.clone(),
        });
        self.redirected = true;
    }

    #[must_use]
    pub fn is_redirected(&self) -> bool {
        self.redirected
    }

    #[must_use]
    pub fn pending(&self) -> Option<&PendingRedirect> {
        self.previous.as_ref()
    }

    /// Claim the pending target, typically after a successful login.
    pub fn take_pending(&mut self) -> Option<PendingRedirect> {
        self.redirected = false;
        self.previous.take()
    }

    /// Drop the pending target, as on logout without a redirect in flight.
    pub fn clear(&mut self) {
        self.previous = None;
    }
}

/// Outcome of a route authorization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Navigation proceeds.
    Proceed,
    /// Authenticated user tried to reach login/register; send home.
    RedirectHome,
    /// Authenticated but lacking every required authority.
    AccessDenied,
    /// Unauthenticated and lacking authorities; the original target was
    /// stowed in [`NavMemory`] and a login prompt should be opened.
    LoginRequired,
}

impl GuardDecision {
    /// Route name the UI should navigate to, or `None` to proceed.
    #[must_use]
    pub fn redirect_to(&self) -> Option<&'static str> {
        match self {
            Self::Proceed => None,
            Self::RedirectHome => Some(HOME),
            Self::AccessDenied | Self::LoginRequired => Some(ACCESS_DENIED),
        }
    }
}

/// Decide whether navigation to `target` may proceed for the cached identity.
pub fn decide(
    principal: &Principal,
    target: &RouteTarget,
    memory: &mut NavMemory,
) -> GuardDecision {
    let authenticated = principal.is_authenticated();

    // an authenticated user has no business on the login and register pages
    if authenticated && target.is_public_account_page() {
        debug!("redirecting authenticated user away from {}", target.name);
        return GuardDecision::RedirectHome;
    }

    if !target.authorities.is_empty() && !principal.has_any_authority(&target.authorities) {
        if authenticated {
            debug!("authenticated user lacks authorities for {}", target.name);
            return GuardDecision::AccessDenied;
        }

        // stow the state they wanted so they can be returned after login
        memory.stow(target);
        return GuardDecision::LoginRequired;
    }

    GuardDecision::Proceed
}
