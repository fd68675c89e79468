//! # Itinero auth client
//!
//! Client-side authentication for the Itinero trip planner backend. The crate
//! wraps the backend's session, account and password REST endpoints behind a
//! typed façade ([`itinero::auth::Auth`]) and keeps the authenticated user's
//! profile and authorities in an identity cache ([`itinero::principal::Principal`]).
//!
//! Route authorization is a pure decision: callers describe the route they are
//! about to enter ([`itinero::guard::RouteTarget`]) and pass their own
//! navigation memory ([`itinero::guard::NavMemory`]); the guard returns a
//! [`itinero::guard::GuardDecision`] instead of mutating ambient state.

pub mod cli;
pub mod itinero;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};
