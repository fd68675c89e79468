pub mod account;
pub mod auth;
pub mod guard;
pub mod principal;
pub mod session;
pub mod tracker;

use anyhow::{anyhow, Result};
use regex::Regex;
use serde_json::Value;
use tracing::debug;
use url::Url;

pub static APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

/// Build a full endpoint URL from the API base URL and a path.
/// # Errors
/// Returns an error if `url` cannot be parsed, has no host, or uses an unsupported scheme.
pub fn endpoint_url(url: &str, path: &str) -> Result<String> {
    let url = Url::parse(url)?;

    let scheme = url.scheme();

    let host = url
        .host()
        .ok_or_else(|| anyhow!("Error parsing URL: no host specified"))?
        .to_owned();

    let port = match url.port() {
        Some(p) => p,
        None => match scheme {
            "http" => 80,
            "https" => 443,
            _ => return Err(anyhow!("Error parsing URL: unsupported scheme {scheme}")),
        },
    };

    let endpoint_url = format!("{scheme}://{host}:{port}{path}");

    debug!("endpoint URL: {}", endpoint_url);

    Ok(endpoint_url)
}

/// Extract a human-readable message from a backend error body.
/// The backend answers with RFC 7807 problem JSON; fall back to the raw body.
#[must_use]
pub fn api_error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body).map_or_else(
        |_| body.trim().to_string(),
        |json| {
            ["detail", "title", "message", "error"]
                .iter()
                .find_map(|key| json.get(key).and_then(Value::as_str))
                .map_or_else(|| body.trim().to_string(), ToString::to_string)
        },
    )
}

#[must_use]
pub fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|re| re.is_match(email))
}

// registration constraints: 1-50 chars, lowercase letters, digits and separators
#[must_use]
pub fn valid_login(login: &str) -> bool {
    Regex::new(r"^[a-z0-9._-]{1,50}$").is_ok_and(|re| re.is_match(login))
}

#[must_use]
pub fn valid_password(password: &str) -> bool {
    let len = password.chars().count();
    (4..=100).contains(&len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn endpoint_url_defaults_http_port() -> Result<()> {
        let url = endpoint_url("http://example.com", "/api/account")?;
        assert_eq!(url, "http://example.com:80/api/account");
        Ok(())
    }

    #[test]
    fn endpoint_url_defaults_https_port() -> Result<()> {
        let url = endpoint_url("https://example.com", "/api/account")?;
        assert_eq!(url, "https://example.com:443/api/account");
        Ok(())
    }

    #[test]
    fn endpoint_url_keeps_explicit_port() -> Result<()> {
        let url = endpoint_url("http://localhost:8080", "/api/logout")?;
        assert_eq!(url, "http://localhost:8080/api/logout");
        Ok(())
    }

    #[test]
    fn endpoint_url_rejects_unsupported_scheme() -> Result<()> {
        let err = endpoint_url("ftp://example.com", "/api/account")
            .err()
            .ok_or_else(|| anyhow!("expected error"))?;
        assert!(err.to_string().contains("unsupported scheme"));
        Ok(())
    }

    #[test]
    fn api_error_message_prefers_problem_detail() {
        let body = r#"{"title": "Bad Request", "detail": "login already in use"}"#;
        assert_eq!(api_error_message(body), "login already in use");
    }

    #[test]
    fn api_error_message_falls_back_to_title() {
        let body = r#"{"title": "Unauthorized"}"#;
        assert_eq!(api_error_message(body), "Unauthorized");
    }

    #[test]
    fn api_error_message_returns_raw_body_for_plain_text() {
        assert_eq!(api_error_message("e-mail address already in use"), "e-mail address already in use");
    }

    #[test]
    fn valid_email_accepts_basic_format() {
        assert!(valid_email("a@example.com"));
        assert!(valid_email("name.surname@example.co"));
    }

    #[test]
    fn valid_email_rejects_missing_parts() {
        assert!(!valid_email("not-an-email"));
        assert!(!valid_email("missing-at.example.com"));
        assert!(!valid_email("missing-domain@"));
    }

    #[test]
    fn valid_login_rejects_uppercase_and_spaces() {
        assert!(valid_login("john.doe"));
        assert!(!valid_login("John Doe"));
        assert!(!valid_login(""));
    }

    #[test]
    fn valid_password_enforces_length_bounds() {
        assert!(valid_password("1234"));
        assert!(!valid_password("123"));
        assert!(!valid_password(&"x".repeat(101)));
    }
}
