//! Fire-and-forget user activity signal, sent after a successful login. The
//! backend aggregates these for its activity feed; a lost signal is harmless,
//! so failures are only logged.

use crate::itinero::session::Session;
use tracing::debug;
use ulid::Ulid;

/// Signal user activity without waiting for the result.
pub fn send_activity(session: &Session) {
    let activity_url = match session.endpoint("/api/activity") {
        Ok(url) => url,
        Err(err) => {
            debug!("activity signal skipped: {}", err);
            return;
        }
    };

    let client = session.client().clone();

    tokio::spawn(async move {
        let result = client
            .post(&activity_url)
            .header("X-Request-Id", Ulid::new().to_string())
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => {
                debug!("activity signal sent");
            }
            Ok(response) => {
                debug!("activity signal rejected: {}", response.status());
            }
            Err(err) => {
                debug!("activity signal failed: {}", err);
            }
        }
    });
}
