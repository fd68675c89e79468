use crate::cli::globals::GlobalArgs;
use crate::itinero::{auth::Auth, guard::NavMemory};
use anyhow::Result;
use tracing::info;

/// Invalidate the backend session. Logout never fails locally.
/// # Errors
/// Returns an error only if the HTTP client cannot be built.
pub async fn execute(globals: &GlobalArgs) -> Result<()> {
    let mut auth = Auth::new(&globals.api_url)?;
    let mut memory = NavMemory::new();

    auth.logout(&mut memory).await;

    info!("session invalidated");

    Ok(())
}
