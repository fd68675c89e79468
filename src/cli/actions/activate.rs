use crate::cli::globals::GlobalArgs;
use crate::itinero::auth::Auth;
use anyhow::Result;
use tracing::info;

/// Activate a registered account with the e-mailed key.
/// # Errors
/// Returns an error if the key is unknown or the request fails.
pub async fn execute(globals: &GlobalArgs, key: &str) -> Result<()> {
    let auth = Auth::new(&globals.api_url)?;

    auth.activate_account(key).await?;

    info!("account activated");

    println!("Account activated, you can now log in");

    Ok(())
}
