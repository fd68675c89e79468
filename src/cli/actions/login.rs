use crate::cli::globals::GlobalArgs;
use crate::itinero::{
    auth::Auth,
    guard::NavMemory,
    session::Credentials,
};
use anyhow::{anyhow, Result};
use secrecy::SecretString;
use tracing::info;

/// Log in and print the account profile as JSON.
/// # Errors
/// Returns an error if the backend rejects the credentials.
pub async fn execute(
    globals: &GlobalArgs,
    username: &str,
    password: SecretString,
    remember_me: bool,
) -> Result<()> {
    let mut auth = Auth::new(&globals.api_url)?;
    let mut memory = NavMemory::new();

    let credentials = Credentials::new(username, password, remember_me);

    auth.login(&credentials, &mut memory).await?;

    info!("logged in as {}", username);

    let account = auth
        .principal()
        .account()
        .ok_or_else(|| anyhow!("login succeeded but the account could not be fetched"))?;

    println!("{}", serde_json::to_string_pretty(account)?);

    Ok(())
}
