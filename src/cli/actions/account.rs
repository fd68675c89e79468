use crate::cli::globals::GlobalArgs;
use crate::itinero::{auth::Auth, guard::NavMemory, session::Credentials};
use anyhow::{anyhow, Result};
use secrecy::SecretString;
use tracing::info;

/// Show the account profile, applying any requested updates first.
/// # Errors
/// Returns an error if login fails or the update is rejected.
pub async fn execute(
    globals: &GlobalArgs,
    username: &str,
    password: SecretString,
    first_name: Option<String>,
    last_name: Option<String>,
    lang: Option<String>,
) -> Result<()> {
    let mut auth = Auth::new(&globals.api_url)?;
    let mut memory = NavMemory::new();

    let credentials = Credentials::new(username, password, false);
    auth.login(&credentials, &mut memory).await?;

    let has_updates = first_name.is_some() || last_name.is_some() || lang.is_some();

    if has_updates {
        let mut updated = auth
            .principal()
            .account()
            .ok_or_else(|| anyhow!("login succeeded but the account could not be fetched"))?
            .clone();

        if first_name.is_some() {
            updated.first_name = first_name;
        }
        if last_name.is_some() {
            updated.last_name = last_name;
        }
        if lang.is_some() {
            updated.lang_key = lang;
        }

        auth.update_account(&updated).await?;

        info!("account updated for {}", username);
    }

    let account = auth
        .principal()
        .account()
        .ok_or_else(|| anyhow!("account could not be fetched"))?;

    println!("{}", serde_json::to_string_pretty(account)?);

    Ok(())
}
