use crate::cli::globals::GlobalArgs;
use crate::itinero::{account::Account, auth::Auth, guard::NavMemory};
use anyhow::Result;
use secrecy::SecretString;
use tracing::info;

/// Register a new account. The account stays inactive until the activation
/// key from the confirmation e-mail is used.
/// # Errors
/// Returns an error if the profile is invalid or the backend rejects it.
pub async fn execute(
    globals: &GlobalArgs,
    username: &str,
    password: SecretString,
    email: &str,
    first_name: Option<String>,
    last_name: Option<String>,
    lang: &str,
) -> Result<()> {
    let mut auth = Auth::new(&globals.api_url)?;
    let mut memory = NavMemory::new();

    let new_account = Account {
        login: username.to_string(),
        first_name,
        last_name,
        email: email.to_string(),
        activated: false,
        lang_key: Some(lang.to_string()),
        authorities: Vec::new(),
    };

    auth.create_account(&new_account, &password, &mut memory)
        .await?;

    info!("registration submitted for {}", username);

    println!("Registration saved, check your e-mail for the activation key");

    Ok(())
}
