use crate::cli::globals::GlobalArgs;
use crate::itinero::{auth::Auth, guard::NavMemory, session::Credentials};
use anyhow::Result;
use secrecy::SecretString;
use tracing::info;

/// Change the password of an existing account. Logs in first, changes the
/// password, then drops the session.
/// # Errors
/// Returns an error if login fails or the backend rejects the new password.
pub async fn change(
    globals: &GlobalArgs,
    username: &str,
    password: SecretString,
    new_password: SecretString,
) -> Result<()> {
    let mut auth = Auth::new(&globals.api_url)?;
    let mut memory = NavMemory::new();

    let credentials = Credentials::new(username, password, false);
    auth.login(&credentials, &mut memory).await?;

    let result = auth.change_password(&new_password).await;

    auth.logout(&mut memory).await;

    result?;

    info!("password changed for {}", username);

    println!("Password changed");

    Ok(())
}

/// Request a password-reset e-mail.
/// # Errors
/// Returns an error if the address is invalid or not registered.
pub async fn reset_init(globals: &GlobalArgs, email: &str) -> Result<()> {
    let auth = Auth::new(&globals.api_url)?;

    auth.reset_password_init(email).await?;

    info!("password reset requested for {}", email);

    println!("Check your e-mail for the reset key");

    Ok(())
}

/// Finish a password reset with the e-mailed key.
/// # Errors
/// Returns an error if the key is expired or the password is invalid.
pub async fn reset_finish(globals: &GlobalArgs, key: &str, new_password: SecretString) -> Result<()> {
    let auth = Auth::new(&globals.api_url)?;

    auth.reset_password_finish(key, &new_password).await?;

    info!("password reset finished");

    println!("Password updated, you can now log in");

    Ok(())
}
