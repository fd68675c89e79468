use crate::cli::{actions::Action, globals::GlobalArgs};
use anyhow::{Context, Result};
use secrecy::SecretString;

fn required(matches: &clap::ArgMatches, name: &str) -> Result<String> {
    matches
        .get_one::<String>(name)
        .cloned()
        .with_context(|| format!("missing required argument: --{name}"))
}

fn secret(matches: &clap::ArgMatches, name: &str) -> Result<SecretString> {
    required(matches, name).map(SecretString::from)
}

/// Map parsed arguments to an `Action` plus the global configuration.
/// # Errors
/// Returns an error if required arguments are missing.
pub fn handler(matches: &clap::ArgMatches) -> Result<(GlobalArgs, Action)> {
    let api_url = required(matches, "api-url")
        .context("missing required argument: --api-url (or ITINERO_API_URL)")?;

    let globals = GlobalArgs::new(api_url);

    let (name, sub) = matches
        .subcommand()
        .context("no subcommand provided")?;

    let action = match name {
        "login" => Action::Login {
            username: required(sub, "username")?,
            password: secret(sub, "password")?,
            remember_me: sub.get_flag("remember-me"),
        },
        "logout" => Action::Logout,
        "register" => Action::Register {
            username: required(sub, "username")?,
            password: secret(sub, "password")?,
            email: required(sub, "email")?,
            first_name: sub.get_one::<String>("first-name").cloned(),
            last_name: sub.get_one::<String>("last-name").cloned(),
            lang: required(sub, "lang")?,
        },
        "activate" => Action::Activate {
            key: required(sub, "key")?,
        },
        "password-change" => Action::PasswordChange {
            username: required(sub, "username")?,
            password: secret(sub, "password")?,
            new_password: secret(sub, "new-password")?,
        },
        "password-reset-init" => Action::PasswordResetInit {
            email: required(sub, "email")?,
        },
        "password-reset-finish" => Action::PasswordResetFinish {
            key: required(sub, "key")?,
            new_password: secret(sub, "new-password")?,
        },
        "account" => Action::Account {
            username: required(sub, "username")?,
            password: secret(sub, "password")?,
            first_name: sub.get_one::<String>("first-name").cloned(),
            last_name: sub.get_one::<String>("last-name").cloned(),
            lang: sub.get_one::<String>("lang").cloned(),
        },
        _ => anyhow::bail!("unknown subcommand: {name}"),
    };

    Ok((globals, action))
}
