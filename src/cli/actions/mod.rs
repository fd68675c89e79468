pub mod account;
pub mod activate;
pub mod login;
pub mod logout;
pub mod password;
pub mod register;

// Internal "interpreter" for `Action`.
// We keep the match in a separate module so `mod.rs` stays small as more actions are added.
mod run;

use crate::cli::globals::GlobalArgs;
use secrecy::SecretString;

#[derive(Debug)]
pub enum Action {
    Login {
        username: String,
        password: SecretString,
        remember_me: bool,
    },
    Logout,
    Register {
        username: String,
        password: SecretString,
        email: String,
        first_name: Option<String>,
        last_name: Option<String>,
        lang: String,
    },
    Activate {
        key: String,
    },
    PasswordChange {
        username: String,
        password: SecretString,
        new_password: SecretString,
    },
    PasswordResetInit {
        email: String,
    },
    PasswordResetFinish {
        key: String,
        new_password: SecretString,
    },
    Account {
        username: String,
        password: SecretString,
        first_name: Option<String>,
        last_name: Option<String>,
        lang: Option<String>,
    },
}

impl Action {
    // Convenience wrapper so call sites can do `action.execute(&globals).await`.
    // When adding new actions, extend the match in `run::execute`.
    /// Execute the action.
    /// # Errors
    /// Returns an error if the action fails.
    pub async fn execute(self, globals: &GlobalArgs) -> anyhow::Result<()> {
        run::execute(self, globals).await
    }
}
