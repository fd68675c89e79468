use crate::cli::{
    actions::{account, activate, login, logout, password, register, Action},
    globals::GlobalArgs,
};
use anyhow::Result;

/// Execute the provided action.
// This is the single dispatch point for all CLI actions.
/// # Errors
/// Returns an error if the action fails.
pub async fn execute(action: Action, globals: &GlobalArgs) -> Result<()> {
    match action {
        Action::Login {
            username,
            password,
            remember_me,
        } => login::execute(globals, &username, password, remember_me).await,
        Action::Logout => logout::execute(globals).await,
        Action::Register {
            username,
            password,
            email,
            first_name,
            last_name,
            lang,
        } => {
            register::execute(
                globals, &username, password, &email, first_name, last_name, &lang,
            )
            .await
        }
        Action::Activate { key } => activate::execute(globals, &key).await,
        Action::PasswordChange {
            username,
            password,
            new_password,
        } => password::change(globals, &username, password, new_password).await,
        Action::PasswordResetInit { email } => password::reset_init(globals, &email).await,
        Action::PasswordResetFinish { key, new_password } => {
            password::reset_finish(globals, &key, new_password).await
        }
        Action::Account {
            username,
            password,
            first_name,
            last_name,
            lang,
        } => account::execute(globals, &username, password, first_name, last_name, lang).await,
    }
}
