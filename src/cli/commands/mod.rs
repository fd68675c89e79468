use clap::{
    builder::{
        styling::{AnsiColor, Effects, Styles},
        ValueParser,
    },
    Arg, ArgAction, ColorChoice, Command,
};

pub fn validator_log_level() -> ValueParser {
    ValueParser::from(move |level: &str| -> std::result::Result<u8, String> {
        if let Ok(parsed) = level.parse::<u8>() {
            // Successfully parsed as a number
            if parsed <= 5 {
                return Ok(parsed);
            }
        }

        match level.to_lowercase().as_str() {
            "error" => Ok(0),
            "warn" => Ok(1),
            "info" => Ok(2),
            "debug" => Ok(3),
            "trace" => Ok(4),
            _ => Err("invalid log level".to_string()),
        }
    })
}

fn username_arg() -> Arg {
    Arg::new("username")
        .short('u')
        .long("username")
        .help("Account login")
        .env("ITINERO_USERNAME")
        .required(true)
}

fn password_arg() -> Arg {
    Arg::new("password")
        .short('p')
        .long("password")
        .help("Account password")
        .env("ITINERO_PASSWORD")
        .hide_env_values(true)
        .required(true)
}

fn new_password_arg() -> Arg {
    Arg::new("new-password")
        .long("new-password")
        .help("New password (4 to 100 characters)")
        .env("ITINERO_NEW_PASSWORD")
        .hide_env_values(true)
        .required(true)
}

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    Command::new("itinero")
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_required(true)
        .arg(
            Arg::new("api-url")
                .short('a')
                .long("api-url")
                .help("Base URL of the Itinero backend, example: https://itinero.tld:8080")
                .env("ITINERO_API_URL")
                .global(true)
                .required(false),
        )
        .arg(
            Arg::new("verbosity")
                .short('v')
                .long("verbose")
                .help("Verbosity level: ERROR, WARN, INFO, DEBUG, TRACE (default: ERROR)")
                .env("ITINERO_LOG_LEVEL")
                .global(true)
                .action(ArgAction::Count)
                .value_parser(validator_log_level()),
        )
        .subcommand(
            Command::new("login")
                .about("Log in and print the account profile")
                .arg(username_arg())
                .arg(password_arg())
                .arg(
                    Arg::new("remember-me")
                        .long("remember-me")
                        .help("Ask the backend for a long-lived session")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(Command::new("logout").about("Invalidate the backend session"))
        .subcommand(
            Command::new("register")
                .about("Register a new account")
                .arg(username_arg())
                .arg(password_arg())
                .arg(
                    Arg::new("email")
                        .short('e')
                        .long("email")
                        .help("E-mail address")
                        .required(true),
                )
                .arg(
                    Arg::new("first-name")
                        .long("first-name")
                        .help("First name"),
                )
                .arg(Arg::new("last-name").long("last-name").help("Last name"))
                .arg(
                    Arg::new("lang")
                        .long("lang")
                        .help("Language key, example: en, fr, zh-cn")
                        .default_value("en"),
                ),
        )
        .subcommand(
            Command::new("activate")
                .about("Activate a registered account")
                .arg(
                    Arg::new("key")
                        .short('k')
                        .long("key")
                        .help("Activation key from the registration e-mail")
                        .required(true),
                ),
        )
        .subcommand(
            Command::new("password-change")
                .about("Change the password of an existing account")
                .arg(username_arg())
                .arg(password_arg())
                .arg(new_password_arg()),
        )
        .subcommand(
            Command::new("password-reset-init")
                .about("Request a password-reset e-mail")
                .arg(
                    Arg::new("email")
                        .short('e')
                        .long("email")
                        .help("E-mail address of the account")
                        .required(true),
                ),
        )
        .subcommand(
            Command::new("password-reset-finish")
                .about("Set a new password with the key from the reset e-mail")
                .arg(
                    Arg::new("key")
                        .short('k')
                        .long("key")
                        .help("Reset key from the e-mail")
                        .required(true),
                )
                .arg(new_password_arg()),
        )
        .subcommand(
            Command::new("account")
                .about("Show or update the account profile")
                .arg(username_arg())
                .arg(password_arg())
                .arg(
                    Arg::new("first-name")
                        .long("first-name")
                        .help("New first name"),
                )
                .arg(Arg::new("last-name").long("last-name").help("New last name"))
                .arg(
                    Arg::new("lang")
                        .long("lang")
                        .help("New language key, example: en, fr, zh-cn"),
                ),
        )
}
