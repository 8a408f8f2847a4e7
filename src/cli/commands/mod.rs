pub mod database;
pub mod logging;

use clap::{
    builder::styling::{AnsiColor, Effects, Styles},
    Arg, ColorChoice, Command,
};

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

    let command = Command::new("events-api")
        .about("HTTP API for event stored procedures")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .help("Port to listen on")
                .default_value("8080")
                .env("EVENTS_API_PORT")
                .value_parser(clap::value_parser!(u16)),
        );

    let command = database::with_args(command);
    logging::with_args(command)
}

#[cfg(test)]
mod tests {
    use super::database::{ARG_DB_DATABASE, ARG_DB_HOST, ARG_DB_PORT, ARG_DB_TIMEOUT};
    use super::*;

    const DB_ENV: [(&str, Option<&str>); 4] = [
        ("DB_HOST", Some("mysql.internal")),
        ("DB_USER", Some("events")),
        ("DB_PASS", Some("secret")),
        ("DB_DATABASE", Some("events")),
    ];

    #[test]
    fn test_new() {
        let command = new();

        assert_eq!(command.get_name(), "events-api");
        assert_eq!(
            command.get_about().map(ToString::to_string),
            Some("HTTP API for event stored procedures".to_string())
        );
        assert_eq!(
            command.get_version().map(ToString::to_string),
            Some(env!("CARGO_PKG_VERSION").to_string())
        );
    }

    #[test]
    fn test_check_port_and_database() {
        temp_env::with_var_unset("DB_TIMEOUT", || {
            let command = new();
            let matches = command.get_matches_from(vec![
                "events-api",
                "--port",
                "9090",
                "--db-host",
                "localhost",
                "--db-port",
                "3307",
                "--db-user",
                "root",
                "--db-pass",
                "password123",
                "--db-database",
                "events",
            ]);

            assert_eq!(matches.get_one::<u16>("port").copied(), Some(9090));
            assert_eq!(
                matches.get_one::<String>(ARG_DB_HOST).cloned(),
                Some("localhost".to_string())
            );
            assert_eq!(matches.get_one::<u16>(ARG_DB_PORT).copied(), Some(3307));
            assert_eq!(
                matches.get_one::<String>(ARG_DB_DATABASE).cloned(),
                Some("events".to_string())
            );
            assert_eq!(matches.get_one::<u64>(ARG_DB_TIMEOUT).copied(), Some(30));
        });
    }

    #[test]
    fn test_check_env() {
        temp_env::with_vars(
            [
                DB_ENV[0],
                DB_ENV[1],
                DB_ENV[2],
                DB_ENV[3],
                ("EVENTS_API_PORT", Some("443")),
                ("DB_TIMEOUT", Some("5")),
                ("EVENTS_API_LOG_LEVEL", Some("info")),
            ],
            || {
                let command = new();
                let matches = command.get_matches_from(vec!["events-api"]);
                assert_eq!(matches.get_one::<u16>("port").copied(), Some(443));
                assert_eq!(
                    matches.get_one::<String>(ARG_DB_HOST).cloned(),
                    Some("mysql.internal".to_string())
                );
                assert_eq!(matches.get_one::<u64>(ARG_DB_TIMEOUT).copied(), Some(5));
                assert_eq!(
                    matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                    Some(2)
                );
            },
        );
    }

    #[test]
    fn test_missing_database_settings() {
        temp_env::with_vars(
            [
                ("DB_HOST", None::<&str>),
                ("DB_USER", None),
                ("DB_PASS", None),
                ("DB_DATABASE", None),
            ],
            || {
                let result = new().try_get_matches_from(vec!["events-api"]);
                assert!(result.is_err());
            },
        );
    }

    #[test]
    fn test_check_log_level_env() {
        // loop cover all possible value_parse
        let levels = ["error", "warn", "info", "debug", "trace"];
        for (index, &level) in levels.iter().enumerate() {
            temp_env::with_vars(
                [
                    DB_ENV[0],
                    DB_ENV[1],
                    DB_ENV[2],
                    DB_ENV[3],
                    ("EVENTS_API_LOG_LEVEL", Some(level)),
                ],
                || {
                    let command = new();
                    let matches = command.get_matches_from(vec!["events-api"]);
                    assert_eq!(
                        matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                        u8::try_from(index).ok()
                    );
                },
            );
        }
    }

    #[test]
    fn test_check_log_level_verbosity() {
        for index in 0..5 {
            temp_env::with_vars(
                [
                    DB_ENV[0],
                    DB_ENV[1],
                    DB_ENV[2],
                    DB_ENV[3],
                    ("EVENTS_API_LOG_LEVEL", None),
                ],
                || {
                    let mut args = vec!["events-api".to_string()];

                    // Add the appropriate number of "-v" flags based on the index
                    if index > 0 {
                        args.push(format!("-{}", "v".repeat(index)));
                    }

                    let matches = new().get_matches_from(args);

                    assert_eq!(
                        matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                        u8::try_from(index).ok()
                    );
                },
            );
        }
    }
}
