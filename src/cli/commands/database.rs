use crate::db::DbConfig;
use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command};
use secrecy::SecretString;
use std::time::Duration;

pub const ARG_DB_HOST: &str = "db-host";
pub const ARG_DB_PORT: &str = "db-port";
pub const ARG_DB_USER: &str = "db-user";
pub const ARG_DB_PASS: &str = "db-pass";
pub const ARG_DB_DATABASE: &str = "db-database";
pub const ARG_DB_TIMEOUT: &str = "db-timeout";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_DB_HOST)
                .long(ARG_DB_HOST)
                .help("MySQL host")
                .env("DB_HOST")
                .required(true),
        )
        .arg(
            Arg::new(ARG_DB_PORT)
                .long(ARG_DB_PORT)
                .help("MySQL port")
                .env("DB_PORT")
                .default_value("3306")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new(ARG_DB_USER)
                .long(ARG_DB_USER)
                .help("MySQL user")
                .env("DB_USER")
                .required(true),
        )
        .arg(
            Arg::new(ARG_DB_PASS)
                .long(ARG_DB_PASS)
                .help("MySQL password")
                .env("DB_PASS")
                .hide_env_values(true)
                .required(true),
        )
        .arg(
            Arg::new(ARG_DB_DATABASE)
                .long(ARG_DB_DATABASE)
                .help("MySQL database (schema) holding the event procedures")
                .env("DB_DATABASE")
                .required(true),
        )
        .arg(
            Arg::new(ARG_DB_TIMEOUT)
                .long(ARG_DB_TIMEOUT)
                .help("Seconds allowed for connecting and running one procedure")
                .env("DB_TIMEOUT")
                .default_value("30")
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
}

/// Build the database configuration from parsed arguments.
///
/// # Errors
/// Returns an error if a required argument is missing.
pub fn config(matches: &ArgMatches) -> Result<DbConfig> {
    let string = |id: &str| -> Result<String> {
        matches
            .get_one::<String>(id)
            .cloned()
            .with_context(|| format!("missing required argument: --{id}"))
    };

    Ok(DbConfig {
        host: string(ARG_DB_HOST)?,
        port: matches.get_one::<u16>(ARG_DB_PORT).copied().unwrap_or(3306),
        user: string(ARG_DB_USER)?,
        password: SecretString::from(string(ARG_DB_PASS)?),
        database: string(ARG_DB_DATABASE)?,
        timeout: Duration::from_secs(
            matches.get_one::<u64>(ARG_DB_TIMEOUT).copied().unwrap_or(30),
        ),
    })
}
