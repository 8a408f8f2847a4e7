//! Database boundary.
//!
//! The service never talks SQL beyond `CALL`: every endpoint maps to exactly
//! one stored procedure. [`EventDatabase`] is the seam between the HTTP layer
//! and MySQL so handlers can be exercised without a server.

pub mod mysql;

pub use self::mysql::MySqlDatabase;

use async_trait::async_trait;
use secrecy::SecretString;
use serde_json::{Map, Value};
use std::{fmt, time::Duration};
use thiserror::Error;

/// One decoded procedure row, columns kept in result-set order.
pub type ProcedureRow = Map<String, Value>;

/// Connection settings, built once at startup and shared read-only.
#[derive(Clone)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: SecretString,
    pub database: String,
    /// Upper bound for connect + call of a single request.
    pub timeout: Duration,
}

impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"***")
            .field("database", &self.database)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum DbError {
    #[error("{0}")]
    Connect(#[source] sqlx::Error),

    #[error("{0}")]
    Query(#[source] sqlx::Error),

    #[error("unable to decode column `{column}` of type {type_name}: {source}")]
    Decode {
        column: String,
        type_name: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("database call timed out after {0:?}")]
    Timeout(Duration),
}

/// Positional stored procedure argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Param {
    Int(i64),
    Text(String),
    Null,
}

impl From<i64> for Param {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for Param {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<Option<&str>> for Param {
    fn from(value: Option<&str>) -> Self {
        value.map_or(Self::Null, Self::from)
    }
}

#[async_trait]
pub trait EventDatabase: Send + Sync {
    /// Open (and drop) a connection to prove the database is reachable.
    async fn ping(&self) -> Result<(), DbError>;

    /// Run `CALL procedure(params...)` and return the first row, if any.
    async fn call(&self, procedure: &str, params: &[Param])
        -> Result<Option<ProcedureRow>, DbError>;
}

/// `CALL name(?, ?, ...)` with one placeholder per parameter.
#[must_use]
pub fn call_statement(procedure: &str, arity: usize) -> String {
    let placeholders = vec!["?"; arity].join(", ");
    format!("CALL {procedure}({placeholders})")
}
