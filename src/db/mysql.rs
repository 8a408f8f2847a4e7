use super::{call_statement, DbConfig, DbError, EventDatabase, Param, ProcedureRow};
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use secrecy::ExposeSecret;
use serde_json::{Number, Value};
use sqlx::{
    mysql::{MySqlConnectOptions, MySqlConnection, MySqlRow},
    Column, Connection, Row, TypeInfo, ValueRef,
};
use std::future::Future;
use tracing::{debug, error, info_span, warn, Instrument};

/// Opens a fresh connection for every call; nothing is pooled or cached.
#[derive(Debug, Clone)]
pub struct MySqlDatabase {
    config: DbConfig,
    options: MySqlConnectOptions,
}

impl MySqlDatabase {
    #[must_use]
    pub fn new(config: DbConfig) -> Self {
        let options = MySqlConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(config.password.expose_secret())
            .database(&config.database);

        Self { config, options }
    }

    async fn connect(&self) -> Result<MySqlConnection, DbError> {
        let span = info_span!(
            "db.connect",
            db.system = "mysql",
            db.operation = "CONNECT",
            db.name = %self.config.database
        );
        async {
            let mut conn = MySqlConnection::connect_with(&self.options)
                .await
                .map_err(|err| {
                    error!("Error while connecting to MySQL: {}", err);
                    DbError::Connect(err)
                })?;

            // Every procedure call is its own unit of work.
            if let Err(err) = sqlx::query("SET autocommit = 1").execute(&mut conn).await {
                error!("Error enabling autocommit: {}", err);
                close(conn).await;
                return Err(DbError::Connect(err));
            }

            Ok(conn)
        }
        .instrument(span)
        .await
    }

    async fn bounded<T, F>(&self, fut: F) -> Result<T, DbError>
    where
        F: Future<Output = Result<T, DbError>>,
    {
        tokio::time::timeout(self.config.timeout, fut)
            .await
            .map_err(|_| {
                error!("Database call exceeded {:?}", self.config.timeout);
                DbError::Timeout(self.config.timeout)
            })?
    }
}

#[async_trait]
impl EventDatabase for MySqlDatabase {
    async fn ping(&self) -> Result<(), DbError> {
        self.bounded(async {
            let conn = self.connect().await?;
            close(conn).await;
            Ok(())
        })
        .await
    }

    async fn call(
        &self,
        procedure: &str,
        params: &[Param],
    ) -> Result<Option<ProcedureRow>, DbError> {
        self.bounded(async {
            let mut conn = self.connect().await?;
            let result = call_procedure(&mut conn, procedure, params).await;
            close(conn).await;
            result
        })
        .await
    }
}

async fn call_procedure(
    conn: &mut MySqlConnection,
    procedure: &str,
    params: &[Param],
) -> Result<Option<ProcedureRow>, DbError> {
    let statement = call_statement(procedure, params.len());
    let span = info_span!(
        "db.call",
        db.system = "mysql",
        db.operation = "CALL",
        db.statement = %statement
    );

    let mut query = sqlx::query(&statement);
    for param in params {
        query = match param {
            Param::Int(value) => query.bind(*value),
            Param::Text(value) => query.bind(value.clone()),
            Param::Null => query.bind(None::<String>),
        };
    }

    let row = query
        .fetch_optional(&mut *conn)
        .instrument(span)
        .await
        .map_err(|err| {
            error!("Error calling {}: {}", procedure, err);
            DbError::Query(err)
        })?;

    debug!(procedure, found = row.is_some(), "procedure returned");

    row.as_ref().map(decode_row).transpose()
}

async fn close(conn: MySqlConnection) {
    if let Err(err) = conn.close().await {
        warn!("Error closing MySQL connection: {}", err);
    }
}

/// Decode every column of `row` into JSON according to its MySQL type.
fn decode_row(row: &MySqlRow) -> Result<ProcedureRow, DbError> {
    let mut decoded = ProcedureRow::new();

    for (index, column) in row.columns().iter().enumerate() {
        let type_name = column.type_info().name();
        let value = decode_column(row, index, type_name).map_err(|source| DbError::Decode {
            column: column.name().to_string(),
            type_name: type_name.to_string(),
            source,
        })?;
        decoded.insert(column.name().to_string(), value);
    }

    Ok(decoded)
}

fn decode_column(row: &MySqlRow, index: usize, type_name: &str) -> Result<Value, sqlx::Error> {
    if row.try_get_raw(index)?.is_null() {
        return Ok(Value::Null);
    }

    let value = match type_name {
        "BOOLEAN" => Value::Bool(row.try_get::<bool, _>(index)?),
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" => {
            Value::from(row.try_get::<i64, _>(index)?)
        }
        "TINYINT UNSIGNED" | "SMALLINT UNSIGNED" | "MEDIUMINT UNSIGNED" | "INT UNSIGNED"
        | "BIGINT UNSIGNED" => Value::from(row.try_get::<u64, _>(index)?),
        "FLOAT" => float(f64::from(row.try_get::<f32, _>(index)?)),
        "DOUBLE" => float(row.try_get::<f64, _>(index)?),
        // Temporal values come binary encoded, render them as ISO-8601.
        "DATE" => Value::String(row.try_get::<NaiveDate, _>(index)?.to_string()),
        "DATETIME" | "TIMESTAMP" => {
            Value::String(iso_datetime(&row.try_get::<NaiveDateTime, _>(index)?))
        }
        "TIME" => Value::String(iso_time(&row.try_get::<NaiveTime, _>(index)?)),
        "YEAR" => Value::from(row.try_get_unchecked::<u16, _>(index)?),
        // Text, JSON and DECIMAL all arrive as character data.
        _ => Value::String(row.try_get_unchecked::<String, _>(index)?),
    };

    Ok(value)
}

fn iso_datetime(value: &NaiveDateTime) -> String {
    if value.nanosecond() == 0 {
        value.format("%Y-%m-%dT%H:%M:%S").to_string()
    } else {
        value.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
    }
}

fn iso_time(value: &NaiveTime) -> String {
    if value.nanosecond() == 0 {
        value.format("%H:%M:%S").to_string()
    } else {
        value.format("%H:%M:%S%.6f").to_string()
    }
}

fn float(value: f64) -> Value {
    Number::from_f64(value).map_or(Value::Null, Value::Number)
}
