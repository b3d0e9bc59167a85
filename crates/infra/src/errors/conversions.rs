//! Conversions from external infrastructure errors into domain errors.

use palco_domain::PalcoError;
use reqwest::Error as HttpError;
use rusqlite::Error as SqlError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub PalcoError);

impl From<InfraError> for PalcoError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<PalcoError> for InfraError {
    fn from(value: PalcoError) -> Self {
        InfraError(value)
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → PalcoError */
/* -------------------------------------------------------------------------- */

impl From<HttpError> for InfraError {
    fn from(err: HttpError) -> Self {
        let message = if err.is_timeout() {
            format!("http request timed out: {err}")
        } else if err.is_connect() {
            format!("http connection failed: {err}")
        } else if err.is_decode() {
            // A response that cannot be decoded is a malformed payload, not
            // a connectivity problem, but it still came off the wire.
            format!("http response could not be decoded: {err}")
        } else {
            format!("http request failed: {err}")
        };
        InfraError(PalcoError::Network(message))
    }
}

/* -------------------------------------------------------------------------- */
/* rusqlite::Error → PalcoError */
/* -------------------------------------------------------------------------- */

impl From<SqlError> for InfraError {
    fn from(err: SqlError) -> Self {
        use rusqlite::Error as RE;

        let mapped = match err {
            RE::QueryReturnedNoRows => PalcoError::NotFound("no rows returned by query".into()),
            RE::SqliteFailure(code, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                PalcoError::Cache(format!(
                    "sqlite failure {:?} (code {}): {}",
                    code.code, code.extended_code, message
                ))
            }
            RE::FromSqlConversionFailure(_, _, cause) => {
                PalcoError::Cache(format!("failed to convert sqlite value: {cause}"))
            }
            RE::InvalidColumnType(_, _, ty) => {
                PalcoError::Cache(format!("invalid column type: {ty}"))
            }
            other => PalcoError::Cache(other.to_string()),
        };
        InfraError(mapped)
    }
}

/* -------------------------------------------------------------------------- */
/* r2d2::Error → PalcoError */
/* -------------------------------------------------------------------------- */

impl From<r2d2::Error> for InfraError {
    fn from(err: r2d2::Error) -> Self {
        InfraError(PalcoError::Cache(format!("connection pool error: {err}")))
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error → PalcoError */
/* -------------------------------------------------------------------------- */

impl From<serde_json::Error> for InfraError {
    fn from(err: serde_json::Error) -> Self {
        InfraError(PalcoError::Internal(format!("serialization failed: {err}")))
    }
}
