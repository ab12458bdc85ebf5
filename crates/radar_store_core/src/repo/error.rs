use crate::db::DbError;
use crate::model::radar::RadarValidationError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Errors from radar statement building, execution and row decoding.
#[derive(Debug)]
pub enum RepoError {
    /// Radar failed domain validation before any statement was built.
    Validation(RadarValidationError),
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Label-name updates require a persisted radar.
    MissingIdentity,
    /// Sort field does not name a radar column.
    UnknownSortField(String),
    /// Result set lacks a column the decoder needs.
    MissingColumn(String),
    /// Persisted data cannot be converted to a valid read model.
    InvalidData(String),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::MissingIdentity => write!(f, "radar has no identity; save it first"),
            Self::UnknownSortField(field) => {
                write!(f, "`{field}` is not a sortable radar column")
            }
            Self::MissingColumn(column) => write!(f, "result set has no column `{column}`"),
            Self::InvalidData(message) => write!(f, "invalid persisted radar data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "radar repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "radar repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "radar repository requires column `{column}` in table `{table}`"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RadarValidationError> for RepoError {
    fn from(value: RadarValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}
