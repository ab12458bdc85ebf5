//! Embedded SQLite storage for radar configuration.
//!
//! Connections handed out by [`open_db`] and [`open_db_in_memory`] enforce
//! foreign keys, wait [`BUSY_TIMEOUT`] on a locked file and carry the radar
//! schema at [`migrations::latest_version`].

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory, BUSY_TIMEOUT};

pub type DbResult<T> = Result<T, DbError>;

/// Connection bootstrap step, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenStage {
    Connect,
    ForeignKeys,
    BusyTimeout,
}

impl OpenStage {
    fn as_str(self) -> &'static str {
        match self {
            Self::Connect => "connect",
            Self::ForeignKeys => "foreign_keys",
            Self::BusyTimeout => "busy_timeout",
        }
    }
}

/// Radar storage failure.
#[derive(Debug)]
pub enum DbError {
    /// A bootstrap step failed before any migration ran.
    Open {
        stage: OpenStage,
        source: rusqlite::Error,
    },
    /// Migration `version` failed; the recorded schema version is unchanged.
    Migration {
        version: u32,
        source: rusqlite::Error,
    },
    /// The file was written by a newer build of the radar store.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    /// Engine error while running radar statements.
    Sqlite(rusqlite::Error),
}

impl DbError {
    /// Stable `error_code` value for `db_*` log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Open {
                stage: OpenStage::Connect,
                ..
            } => "db_connect_failed",
            Self::Open { .. } => "db_configure_failed",
            Self::Migration { .. } => "db_migration_failed",
            Self::UnsupportedSchemaVersion { .. } => "db_schema_too_new",
            Self::Sqlite(_) => "db_sqlite_error",
        }
    }
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open { stage, source } => {
                write!(f, "radar database {} step failed: {source}", stage.as_str())
            }
            Self::Migration { version, source } => {
                write!(f, "radar schema migration {version} failed: {source}")
            }
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "radar database schema version {db_version} is newer than supported {latest_supported}"
            ),
            Self::Sqlite(err) => write!(f, "sqlite error: {err}"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Open { source, .. } | Self::Migration { source, .. } => Some(source),
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
