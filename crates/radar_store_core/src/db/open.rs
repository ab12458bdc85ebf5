//! Connection bootstrap for radar databases.

use super::migrations::apply_migrations;
use super::{DbError, DbResult, OpenStage};
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

/// How long a connection waits on a locked database before failing.
pub const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens (or creates) a radar database file and applies pending migrations.
///
/// # Side effects
/// - Emits `db_open` events with mode, applied migrations and duration.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    open_with("file", || Connection::open(path))
}

/// Opens a fresh in-memory radar database with the full schema applied.
pub fn open_db_in_memory() -> DbResult<Connection> {
    open_with("memory", Connection::open_in_memory)
}

fn open_with(
    mode: &'static str,
    connect: impl FnOnce() -> rusqlite::Result<Connection>,
) -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode={mode}");

    let opened = connect()
        .map_err(at_stage(OpenStage::Connect))
        .and_then(|mut conn| {
            let applied = configure(&mut conn)?;
            Ok((conn, applied))
        });

    match opened {
        Ok((conn, applied)) => {
            info!(
                "event=db_open module=db status=ok mode={mode} migrated={applied:?} duration_ms={}",
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={mode} duration_ms={} error_code={} error={err}",
                started_at.elapsed().as_millis(),
                err.code()
            );
            Err(err)
        }
    }
}

// Returns the migration versions applied on this open.
fn configure(conn: &mut Connection) -> DbResult<Vec<u32>> {
    conn.pragma_update(None, "foreign_keys", true)
        .map_err(at_stage(OpenStage::ForeignKeys))?;
    conn.busy_timeout(BUSY_TIMEOUT)
        .map_err(at_stage(OpenStage::BusyTimeout))?;
    apply_migrations(conn)
}

fn at_stage(stage: OpenStage) -> impl FnOnce(rusqlite::Error) -> DbError {
    move |source| DbError::Open { stage, source }
}
