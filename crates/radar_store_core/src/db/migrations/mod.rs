//! Radar schema migrations.
//!
//! The registry is ordered by strictly increasing `version`. The newest
//! applied version is stored in `PRAGMA user_version`, and every pending
//! migration of one call runs inside a single transaction.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    sql: include_str!("0001_radar_schema.sql"),
}];

/// Newest schema version this build can create.
pub fn latest_version() -> u32 {
    newest(MIGRATIONS)
}

/// Schema version recorded in the connected database.
pub fn current_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}

/// Brings the radar schema up to [`latest_version`].
///
/// Returns the versions applied by this call, oldest first; empty when the
/// schema was already current.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<Vec<u32>> {
    apply_pending(conn, MIGRATIONS)
}

fn newest(registry: &[Migration]) -> u32 {
    registry.last().map_or(0, |migration| migration.version)
}

fn apply_pending(conn: &mut Connection, registry: &[Migration]) -> DbResult<Vec<u32>> {
    let from = current_version(conn)?;
    let latest_supported = newest(registry);
    if from > latest_supported {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from,
            latest_supported,
        });
    }

    let pending: Vec<&Migration> = registry.iter().filter(|m| m.version > from).collect();
    if pending.is_empty() {
        return Ok(Vec::new());
    }

    let tx = conn.transaction()?;
    for migration in &pending {
        let version = migration.version;
        let failed = |source| DbError::Migration { version, source };
        tx.execute_batch(migration.sql).map_err(failed)?;
        tx.pragma_update(None, "user_version", version)
            .map_err(failed)?;
    }
    tx.commit()?;

    let applied: Vec<u32> = pending.iter().map(|m| m.version).collect();
    info!(
        "event=db_migrate module=db status=ok from={from} to={latest_supported} applied={applied:?}"
    );
    Ok(applied)
}
