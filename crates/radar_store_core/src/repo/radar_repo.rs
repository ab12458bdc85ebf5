//! Radar repository contract and provider-backed implementation.
//!
//! # Responsibility
//! - Offer ordered and scoped radar listings plus single and batch writes.
//! - Translate rows from the provider's tabular results into read models.
//!
//! # Invariants
//! - Batch writes build every statement before executing any; a translation
//!   error aborts the batch with nothing sent to storage.
//! - Empty batches succeed without reaching the provider.
//! - Reads reject invalid persisted state instead of masking it.

use super::error::{RepoError, RepoResult};
use super::provider::{ExecutionProvider, ResultRow, SqliteProvider, Statement};
use super::query::{self, SortField, RADAR_COLUMNS};
use super::statement::{
    build_delete, build_label_name_update, build_label_view_update, build_upsert,
};
use crate::db::migrations::{current_version, latest_version};
use crate::model::radar::{
    ConnectionMode, Direction, Radar, RadarId, RadarLabelNames, RadarRecord, RadarWrite,
};
use log::{debug, error, info, warn};
use rusqlite::Connection;
use std::time::Instant;

/// Repository interface for radar configuration records.
pub trait RadarRepository {
    /// Lists radars under one shiploader (`0` = all), ordered by `sort_field`
    /// when it is non-blank.
    fn list_radars(&self, shiploader_id: i64, sort_field: &str) -> RepoResult<Vec<RadarRecord>>;

    /// Lists the label-name projection, ordered by `sort_field` when non-blank.
    fn list_label_names(&self, sort_field: &str) -> RepoResult<Vec<RadarLabelNames>>;

    /// Deletes one radar; returns the number of removed rows.
    fn delete_radar(&self, id: i64) -> RepoResult<usize>;

    /// Inserts a new radar or updates an existing one.
    fn save_radar(&self, radar: &Radar) -> RepoResult<usize>;

    /// Saves all radars in one transaction; `true` only on commit.
    fn save_radars(&self, radars: &[Radar]) -> RepoResult<bool>;

    /// Saves the label names of persisted radars in one transaction.
    fn save_radar_label_names(&self, radars: &[Radar]) -> RepoResult<bool>;

    /// Saves edited label-name projections in one transaction.
    fn save_label_names(&self, labels: &[RadarLabelNames]) -> RepoResult<bool>;

    fn list_all_radars(&self, sort_field: &str) -> RepoResult<Vec<RadarRecord>> {
        self.list_radars(0, sort_field)
    }

    fn list_all_by_id(&self) -> RepoResult<Vec<RadarRecord>> {
        self.list_all_radars(SortField::ID.column())
    }

    fn list_all_by_name(&self) -> RepoResult<Vec<RadarRecord>> {
        self.list_all_radars(SortField::NAME.column())
    }

    fn list_by_shiploader_id(&self, shiploader_id: i64) -> RepoResult<Vec<RadarRecord>> {
        self.list_radars(shiploader_id, SortField::ID.column())
    }

    fn list_label_names_by_id(&self) -> RepoResult<Vec<RadarLabelNames>> {
        self.list_label_names(SortField::ID.column())
    }
}

/// Radar repository over any `ExecutionProvider`.
pub struct SqlRadarRepository<P> {
    provider: P,
}

/// Radar repository over a borrowed SQLite connection.
pub type SqliteRadarRepository<'conn> = SqlRadarRepository<SqliteProvider<'conn>>;

impl<P: ExecutionProvider> SqlRadarRepository<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    fn run_query<T>(
        &self,
        statement: &Statement,
        decode: impl Fn(ResultRow<'_>) -> RepoResult<T>,
    ) -> RepoResult<Vec<T>> {
        let started_at = Instant::now();
        let result = self.provider.query(statement).map_err(|err| {
            error!("event=radar_query module=repo status=error error={err}");
            err
        })?;
        let items = result.rows().map(decode).collect::<RepoResult<Vec<T>>>()?;
        debug!(
            "event=radar_query module=repo status=ok rows={} duration_ms={}",
            items.len(),
            started_at.elapsed().as_millis()
        );
        Ok(items)
    }

    fn run_batch<T>(
        &self,
        kind: &'static str,
        items: &[T],
        build: impl Fn(&T) -> RepoResult<Statement>,
    ) -> RepoResult<bool> {
        if items.is_empty() {
            debug!("event=radar_batch module=repo kind={kind} status=skipped reason=empty");
            return Ok(true);
        }

        let statements = items
            .iter()
            .map(build)
            .collect::<RepoResult<Vec<_>>>()
            .map_err(|err| {
                warn!("event=radar_batch module=repo kind={kind} status=rejected error={err}");
                err
            })?;

        let started_at = Instant::now();
        let committed = self.provider.execute_transactional(&statements)?;
        if committed {
            info!(
                "event=radar_batch module=repo kind={kind} status=committed total={} duration_ms={}",
                statements.len(),
                started_at.elapsed().as_millis()
            );
        } else {
            warn!(
                "event=radar_batch module=repo kind={kind} status=rolled_back total={}",
                statements.len()
            );
        }
        Ok(committed)
    }
}

impl<'conn> SqlRadarRepository<SqliteProvider<'conn>> {
    /// Creates a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_radar_connection_ready(conn)?;
        Ok(Self::new(SqliteProvider::new(conn)))
    }
}

impl<P: ExecutionProvider> RadarRepository for SqlRadarRepository<P> {
    fn list_radars(&self, shiploader_id: i64, sort_field: &str) -> RepoResult<Vec<RadarRecord>> {
        let sort = SortField::parse(sort_field)?;
        self.run_query(&query::list_radars(shiploader_id, sort), parse_radar_record)
    }

    fn list_label_names(&self, sort_field: &str) -> RepoResult<Vec<RadarLabelNames>> {
        let sort = SortField::parse(sort_field)?;
        self.run_query(&query::list_label_names(sort), parse_label_names)
    }

    fn delete_radar(&self, id: i64) -> RepoResult<usize> {
        let Some(id) = RadarId::new(id) else {
            debug!("event=radar_write module=repo op=delete status=skipped id={id}");
            return Ok(0);
        };
        let changed = self.provider.execute(&build_delete(id)).map_err(|err| {
            error!("event=radar_write module=repo op=delete status=error id={id} error={err}");
            err
        })?;
        info!("event=radar_write module=repo op=delete status=ok id={id} changed={changed}");
        Ok(changed)
    }

    fn save_radar(&self, radar: &Radar) -> RepoResult<usize> {
        let write = RadarWrite::for_radar(radar);
        let op = match write {
            RadarWrite::NewRecord(_) => "insert",
            RadarWrite::ExistingRecord { .. } => "update",
        };
        let statement = build_upsert(write)?;
        let changed = self.provider.execute(&statement).map_err(|err| {
            error!("event=radar_write module=repo op={op} status=error error={err}");
            err
        })?;
        info!("event=radar_write module=repo op={op} status=ok changed={changed}");
        Ok(changed)
    }

    fn save_radars(&self, radars: &[Radar]) -> RepoResult<bool> {
        self.run_batch("full", radars, |radar| {
            build_upsert(RadarWrite::for_radar(radar))
        })
    }

    fn save_radar_label_names(&self, radars: &[Radar]) -> RepoResult<bool> {
        self.run_batch("label_names", radars, build_label_name_update)
    }

    fn save_label_names(&self, labels: &[RadarLabelNames]) -> RepoResult<bool> {
        self.run_batch("label_view", labels, |row| Ok(build_label_view_update(row)))
    }
}

fn parse_radar_record(row: ResultRow<'_>) -> RepoResult<RadarRecord> {
    let id = parse_radar_id(&row)?;

    let conn_mode_id = row.integer("conn_mode_id")?;
    let connection_mode = ConnectionMode::from_db(conn_mode_id).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid connection mode `{conn_mode_id}` for radar {id}"))
    })?;

    let direction_id = row.integer("direction_id")?;
    let direction = Direction::from_db(direction_id).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid direction `{direction_id}` for radar {id}"))
    })?;

    let using_local = match row.integer("using_local")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid using_local value `{other}` for radar {id}"
            )));
        }
    };

    let radar = Radar {
        id: Some(id),
        name: row.text("radar_name")?,
        ip_address: row.text("ip_address")?,
        port: parse_port(&row, "port")?,
        owner_group_id: row.optional_integer("owner_group_id")?,
        connection_mode,
        using_local,
        ip_address_local: row.text("ip_address_local")?,
        port_local: parse_port(&row, "port_local")?,
        degree_xoy: row.real("degree_xoy")?,
        degree_yoz: row.real("degree_yoz")?,
        degree_xoz: row.real("degree_xoz")?,
        degree_general: row.real("degree_general")?,
        direction,
        defense_mode: row.integer("defense_mode_id")?,
        offset: row.real("offset")?,
        remark: row.text("remark")?,
        item_name_radar_state: row.text("item_name_radar_state")?,
        item_name_collision_state: row.text("item_name_collision_state")?,
        item_name_collision_state_2: row.text("item_name_collision_state_2")?,
    };

    Ok(RadarRecord {
        radar,
        group_type: row.optional_integer("group_type")?,
    })
}

fn parse_label_names(row: ResultRow<'_>) -> RepoResult<RadarLabelNames> {
    Ok(RadarLabelNames {
        id: parse_radar_id(&row)?,
        name: row.text("radar_name")?,
        address: row.text("address")?,
        item_name_radar_state: row.text("item_name_radar_state")?,
        item_name_collision_state: row.text("item_name_collision_state")?,
        item_name_collision_state_2: row.text("item_name_collision_state_2")?,
    })
}

fn parse_radar_id(row: &ResultRow<'_>) -> RepoResult<RadarId> {
    let value = row.integer("radar_id")?;
    RadarId::new(value)
        .ok_or_else(|| RepoError::InvalidData(format!("invalid radar_id value `{value}`")))
}

fn parse_port(row: &ResultRow<'_>, column: &str) -> RepoResult<u16> {
    let value = row.integer(column)?;
    u16::try_from(value)
        .map_err(|_| RepoError::InvalidData(format!("`{column}` out of port range: {value}")))
}

fn ensure_radar_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let required: [(&'static str, &[&'static str]); 3] = [
        ("t_base_radar_info", RADAR_COLUMNS),
        (
            "t_base_radargroup_info",
            &["group_id", "group_type", "owner_shiploader_id"],
        ),
        ("t_base_shiploader_info", &["shiploader_id"]),
    ];
    for (table, columns) in required {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
        for &column in columns {
            if !table_has_column(conn, table, column)? {
                return Err(RepoError::MissingRequiredColumn { table, column });
            }
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM pragma_table_info(?1)
            WHERE name = ?2
        );",
        [table, column],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
