//! Write statement building for radar rows.
//!
//! # Invariants
//! - Radars are validated before any statement is produced.
//! - `NewRecord` always yields an INSERT and `ExistingRecord` an UPDATE keyed
//!   on its id; the id sign is never consulted.
//! - Text is bound, never interpolated; booleans bind as `0`/`1`.

use super::error::{RepoError, RepoResult};
use super::provider::Statement;
use crate::model::radar::{Radar, RadarId, RadarLabelNames, RadarWrite};
use rusqlite::types::Value;

const INSERT_RADAR_SQL: &str = "INSERT INTO t_base_radar_info (
    radar_name,
    ip_address,
    port,
    owner_group_id,
    conn_mode_id,
    using_local,
    ip_address_local,
    port_local,
    degree_xoy,
    degree_yoz,
    degree_xoz,
    degree_general,
    direction_id,
    defense_mode_id,
    \"offset\",
    remark
) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16);";

const UPDATE_RADAR_SQL: &str = "UPDATE t_base_radar_info
SET
    radar_name = ?1,
    ip_address = ?2,
    port = ?3,
    owner_group_id = ?4,
    conn_mode_id = ?5,
    using_local = ?6,
    ip_address_local = ?7,
    port_local = ?8,
    degree_xoy = ?9,
    degree_yoz = ?10,
    degree_xoz = ?11,
    degree_general = ?12,
    direction_id = ?13,
    defense_mode_id = ?14,
    \"offset\" = ?15,
    remark = ?16
WHERE radar_id = ?17;";

const UPDATE_LABEL_NAMES_SQL: &str = "UPDATE t_base_radar_info
SET
    item_name_radar_state = ?1,
    item_name_collision_state = ?2,
    item_name_collision_state_2 = ?3
WHERE radar_id = ?4;";

const DELETE_RADAR_SQL: &str = "DELETE FROM t_base_radar_info WHERE radar_id = ?1;";

/// Builds the INSERT or UPDATE for one radar write request.
pub fn build_upsert(write: RadarWrite<'_>) -> RepoResult<Statement> {
    let radar = write.radar();
    radar.validate()?;

    let mut params = writable_values(radar);
    match write {
        RadarWrite::NewRecord(_) => Ok(Statement::new(INSERT_RADAR_SQL, params)),
        RadarWrite::ExistingRecord { id, .. } => {
            params.push(Value::Integer(id.get()));
            Ok(Statement::new(UPDATE_RADAR_SQL, params))
        }
    }
}

/// Builds the label-name UPDATE for an already persisted radar.
pub fn build_label_name_update(radar: &Radar) -> RepoResult<Statement> {
    let id = radar.id.ok_or(RepoError::MissingIdentity)?;
    Ok(label_update(
        id,
        [
            &radar.item_name_radar_state,
            &radar.item_name_collision_state,
            &radar.item_name_collision_state_2,
        ],
    ))
}

/// Builds the label-name UPDATE from the label-name projection itself.
pub fn build_label_view_update(labels: &RadarLabelNames) -> Statement {
    label_update(
        labels.id,
        [
            &labels.item_name_radar_state,
            &labels.item_name_collision_state,
            &labels.item_name_collision_state_2,
        ],
    )
}

fn label_update(id: RadarId, [radar_state, collision, collision_2]: [&String; 3]) -> Statement {
    Statement::new(
        UPDATE_LABEL_NAMES_SQL,
        vec![
            Value::Text(radar_state.clone()),
            Value::Text(collision.clone()),
            Value::Text(collision_2.clone()),
            Value::Integer(id.get()),
        ],
    )
}

pub fn build_delete(id: RadarId) -> Statement {
    Statement::new(DELETE_RADAR_SQL, vec![Value::Integer(id.get())])
}

fn writable_values(radar: &Radar) -> Vec<Value> {
    vec![
        Value::Text(radar.name.clone()),
        Value::Text(radar.ip_address.clone()),
        Value::Integer(i64::from(radar.port)),
        radar.owner_group_id.map_or(Value::Null, Value::Integer),
        Value::Integer(radar.connection_mode.to_db()),
        Value::Integer(bool_to_int(radar.using_local)),
        Value::Text(radar.ip_address_local.clone()),
        Value::Integer(i64::from(radar.port_local)),
        Value::Real(radar.degree_xoy),
        Value::Real(radar.degree_yoz),
        Value::Real(radar.degree_xoz),
        Value::Real(radar.degree_general),
        Value::Integer(radar.direction.to_db()),
        Value::Integer(radar.defense_mode),
        Value::Real(radar.offset),
        Value::Text(radar.remark.clone()),
    ]
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::{build_label_name_update, build_label_view_update, build_upsert};
    use crate::model::radar::{Radar, RadarId, RadarLabelNames, RadarWrite};
    use crate::repo::error::RepoError;
    use rusqlite::types::Value;

    fn sample() -> Radar {
        let mut radar = Radar::new("bridge 'north'", "192.168.0.20", 60000);
        radar.using_local = true;
        radar.ip_address_local = "127.0.0.1".to_string();
        radar.degree_general = 1.5;
        radar
    }

    #[test]
    fn new_record_builds_insert_with_typed_values() {
        let radar = sample();
        let statement = build_upsert(RadarWrite::for_radar(&radar)).unwrap();

        assert!(statement.sql().starts_with("INSERT INTO t_base_radar_info"));
        assert_eq!(statement.params().len(), 16);
        assert_eq!(
            statement.params()[0],
            Value::Text("bridge 'north'".to_string())
        );
        assert_eq!(statement.params()[3], Value::Null);
        assert_eq!(statement.params()[5], Value::Integer(1));
        assert_eq!(statement.params()[11], Value::Real(1.5));
        assert!(!statement.sql().contains("north"));
    }

    #[test]
    fn existing_record_builds_update_keyed_on_id() {
        let mut radar = sample();
        radar.id = RadarId::new(42);
        let statement = build_upsert(RadarWrite::for_radar(&radar)).unwrap();

        assert!(statement.sql().starts_with("UPDATE t_base_radar_info"));
        assert!(statement.sql().contains("WHERE radar_id = ?17"));
        assert_eq!(statement.params().last(), Some(&Value::Integer(42)));
    }

    #[test]
    fn explicit_new_record_inserts_even_with_identity() {
        let mut radar = sample();
        radar.id = RadarId::new(9);
        let statement = build_upsert(RadarWrite::NewRecord(&radar)).unwrap();
        assert!(statement.sql().starts_with("INSERT"));
    }

    #[test]
    fn invalid_radar_fails_before_building() {
        let radar = Radar::new("", "192.168.0.20", 60000);
        let err = build_upsert(RadarWrite::for_radar(&radar)).unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));
    }

    #[test]
    fn label_name_update_requires_identity() {
        let mut radar = sample();
        let err = build_label_name_update(&radar).unwrap_err();
        assert!(matches!(err, RepoError::MissingIdentity));

        radar.id = RadarId::new(3);
        radar.item_name_radar_state = "state".to_string();
        let statement = build_label_name_update(&radar).unwrap();
        assert_eq!(
            statement.params(),
            [
                Value::Text("state".to_string()),
                Value::Text(String::new()),
                Value::Text(String::new()),
                Value::Integer(3),
            ]
        );
    }

    #[test]
    fn label_view_update_matches_full_radar_update() {
        let mut radar = sample();
        radar.id = RadarId::new(6);
        radar.item_name_collision_state = "collision".to_string();
        let labels = RadarLabelNames {
            id: RadarId::new(6).unwrap(),
            name: "ignored".to_string(),
            address: "ignored".to_string(),
            item_name_radar_state: String::new(),
            item_name_collision_state: "collision".to_string(),
            item_name_collision_state_2: String::new(),
        };
        assert_eq!(
            build_label_view_update(&labels),
            build_label_name_update(&radar).unwrap()
        );
    }
}
