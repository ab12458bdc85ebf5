//! Read statement composition for radar listings.
//!
//! # Invariants
//! - The scope filter is always a bound parameter; scope `0` means unscoped.
//! - Sorting only ever references a column from `RADAR_COLUMNS`.
//! - Radars without a group are kept by the joins and only match scope `0`.

use super::error::{RepoError, RepoResult};
use super::provider::Statement;
use rusqlite::types::Value;

/// Every column of `t_base_radar_info`, in schema order.
pub const RADAR_COLUMNS: &[&str] = &[
    "radar_id",
    "radar_name",
    "ip_address",
    "port",
    "owner_group_id",
    "conn_mode_id",
    "using_local",
    "ip_address_local",
    "port_local",
    "degree_xoy",
    "degree_yoz",
    "degree_xoz",
    "degree_general",
    "direction_id",
    "defense_mode_id",
    "offset",
    "remark",
    "item_name_radar_state",
    "item_name_collision_state",
    "item_name_collision_state_2",
];

const RADAR_LIST_SQL: &str = "SELECT
    t.radar_id,
    t.radar_name,
    t.ip_address,
    t.port,
    t.owner_group_id,
    t.conn_mode_id,
    t.using_local,
    t.ip_address_local,
    t.port_local,
    t.degree_xoy,
    t.degree_yoz,
    t.degree_xoz,
    t.degree_general,
    t.direction_id,
    t.defense_mode_id,
    t.\"offset\" AS \"offset\",
    t.remark,
    t.item_name_radar_state,
    t.item_name_collision_state,
    t.item_name_collision_state_2,
    g.group_type AS group_type
FROM t_base_radar_info t
LEFT JOIN t_base_radargroup_info g ON t.owner_group_id = g.group_id
LEFT JOIN t_base_shiploader_info s ON g.owner_shiploader_id = s.shiploader_id
WHERE ?1 = 0 OR s.shiploader_id = ?1";

const LABEL_NAME_LIST_SQL: &str = "SELECT
    t.radar_id,
    t.radar_name,
    t.ip_address || ':' || t.port AS address,
    t.item_name_radar_state,
    t.item_name_collision_state,
    t.item_name_collision_state_2
FROM t_base_radar_info t";

/// A radar column that listings may be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortField(&'static str);

impl SortField {
    pub const ID: Self = Self("radar_id");
    pub const NAME: Self = Self("radar_name");

    /// Resolves a caller-supplied column name.
    ///
    /// Blank input means "no ordering" and yields `Ok(None)`. Matching is
    /// ASCII case-insensitive; anything else is `UnknownSortField`.
    pub fn parse(field: &str) -> RepoResult<Option<Self>> {
        let trimmed = field.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        RADAR_COLUMNS
            .iter()
            .find(|column| column.eq_ignore_ascii_case(trimmed))
            .map(|column| Some(Self(*column)))
            .ok_or_else(|| RepoError::UnknownSortField(trimmed.to_string()))
    }

    pub fn column(self) -> &'static str {
        self.0
    }
}

/// Lists radars with their group type, optionally scoped to one shiploader.
pub fn list_radars(shiploader_id: i64, sort: Option<SortField>) -> Statement {
    let sql = format!("{RADAR_LIST_SQL}{};", order_clause(sort));
    Statement::new(sql, vec![Value::Integer(shiploader_id)])
}

/// Lists the label-name projection of every radar.
pub fn list_label_names(sort: Option<SortField>) -> Statement {
    let sql = format!("{LABEL_NAME_LIST_SQL}{};", order_clause(sort));
    Statement::new(sql, Vec::new())
}

fn order_clause(sort: Option<SortField>) -> String {
    match sort {
        Some(field) => format!("\nORDER BY t.\"{}\" ASC", field.column()),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::{list_label_names, list_radars, SortField};
    use crate::repo::error::RepoError;
    use rusqlite::types::Value;

    #[test]
    fn parse_treats_blank_as_unordered() {
        assert_eq!(SortField::parse("").unwrap(), None);
        assert_eq!(SortField::parse("  \t").unwrap(), None);
    }

    #[test]
    fn parse_accepts_known_columns_case_insensitively() {
        assert_eq!(SortField::parse("RADAR_NAME").unwrap(), Some(SortField::NAME));
        assert_eq!(
            SortField::parse(" offset ").unwrap().map(SortField::column),
            Some("offset")
        );
    }

    #[test]
    fn parse_rejects_non_columns() {
        let err = SortField::parse("radar_id; DROP TABLE t_base_radar_info").unwrap_err();
        assert!(matches!(err, RepoError::UnknownSortField(_)));
    }

    #[test]
    fn list_binds_scope_and_appends_order_only_when_requested() {
        let unordered = list_radars(0, None);
        assert!(!unordered.sql().contains("ORDER BY"));
        assert_eq!(unordered.params(), [Value::Integer(0)]);

        let ordered = list_radars(5, Some(SortField::ID));
        assert!(ordered.sql().contains("ORDER BY t.\"radar_id\" ASC"));
        assert!(ordered.sql().contains("LEFT JOIN t_base_radargroup_info"));
        assert_eq!(ordered.params(), [Value::Integer(5)]);
    }

    #[test]
    fn label_name_listing_has_no_parameters() {
        let statement = list_label_names(Some(SortField::NAME));
        assert!(statement.params().is_empty());
        assert!(statement.sql().contains("AS address"));
        assert!(statement.sql().ends_with("ORDER BY t.\"radar_name\" ASC;"));
    }
}
