//! Radar configuration record.
//!
//! # Invariants
//! - `id == None` means the radar was never persisted.
//! - Calibration and offset values are finite.
//! - `name` and `ip_address` are non-blank; `ip_address_local` is non-blank
//!   whenever `using_local` is set.

use serde::{Deserialize, Deserializer, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage identity of a persisted radar. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct RadarId(i64);

impl RadarId {
    /// Wraps a storage identity; returns `None` for `value <= 0`.
    pub fn new(value: i64) -> Option<Self> {
        (value > 0).then_some(Self(value))
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl Display for RadarId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for RadarId {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("radar id must be positive, got {value}"))
    }
}

impl From<RadarId> for i64 {
    fn from(value: RadarId) -> Self {
        value.0
    }
}

/// Transport used to reach the radar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionMode {
    /// Radar acts as TCP server; the store side connects as client.
    #[default]
    TcpClient,
    /// Radar connects in; the store side listens.
    TcpServer,
    /// Connectionless datagrams.
    Udp,
}

impl ConnectionMode {
    pub fn to_db(self) -> i64 {
        match self {
            Self::TcpClient => 1,
            Self::TcpServer => 2,
            Self::Udp => 3,
        }
    }

    pub fn from_db(value: i64) -> Option<Self> {
        match value {
            1 => Some(Self::TcpClient),
            2 => Some(Self::TcpServer),
            3 => Some(Self::Udp),
            _ => None,
        }
    }
}

/// Side of the machine the radar faces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    Front,
    Back,
    Left,
    Right,
    Top,
    Bottom,
}

impl Direction {
    pub fn to_db(self) -> i64 {
        match self {
            Self::Front => 1,
            Self::Back => 2,
            Self::Left => 3,
            Self::Right => 4,
            Self::Top => 5,
            Self::Bottom => 6,
        }
    }

    pub fn from_db(value: i64) -> Option<Self> {
        match value {
            1 => Some(Self::Front),
            2 => Some(Self::Back),
            3 => Some(Self::Left),
            4 => Some(Self::Right),
            5 => Some(Self::Top),
            6 => Some(Self::Bottom),
            _ => None,
        }
    }
}

/// Radar sensor configuration row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Radar {
    /// `None` until storage assigns an identity. Incoming `0` or negative ids read as `None`.
    #[serde(default, deserialize_with = "deserialize_unsaved_id")]
    pub id: Option<RadarId>,
    pub name: String,
    pub ip_address: String,
    pub port: u16,
    /// `None` for radars not assigned to any group.
    pub owner_group_id: Option<i64>,
    pub connection_mode: ConnectionMode,
    /// Connect through `ip_address_local`/`port_local` instead of the primary address.
    pub using_local: bool,
    pub ip_address_local: String,
    pub port_local: u16,
    pub degree_xoy: f64,
    pub degree_yoz: f64,
    pub degree_xoz: f64,
    pub degree_general: f64,
    pub direction: Direction,
    pub defense_mode: i64,
    /// Linear mounting offset, in meters.
    pub offset: f64,
    pub remark: String,
    /// Label of the runtime field that carries radar state.
    pub item_name_radar_state: String,
    /// Label of the runtime field that carries collision state.
    pub item_name_collision_state: String,
    /// Label of the second collision-state field.
    pub item_name_collision_state_2: String,
}

fn deserialize_unsaved_id<'de, D>(deserializer: D) -> Result<Option<RadarId>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<i64>::deserialize(deserializer)?.and_then(RadarId::new))
}

impl Radar {
    /// Creates an unsaved radar with the given name and address.
    pub fn new(name: impl Into<String>, ip_address: impl Into<String>, port: u16) -> Self {
        Self {
            name: name.into(),
            ip_address: ip_address.into(),
            port,
            ..Self::default()
        }
    }

    /// Returns whether storage has assigned an identity.
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Returns `host:port` for the primary address.
    pub fn address(&self) -> String {
        format!("{}:{}", self.ip_address, self.port)
    }

    /// Checks that this radar can be turned into a well-formed write.
    pub fn validate(&self) -> Result<(), RadarValidationError> {
        if self.name.trim().is_empty() {
            return Err(RadarValidationError::BlankName);
        }
        if self.ip_address.trim().is_empty() {
            return Err(RadarValidationError::BlankAddress);
        }
        if self.using_local && self.ip_address_local.trim().is_empty() {
            return Err(RadarValidationError::BlankLocalAddress);
        }
        for (field, value) in [
            ("degree_xoy", self.degree_xoy),
            ("degree_yoz", self.degree_yoz),
            ("degree_xoz", self.degree_xoz),
            ("degree_general", self.degree_general),
            ("offset", self.offset),
        ] {
            if !value.is_finite() {
                return Err(RadarValidationError::NonFiniteValue(field));
            }
        }
        if self.defense_mode < 0 {
            return Err(RadarValidationError::NegativeDefenseMode(self.defense_mode));
        }
        Ok(())
    }
}

/// Reasons a radar cannot be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RadarValidationError {
    BlankName,
    BlankAddress,
    BlankLocalAddress,
    NonFiniteValue(&'static str),
    NegativeDefenseMode(i64),
}

impl Display for RadarValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankName => write!(f, "radar name must not be blank"),
            Self::BlankAddress => write!(f, "radar ip address must not be blank"),
            Self::BlankLocalAddress => {
                write!(f, "local ip address is required when using_local is set")
            }
            Self::NonFiniteValue(field) => write!(f, "radar field `{field}` must be finite"),
            Self::NegativeDefenseMode(value) => {
                write!(f, "defense mode must not be negative, got {value}")
            }
        }
    }
}

impl Error for RadarValidationError {}

/// Write request for one radar, tagged by whether it already exists.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RadarWrite<'a> {
    /// Never persisted; produces an INSERT.
    NewRecord(&'a Radar),
    /// Persisted under `id`; produces an UPDATE keyed on `id`.
    ExistingRecord { id: RadarId, radar: &'a Radar },
}

impl<'a> RadarWrite<'a> {
    /// Derives the request from the radar's own identity.
    pub fn for_radar(radar: &'a Radar) -> Self {
        match radar.id {
            Some(id) => Self::ExistingRecord { id, radar },
            None => Self::NewRecord(radar),
        }
    }

    pub fn radar(&self) -> &'a Radar {
        match self {
            Self::NewRecord(radar) => radar,
            Self::ExistingRecord { radar, .. } => radar,
        }
    }
}

/// Radar row joined with its group's type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadarRecord {
    pub radar: Radar,
    /// `None` when the radar has no group.
    pub group_type: Option<i64>,
}

/// Narrow projection used to edit radar label names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RadarLabelNames {
    pub id: RadarId,
    pub name: String,
    /// `host:port` of the primary address.
    pub address: String,
    pub item_name_radar_state: String,
    pub item_name_collision_state: String,
    pub item_name_collision_state_2: String,
}

#[cfg(test)]
mod tests {
    use super::{ConnectionMode, Direction, Radar, RadarId, RadarValidationError, RadarWrite};

    #[test]
    fn radar_id_rejects_non_positive_values() {
        assert!(RadarId::new(0).is_none());
        assert!(RadarId::new(-3).is_none());
        assert_eq!(RadarId::new(7).map(RadarId::get), Some(7));
    }

    #[test]
    fn write_request_follows_identity() {
        let mut radar = Radar::new("front", "10.0.0.1", 8080);
        assert!(matches!(RadarWrite::for_radar(&radar), RadarWrite::NewRecord(_)));

        radar.id = RadarId::new(12);
        match RadarWrite::for_radar(&radar) {
            RadarWrite::ExistingRecord { id, .. } => assert_eq!(id.get(), 12),
            other => panic!("unexpected write request: {other:?}"),
        }
    }

    #[test]
    fn validate_rejects_blank_text_and_non_finite_values() {
        let valid = Radar::new("front", "10.0.0.1", 8080);
        assert!(valid.validate().is_ok());

        let blank = Radar::new("  ", "10.0.0.1", 8080);
        assert_eq!(blank.validate(), Err(RadarValidationError::BlankName));

        let mut local = valid.clone();
        local.using_local = true;
        assert_eq!(local.validate(), Err(RadarValidationError::BlankLocalAddress));

        let mut tilted = valid;
        tilted.degree_yoz = f64::NAN;
        assert_eq!(
            tilted.validate(),
            Err(RadarValidationError::NonFiniteValue("degree_yoz"))
        );
    }

    #[test]
    fn selector_codes_roundtrip() {
        for mode in [
            ConnectionMode::TcpClient,
            ConnectionMode::TcpServer,
            ConnectionMode::Udp,
        ] {
            assert_eq!(ConnectionMode::from_db(mode.to_db()), Some(mode));
        }
        assert_eq!(Direction::from_db(Direction::Right.to_db()), Some(Direction::Right));
        assert_eq!(Direction::from_db(0), None);
    }

    #[test]
    fn serializes_enums_in_snake_case() {
        let mut radar = Radar::new("front", "10.0.0.1", 8080);
        radar.connection_mode = ConnectionMode::TcpServer;
        radar.id = RadarId::new(4);
        let json = serde_json::to_value(&radar).expect("radar should serialize");
        assert_eq!(json["connection_mode"], "tcp_server");
        assert_eq!(json["direction"], "front");
        assert_eq!(json["id"], 4);
    }

    #[test]
    fn deserializes_non_positive_or_missing_id_as_unsaved() {
        let mut json = serde_json::to_value(Radar::new("front", "10.0.0.1", 8080)).unwrap();
        for (raw, expected) in [(0, None), (-5, None), (7, RadarId::new(7))] {
            json["id"] = raw.into();
            let radar: Radar = serde_json::from_value(json.clone()).unwrap();
            assert_eq!(radar.id, expected);
        }

        json.as_object_mut().unwrap().remove("id");
        let radar: Radar = serde_json::from_value(json).unwrap();
        assert!(radar.id.is_none());
    }
}
