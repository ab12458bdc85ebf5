//! Persistence core for radar sensor configuration records.
//!
//! Reads compose scoped, optionally ordered listings over the
//! radar → group → shiploader join; writes translate radars into
//! parameterized statements and run batches atomically.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LoggingConfig, LoggingError};
pub use model::radar::{
    ConnectionMode, Direction, Radar, RadarId, RadarLabelNames, RadarRecord,
    RadarValidationError, RadarWrite,
};
pub use model::tracked::{track_all, Tracked};
pub use repo::error::{RepoError, RepoResult};
pub use repo::provider::{ExecutionProvider, ResultRow, ResultSet, SqliteProvider, Statement};
pub use repo::query::SortField;
pub use repo::radar_repo::{RadarRepository, SqlRadarRepository, SqliteRadarRepository};
pub use service::radar_service::RadarService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
