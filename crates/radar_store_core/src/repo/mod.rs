//! Radar persistence: statement composition, execution, repository facade.
//!
//! # Responsibility
//! - Compose parameterized read and write statements for `t_base_radar_info`.
//! - Execute them through an injected `ExecutionProvider`.
//! - Expose a use-case oriented `RadarRepository` facade.
//!
//! # Invariants
//! - Values are always bound parameters; only whitelisted column names are
//!   formatted into SQL text.
//! - Batch writes are all-or-nothing.

pub mod error;
pub mod provider;
pub mod query;
pub mod radar_repo;
pub mod statement;
