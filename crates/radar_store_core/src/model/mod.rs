//! Radar domain model and read-time annotations.
//!
//! # Responsibility
//! - Define the radar configuration record and its selector enums.
//! - Define the tagged write request used to pick insert vs update.
//! - Provide the `Tracked` wrapper for editor-side change tracking.
//!
//! # Invariants
//! - A `RadarId` is always positive; "not yet persisted" is `None`, never 0.

pub mod radar;
pub mod tracked;
