//! Radar use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls for editor-style callers.
//! - Attach read-time change tracking that storage knows nothing about.

pub mod radar_service;
