//! Task records and their mutation rules.
//!
//! A task carries a title, description, category, priority, due date, and
//! status. New tasks always start pending; updates merge a partial patch and
//! any status may replace any other. The module follows hexagonal
//! architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
