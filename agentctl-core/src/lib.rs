//! agentctl-core: persistence layer for the agentctl backend.
//!
//! Defines the company/agent/task entity hierarchy, the relational schema
//! that stores it, and the session/repository machinery on top:
//! - `model`: plain entity records and closed enum types
//! - `config`: connection-string resolution and backend detection
//! - `db`: pooled connections, units of work, schema lifecycle, and one
//!   repository module per entity
//!
//! The storage backend is selected by a single `DATABASE_URL` setting:
//! a local SQLite file by default, PostgreSQL when given a server URL.
//! Both run through the same queries via the sqlx `Any` driver.

pub mod config;
pub mod db;
pub mod model;

pub use config::{BackendKind, ConfigError, DatabaseConfig};
pub use db::{Db, DbError, DbResult, IntegrityKind};
