//! mailview library entrypoint.
//!
//! Modules:
//! - `app`: startup, configuration, shared state
//! - `http`: Axum router, route table, authorization gate and rendering
//! - `service`: mail item operations and test data seeding
//! - `issues`: issue form backend and attempt log
//! - `store`: record store trait with SQLite and in-memory backends
//! - `db`: schema setup and SQLite helpers
//! - `models`: typed records used across layers
//! - `util`: helpers for tracing, HTML escaping and mail parsing

pub mod app;
pub mod db;
pub mod http;
pub mod issues;
pub mod models;
pub mod service;
pub mod store;
pub mod util;
