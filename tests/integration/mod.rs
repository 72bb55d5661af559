//! Integration tests for taskbrew.
//!
//! The SQLite tests use temporary database files and need no setup.

pub mod interpreter_test;
pub mod sqlite_store_test;
