//! taskbrew - a command console for a program/project/task/subtask record store.
//!
//! The library exposes the interpreter and its collaborators so the binary and
//! the integration tests share one implementation.

pub mod cli;
pub mod commands;
pub mod config;
pub mod console;
pub mod error;
pub mod interpreter;
pub mod logging;
pub mod session;
pub mod store;
