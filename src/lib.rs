//! `perfview` library crate.
//!
//! The binary (`perfview`) is a thin wrapper around this library so that:
//!
//! - the return engine is testable without spawning processes
//! - the CLI and the TUI share one pipeline
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod engine;
pub mod error;
pub mod io;
pub mod math;
pub mod plot;
pub mod report;
pub mod tui;
