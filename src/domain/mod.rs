//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - input observations (`Sample`)
//! - period selection (`Preset`, `PeriodSpec`)
//! - engine outputs (`ResolvedResult`, `IndexedPoint`, `AxisBounds`)
//! - run configuration (`ViewConfig`, `SampleConfig`)

pub mod types;

pub use types::*;
