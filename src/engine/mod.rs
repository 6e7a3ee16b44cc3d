//! The period engine.
//!
//! Responsibilities:
//!
//! - resolve a period over a series and compute its return (`resolve`)
//! - build the indexed chart series (`index`)
//! - derive chart axis bounds (`axis`)
//! - evaluate every preset at once (`table`)
//!
//! Everything here is synchronous and pure: inputs are borrowed, outputs are
//! new values, and "now" is always a parameter.

pub mod axis;
pub mod index;
pub mod resolve;
pub mod table;

pub use axis::*;
pub use index::*;
pub use resolve::*;
pub use table::*;
