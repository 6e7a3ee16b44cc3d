//! Date math: the 30/360 day count and calendar/period helpers.

pub mod calendar;
pub mod daycount;

pub use calendar::*;
pub use daycount::*;
