//! Cell-range mapping: range expressions, the section configuration, and the
//! engine that turns one table into one output row.

pub mod config;
pub mod engine;
pub mod range;
