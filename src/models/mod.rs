//! Value-type helpers shared across the engine.

pub mod time;

pub use time::{add_hours, hours_between, is_weekend, weekday_number};
