//! Higher-level helpers built on the repository and the scheduling engine.

pub mod alternates;
pub mod planner;

pub use alternates::suggest_alternates;
pub use planner::{plan_request, RequestPlan};
