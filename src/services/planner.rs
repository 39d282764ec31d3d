//! Request-driven planning entry point.
//!
//! Callers that hold a [`BookingRequest`] rather than raw parameters go
//! through here: the single-day finder runs first against the request's
//! earliest date, and anything it cannot satisfy falls through to the
//! multi-day allocator.

use std::sync::Arc;

use tracing::debug;

use crate::api::{BookingRequest, CandidateSlot, MultiDayPlan, SlotSearch};
use crate::config::SchedulerConfig;
use crate::db::repository::{FullRepository, RepositoryError, RepositoryResult};
use crate::scheduler::{MultiDayAllocator, SingleDaySlotFinder};

/// How a booking request can be satisfied.
#[derive(Debug, Clone)]
pub enum RequestPlan {
    /// The whole request fits on the earliest date; the caller presents the
    /// candidates for explicit confirmation.
    SingleDay(Vec<CandidateSlot>),
    /// The request needs (or the earliest date forces) a multi-day spread.
    MultiDay(MultiDayPlan),
}

/// Plan a [`BookingRequest`] end to end.
///
/// A request carrying a shoot/edit split must have the parts sum to its
/// total. Requests the finder answers with candidates come back as
/// [`RequestPlan::SingleDay`]; every warning outcome (no availability,
/// insufficient capacity, fragmentation) falls through to the allocator
/// starting at the request's earliest date.
pub async fn plan_request(
    repo: Arc<dyn FullRepository>,
    config: SchedulerConfig,
    request: &BookingRequest,
) -> RepositoryResult<RequestPlan> {
    if let (Some(shoot), Some(edit)) = (request.shoot_hours, request.edit_hours) {
        if (shoot + edit - request.total_hours).abs() > 1e-9 {
            return Err(RepositoryError::validation(format!(
                "shoot ({shoot} h) and edit ({edit} h) do not sum to the requested total ({} h)",
                request.total_hours
            )));
        }
    }

    let finder = SingleDaySlotFinder::new(Arc::clone(&repo), config.clone());
    let search = finder
        .find(request.staff_id, request.earliest, request.total_hours)
        .await?;
    if let SlotSearch::Candidates(slots) = search {
        return Ok(RequestPlan::SingleDay(slots));
    }
    debug!(
        staff_id = request.staff_id.value(),
        earliest = %request.earliest,
        warning = search.warning(),
        "single-day search exhausted, trying multi-day"
    );

    let allocator = MultiDayAllocator::new(repo, config);
    let plan = allocator
        .allocate(request.staff_id, request.total_hours, request.earliest)
        .await?;
    Ok(RequestPlan::MultiDay(plan))
}
