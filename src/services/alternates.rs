//! Same-department alternate staff suggestions.
//!
//! When a capacity warning fires, the confirmation flow offers colleagues
//! from the same department who could absorb the request on the same date.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::api::{StaffId, StaffMember};
use crate::db::repository::{FullRepository, RepositoryResult};
use crate::models::is_weekend;
use crate::scheduler::{AvailabilityCatalog, CommitmentLedger};

/// Staff members in `department` with at least `hours` of uncommitted
/// capacity on `date`, in roster order. `exclude` drops the member the
/// request originally targeted.
///
/// Weekends short-circuit to an empty list; the engine never books them.
pub async fn suggest_alternates(
    repo: Arc<dyn FullRepository>,
    department: &str,
    exclude: StaffId,
    date: NaiveDate,
    hours: f64,
) -> RepositoryResult<Vec<StaffMember>> {
    if is_weekend(date) {
        return Ok(Vec::new());
    }

    let catalog = AvailabilityCatalog::new(Arc::clone(&repo));
    let ledger = CommitmentLedger::new(Arc::clone(&repo));

    let mut suggestions = Vec::new();
    for member in repo.list_staff().await? {
        if member.id == exclude || member.department != department {
            continue;
        }
        let window = match catalog.window_for(member.id, date).await? {
            Some(window) => window,
            None => continue,
        };
        let day = ledger.day_commitments(member.id, date).await?;
        if day.full_day_off {
            continue;
        }
        let remaining = window.span_hours() - day.committed_hours();
        if remaining + 1e-9 >= hours {
            suggestions.push(member);
        }
    }
    Ok(suggestions)
}
