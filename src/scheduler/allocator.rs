//! Greedy multi-day allocation across a bounded lookahead horizon.

use std::sync::Arc;

use chrono::{Datelike, Duration, NaiveDate};
use tracing::debug;

use crate::api::{DateRange, MultiDayPlan, PlannedSlot, StaffId};
use crate::config::SchedulerConfig;
use crate::db::repository::{FullRepository, RepositoryError, RepositoryResult};
use crate::models::{add_hours, hours_between, is_weekend};
use crate::scheduler::catalog::AvailabilityCatalog;
use crate::scheduler::ledger::{CommitmentLedger, DayCommitments};

const EPSILON: f64 = 1e-9;

/// Spreads a total-hours requirement across the lookahead horizon when no
/// single day suffices.
///
/// The strategy is greedy earliest-fit: walk the horizon day by day and book
/// as much of the remainder as each day's earliest adequate free gap holds,
/// never less than the configured minimum daily session. The walk never
/// revisits an earlier day with spare capacity to tighten the packing; plans
/// are first-fit, not optimal.
pub struct MultiDayAllocator {
    catalog: AvailabilityCatalog,
    ledger: CommitmentLedger,
    config: SchedulerConfig,
}

impl MultiDayAllocator {
    pub fn new(repo: Arc<dyn FullRepository>, config: SchedulerConfig) -> Self {
        Self {
            catalog: AvailabilityCatalog::new(Arc::clone(&repo)),
            ledger: CommitmentLedger::new(repo),
            config,
        }
    }

    /// Allocate `total_hours` for a staff member starting from an explicit
    /// reference date.
    ///
    /// The reference date replaces any implicit wall-clock "today" so the
    /// allocation is pure and repeatable: identical ledger state and an
    /// identical request always produce an identical plan.
    ///
    /// Windows, bookings, and time off for the whole horizon are batch-loaded
    /// up front in three repository calls, not per-day.
    pub async fn allocate(
        &self,
        staff_id: StaffId,
        total_hours: f64,
        from: NaiveDate,
    ) -> RepositoryResult<MultiDayPlan> {
        if total_hours <= 0.0 {
            return Err(RepositoryError::validation(format!(
                "requested hours must be positive, got {}",
                total_hours
            )));
        }

        let horizon = self.config.horizon_days;
        let range = DateRange::new(from, from + Duration::days(horizon as i64 - 1));
        let windows = self.catalog.window_map(staff_id).await?;
        let bookings = self.ledger.bookings(staff_id, range).await?;
        let time_off = self.ledger.time_off(staff_id, range).await?;

        let mut remaining = total_hours;
        let mut slots: Vec<PlannedSlot> = Vec::new();

        for offset in 0..horizon {
            if remaining <= EPSILON {
                break;
            }
            let date = from + Duration::days(offset as i64);

            // Weekends are skipped unconditionally, seeded windows or not.
            if is_weekend(date) {
                continue;
            }
            let window = match windows.get(&date.weekday()) {
                Some(window) => window,
                None => continue,
            };

            let day = DayCommitments::from_rows(&bookings, &time_off, date);
            if day.full_day_off {
                debug!(staff_id = staff_id.value(), %date, "skipping day: full-day time off");
                continue;
            }

            // Sessions are contiguous: place this day's hours in the
            // earliest free gap between existing commitments. The floor is
            // always enforced, even when the remainder would exactly
            // complete the request on this day.
            let mut placed = None;
            for (gap_start, gap_end) in day.free_gaps(window.start, window.end) {
                let gap_hours = hours_between(gap_start, gap_end);
                let hours_to_book = remaining.min(gap_hours);
                if hours_to_book + EPSILON >= self.config.min_daily_hours {
                    placed = Some((gap_start, hours_to_book));
                    break;
                }
            }
            let (start, hours_to_book) = match placed {
                Some(placement) => placement,
                None => {
                    debug!(
                        staff_id = staff_id.value(),
                        %date,
                        "skipping day: no free gap clears the minimum daily session"
                    );
                    continue;
                }
            };
            let end = add_hours(start, hours_to_book);
            remaining -= hours_to_book;
            slots.push(PlannedSlot {
                date,
                start,
                end,
                hours: hours_to_book,
                sequence: slots.len() as u32 + 1,
            });
        }

        let allocated = total_hours - remaining;
        let can_fit = remaining <= EPSILON;
        let summary = if slots.is_empty() {
            format!(
                "No capacity found within the {horizon}-day lookahead horizon; \
                 try another staff member or extend the horizon."
            )
        } else if can_fit {
            format!(
                "Booked {:.1} hours across {} day(s), {} to {}.",
                allocated,
                slots.len(),
                slots[0].date,
                slots[slots.len() - 1].date,
            )
        } else {
            format!(
                "Allocated {:.1} of {:.1} hours within the {horizon}-day horizon; \
                 {:.1} hours could not be placed.",
                allocated, total_hours, remaining,
            )
        };

        Ok(MultiDayPlan {
            can_fit,
            total_days: slots.len() as u32,
            slots,
            summary,
        })
    }
}
