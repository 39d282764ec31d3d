//! Read-only lookup of existing bookings and approved time off.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};

use crate::api::{Booking, DateRange, StaffId, TimeOff};
use crate::db::repository::{FullRepository, RepositoryResult};
use crate::models::hours_between;

/// Read-only ledger of a staff member's existing commitments.
///
/// The raw accessors return unmerged interval lists exactly as stored;
/// errors from the backing store propagate unchanged with no retry. The
/// [`DayCommitments`] view is the shared daily-capacity computation both the
/// single-day finder and the multi-day allocator build on.
pub struct CommitmentLedger {
    repo: Arc<dyn FullRepository>,
}

impl CommitmentLedger {
    pub fn new(repo: Arc<dyn FullRepository>) -> Self {
        Self { repo }
    }

    /// Raw bookings for a staff member in an inclusive date range.
    pub async fn bookings(
        &self,
        staff_id: StaffId,
        range: DateRange,
    ) -> RepositoryResult<Vec<Booking>> {
        self.repo.fetch_bookings(staff_id, range).await
    }

    /// Raw time-off entries intersecting an inclusive date range.
    pub async fn time_off(
        &self,
        staff_id: StaffId,
        range: DateRange,
    ) -> RepositoryResult<Vec<TimeOff>> {
        self.repo.fetch_time_off(staff_id, range).await
    }

    /// The commitments occupying one specific date.
    pub async fn day_commitments(
        &self,
        staff_id: StaffId,
        date: NaiveDate,
    ) -> RepositoryResult<DayCommitments> {
        let range = DateRange::new(date, date);
        let bookings = self.bookings(staff_id, range).await?;
        let time_off = self.time_off(staff_id, range).await?;
        Ok(DayCommitments::from_rows(&bookings, &time_off, date))
    }
}

/// The busy intervals on one date: active bookings plus approved partial
/// time off, with full-day time off collapsing the whole day.
#[derive(Debug, Clone)]
pub struct DayCommitments {
    /// Occupied intervals in ascending start order.
    pub busy: Vec<(NaiveTime, NaiveTime)>,
    /// True when approved full-day time off covers the date.
    pub full_day_off: bool,
}

impl DayCommitments {
    /// Build the day view from pre-fetched rows. Cancelled bookings and
    /// non-approved time off contribute nothing.
    pub fn from_rows(bookings: &[Booking], time_off: &[TimeOff], date: NaiveDate) -> Self {
        let mut busy: Vec<(NaiveTime, NaiveTime)> = bookings
            .iter()
            .filter(|b| b.date == date && b.is_active())
            .map(|b| (b.start, b.end))
            .collect();

        let mut full_day_off = false;
        for entry in time_off.iter().filter(|t| t.covers(date)) {
            if entry.is_full_day {
                full_day_off = true;
            } else if let (Some(start), Some(end)) = (entry.start, entry.end) {
                busy.push((start, end));
            }
        }

        busy.sort();
        Self { busy, full_day_off }
    }

    /// Total committed hours on the date.
    pub fn committed_hours(&self) -> f64 {
        self.busy
            .iter()
            .map(|(start, end)| hours_between(*start, *end))
            .sum()
    }

    /// Strict overlap test: does any commitment intersect `[start, end)`?
    pub fn blocks(&self, start: NaiveTime, end: NaiveTime) -> bool {
        self.busy
            .iter()
            .any(|(busy_start, busy_end)| start < *busy_end && end > *busy_start)
    }

    /// Free intervals inside `[window_start, window_end)` once the busy
    /// intervals are removed, in ascending order. Overlapping commitments
    /// (a booking plus partial time off over the same hours) are merged.
    pub fn free_gaps(
        &self,
        window_start: NaiveTime,
        window_end: NaiveTime,
    ) -> Vec<(NaiveTime, NaiveTime)> {
        let mut gaps = Vec::new();
        let mut cursor = window_start;
        for &(busy_start, busy_end) in &self.busy {
            if busy_end <= cursor {
                continue;
            }
            if busy_start >= window_end {
                break;
            }
            if busy_start > cursor {
                gaps.push((cursor, busy_start));
            }
            cursor = cursor.max(busy_end);
            if cursor >= window_end {
                break;
            }
        }
        if cursor < window_end {
            gaps.push((cursor, window_end));
        }
        gaps
    }
}
