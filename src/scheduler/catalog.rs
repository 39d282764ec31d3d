//! Read-only lookup of recurring per-weekday availability windows.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Datelike, NaiveDate, Weekday};

use crate::api::{AvailabilityWindow, StaffId};
use crate::db::repository::{FullRepository, RepositoryResult};

/// Read-only catalog of a staff member's recurring weekly working windows.
///
/// No window found for a date's weekday means zero capacity that day; a
/// window flagged unavailable is treated the same. Read-only, no side
/// effects; repository errors propagate unchanged.
pub struct AvailabilityCatalog {
    repo: Arc<dyn FullRepository>,
}

impl AvailabilityCatalog {
    pub fn new(repo: Arc<dyn FullRepository>) -> Self {
        Self { repo }
    }

    /// The availability window in effect on a specific date, if any.
    ///
    /// Weekday is derived from the date, with the week running
    /// Monday(1)..Sunday(7).
    pub async fn window_for(
        &self,
        staff_id: StaffId,
        date: NaiveDate,
    ) -> RepositoryResult<Option<AvailabilityWindow>> {
        let weekday = date.weekday();
        let windows = self.repo.fetch_windows(staff_id).await?;
        Ok(windows
            .into_iter()
            .find(|w| w.weekday == weekday && w.is_available))
    }

    /// All usable windows for a staff member keyed by weekday.
    ///
    /// This is the batch form the multi-day allocator uses so a whole
    /// horizon costs one repository round-trip. With at most one meaningful
    /// window per weekday, the first usable window per day wins.
    pub async fn window_map(
        &self,
        staff_id: StaffId,
    ) -> RepositoryResult<HashMap<Weekday, AvailabilityWindow>> {
        let windows = self.repo.fetch_windows(staff_id).await?;
        let mut map = HashMap::new();
        for window in windows.into_iter().filter(|w| w.is_available) {
            map.entry(window.weekday).or_insert(window);
        }
        Ok(map)
    }
}
