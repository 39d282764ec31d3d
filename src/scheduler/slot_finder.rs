//! Candidate slot enumeration on a single date.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::debug;

use crate::api::{CandidateSlot, SlotSearch, StaffId};
use crate::config::SchedulerConfig;
use crate::db::repository::{FullRepository, RepositoryError, RepositoryResult};
use crate::models::{add_hours, is_weekend};
use crate::scheduler::catalog::AvailabilityCatalog;
use crate::scheduler::ledger::CommitmentLedger;

const EPSILON: f64 = 1e-9;

/// Computes candidate contiguous time slots of a requested duration on one
/// specific date.
///
/// The finder never auto-selects: the caller presents every candidate and
/// the user explicitly confirms one before any write occurs. Capacity
/// shortfalls come back as [`SlotSearch`] warning variants with actionable
/// messages, never as errors.
pub struct SingleDaySlotFinder {
    catalog: AvailabilityCatalog,
    ledger: CommitmentLedger,
    config: SchedulerConfig,
}

impl SingleDaySlotFinder {
    pub fn new(repo: Arc<dyn FullRepository>, config: SchedulerConfig) -> Self {
        Self {
            catalog: AvailabilityCatalog::new(Arc::clone(&repo)),
            ledger: CommitmentLedger::new(repo),
            config,
        }
    }

    /// Search one date for contiguous slots of `requested_hours`.
    ///
    /// Candidate starts are scanned from the window start in configured
    /// granularity steps (whole hours by default); a candidate is valid iff
    /// it fits inside the window and overlaps no existing commitment under
    /// the strict test `start < busy.end && end > busy.start`.
    pub async fn find(
        &self,
        staff_id: StaffId,
        date: NaiveDate,
        requested_hours: f64,
    ) -> RepositoryResult<SlotSearch> {
        if requested_hours <= 0.0 {
            return Err(RepositoryError::validation(format!(
                "requested hours must be positive, got {}",
                requested_hours
            )));
        }

        if is_weekend(date) {
            return Ok(SlotSearch::NoAvailability {
                message: format!("{date} falls on a weekend; bookings run Monday to Friday."),
            });
        }

        let window = match self.catalog.window_for(staff_id, date).await? {
            Some(window) => window,
            None => {
                return Ok(SlotSearch::NoAvailability {
                    message: format!(
                        "Staff member {staff_id} has no availability on {date}; pick another date or staff member."
                    ),
                })
            }
        };

        let commitments = self.ledger.day_commitments(staff_id, date).await?;
        if commitments.full_day_off {
            return Ok(SlotSearch::NoAvailability {
                message: format!("Approved time off covers {date} for staff member {staff_id}."),
            });
        }

        let span = window.span_hours();
        let booked = commitments.committed_hours();
        let remaining = span - booked;
        if remaining + EPSILON < requested_hours {
            debug!(
                staff_id = staff_id.value(),
                %date,
                remaining,
                requested_hours,
                "insufficient single-day capacity"
            );
            return Ok(SlotSearch::InsufficientCapacity {
                remaining_hours: remaining.max(0.0),
                requested_hours,
                message: format!(
                    "Only {:.1} of the requested {:.1} hours remain on {date} (short {:.1}); \
                     try another staff member in the same department or split the work across days.",
                    remaining.max(0.0),
                    requested_hours,
                    requested_hours - remaining.max(0.0),
                ),
            });
        }

        // Enumerate candidate starts across the window.
        let mut candidates = Vec::new();
        let mut offset = 0.0;
        while offset + requested_hours <= span + EPSILON {
            let start = add_hours(window.start, offset);
            let end = add_hours(start, requested_hours);
            if !commitments.blocks(start, end) {
                candidates.push(CandidateSlot {
                    date,
                    start,
                    end,
                    hours: requested_hours,
                });
            }
            offset += self.config.slot_granularity_hours;
        }

        if candidates.is_empty() {
            // Enough total hours remain, but existing bookings fragment them.
            return Ok(SlotSearch::Fragmented {
                remaining_hours: remaining,
                message: format!(
                    "{remaining:.1} hours remain on {date} but no contiguous {requested_hours:.1}-hour \
                     run is free; existing bookings fragment the day."
                ),
            });
        }

        Ok(SlotSearch::Candidates(candidates))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{
        AvailabilityWindow, Booking, BookingStatus, ProjectId, TimeOff, TimeOffStatus,
    };
    use crate::db::LocalRepository;
    use chrono::{NaiveTime, Weekday};

    fn t(h: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, 0, 0).unwrap()
    }

    // 2026-03-02 is a Monday.
    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
    }

    fn seeded_repo(window: Option<(u32, u32)>) -> Arc<LocalRepository> {
        let repo = Arc::new(LocalRepository::new());
        if let Some((start, end)) = window {
            repo.add_window(AvailabilityWindow {
                staff_id: StaffId::new(1),
                weekday: Weekday::Mon,
                start: t(start),
                end: t(end),
                is_available: true,
            })
            .unwrap();
        }
        repo
    }

    fn finder(repo: Arc<LocalRepository>) -> SingleDaySlotFinder {
        SingleDaySlotFinder::new(repo, SchedulerConfig::default())
    }

    async fn seed_booking(repo: &LocalRepository, start: u32, end: u32) {
        use crate::db::repository::BookingRepository;
        repo.insert_booking(Booking {
            id: None,
            project_id: ProjectId::new(1),
            staff_id: StaffId::new(1),
            date: monday(),
            start: t(start),
            end: t(end),
            hours: (end - start) as f64,
            status: BookingStatus::Scheduled,
            kind: None,
            sequence: None,
        })
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_open_day_enumerates_all_starts() {
        // Window 09:00-17:00, no bookings, request 4h: candidates at
        // 09,10,11,12,13.
        let repo = seeded_repo(Some((9, 17)));
        let result = finder(repo)
            .find(StaffId::new(1), monday(), 4.0)
            .await
            .unwrap();

        let slots = result.candidates().expect("expected candidates");
        let starts: Vec<_> = slots.iter().map(|s| s.start).collect();
        assert_eq!(starts, vec![t(9), t(10), t(11), t(12), t(13)]);
        assert!(slots.iter().all(|s| s.end <= t(17)));
    }

    #[tokio::test]
    async fn test_existing_booking_excludes_overlapping_starts() {
        // Booking 10:00-12:00, request 4h: 09:00 start would span 09-13 and
        // overlap, so only 12:00 and 13:00 remain.
        let repo = seeded_repo(Some((9, 17)));
        seed_booking(&repo, 10, 12).await;

        let result = finder(repo)
            .find(StaffId::new(1), monday(), 4.0)
            .await
            .unwrap();

        let slots = result.candidates().expect("expected candidates");
        let starts: Vec<_> = slots.iter().map(|s| s.start).collect();
        assert_eq!(starts, vec![t(12), t(13)]);
    }

    #[tokio::test]
    async fn test_no_window_warns() {
        let repo = seeded_repo(None);
        let result = finder(repo)
            .find(StaffId::new(1), monday(), 2.0)
            .await
            .unwrap();
        assert!(matches!(result, SlotSearch::NoAvailability { .. }));
        assert!(result.warning().unwrap().contains("no availability"));
    }

    #[tokio::test]
    async fn test_insufficient_capacity_stops_before_enumeration() {
        // 8h window with 6h booked leaves 2h; requesting 4h must warn with
        // the shortfall and produce no slots.
        let repo = seeded_repo(Some((9, 17)));
        seed_booking(&repo, 9, 15).await;

        let result = finder(repo)
            .find(StaffId::new(1), monday(), 4.0)
            .await
            .unwrap();

        match result {
            SlotSearch::InsufficientCapacity {
                remaining_hours,
                requested_hours,
                ref message,
            } => {
                assert_eq!(remaining_hours, 2.0);
                assert_eq!(requested_hours, 4.0);
                assert!(message.contains("split the work across days"));
            }
            other => panic!("expected InsufficientCapacity, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fragmented_day_warns_instead_of_silence() {
        // 09:00-17:00 with bookings 11-12 and 14-15: 6h free in total but no
        // contiguous 4h run.
        let repo = seeded_repo(Some((9, 17)));
        seed_booking(&repo, 11, 12).await;
        seed_booking(&repo, 14, 15).await;

        let result = finder(repo)
            .find(StaffId::new(1), monday(), 4.0)
            .await
            .unwrap();

        match result {
            SlotSearch::Fragmented {
                remaining_hours, ..
            } => assert_eq!(remaining_hours, 6.0),
            other => panic!("expected Fragmented, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_weekend_yields_no_slots() {
        let repo = Arc::new(LocalRepository::new());
        repo.add_window(AvailabilityWindow {
            staff_id: StaffId::new(1),
            weekday: Weekday::Sat,
            start: t(9),
            end: t(17),
            is_available: true,
        })
        .unwrap();

        // 2026-03-07 is a Saturday; even with a seeded Saturday window the
        // finder refuses it.
        let saturday = NaiveDate::from_ymd_opt(2026, 3, 7).unwrap();
        let result = finder(repo)
            .find(StaffId::new(1), saturday, 2.0)
            .await
            .unwrap();
        assert!(matches!(result, SlotSearch::NoAvailability { .. }));
    }

    #[tokio::test]
    async fn test_full_day_time_off_blocks_day() {
        let repo = seeded_repo(Some((9, 17)));
        repo.add_time_off(TimeOff {
            staff_id: StaffId::new(1),
            start_date: monday(),
            end_date: monday(),
            is_full_day: true,
            start: None,
            end: None,
            status: TimeOffStatus::Approved,
        })
        .unwrap();

        let result = finder(repo)
            .find(StaffId::new(1), monday(), 2.0)
            .await
            .unwrap();
        assert!(matches!(result, SlotSearch::NoAvailability { .. }));
        assert!(result.warning().unwrap().contains("time off"));
    }

    #[tokio::test]
    async fn test_partial_time_off_excludes_its_range() {
        let repo = seeded_repo(Some((9, 17)));
        repo.add_time_off(TimeOff {
            staff_id: StaffId::new(1),
            start_date: monday(),
            end_date: monday(),
            is_full_day: false,
            start: Some(t(9)),
            end: Some(t(12)),
            status: TimeOffStatus::Approved,
        })
        .unwrap();

        let result = finder(repo)
            .find(StaffId::new(1), monday(), 4.0)
            .await
            .unwrap();
        let starts: Vec<_> = result
            .candidates()
            .expect("expected candidates")
            .iter()
            .map(|s| s.start)
            .collect();
        assert_eq!(starts, vec![t(12), t(13)]);
    }

    #[tokio::test]
    async fn test_exact_fit_single_candidate() {
        let repo = seeded_repo(Some((9, 17)));
        let result = finder(repo)
            .find(StaffId::new(1), monday(), 8.0)
            .await
            .unwrap();
        let slots = result.candidates().expect("expected candidates");
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].start, t(9));
        assert_eq!(slots[0].end, t(17));
    }

    #[tokio::test]
    async fn test_nonpositive_request_rejected() {
        let repo = seeded_repo(Some((9, 17)));
        assert!(finder(repo)
            .find(StaffId::new(1), monday(), 0.0)
            .await
            .is_err());
    }
}
