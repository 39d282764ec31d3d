//! Turning confirmed slots into persisted booking rows.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use tracing::{info, warn};

use crate::api::{
    Booking, BookingId, BookingKind, BookingStatus, CandidateSlot, MultiDayPlan, ProjectId,
    SequenceTag, StaffId,
};
use crate::db::repository::{FullRepository, RepositoryError};
use crate::models::hours_between;

/// Errors surfaced by the write path.
///
/// Planning shortfalls never reach this enum; they are values inside
/// [`crate::api::SlotSearch`] and [`MultiDayPlan`]. These errors cover the
/// write phase only: invalid input, a lost race for a slot, and partial
/// multi-record writes.
#[derive(Debug, thiserror::Error)]
pub enum SchedulingError {
    /// A booking's end does not come after its start.
    #[error("booking duration must be positive (got {start} to {end})")]
    InvalidDuration { start: NaiveTime, end: NaiveTime },

    /// A concurrent actor took the slot between planning and confirmation.
    /// The caller should re-run the slot search and present fresh candidates.
    #[error("slot no longer free: {0}")]
    SlotConflict(String),

    /// A plan whose `can_fit` flag is false cannot be confirmed.
    #[error("plan does not cover the requested hours; re-run the allocator before confirming")]
    IncompletePlan,

    /// A multi-record write stopped partway. Already-written bookings remain
    /// in place; there is no automatic rollback or retry, and callers must
    /// reconcile manually.
    #[error("partial write: {written} booking(s) persisted, {failed} failed (no rollback): {source}")]
    PartialWrite {
        written: usize,
        failed: usize,
        source: RepositoryError,
    },

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// The two bookings produced by a dual shoot+edit confirmation.
#[derive(Debug, Clone)]
pub struct DualBooking {
    pub shoot: Booking,
    pub edit: Booking,
}

/// Requested changes to an existing booking. `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct Reassignment {
    pub staff_id: Option<StaffId>,
    pub date: Option<NaiveDate>,
    pub start: Option<NaiveTime>,
    pub end: Option<NaiveTime>,
}

/// Turns a user-confirmed slot or slot sequence into persisted booking
/// rows: single, dual (shoot+edit), or multi-day sequence.
///
/// Every write goes through the repository's atomic check-and-insert, so a
/// slot taken by a concurrent actor between planning and confirmation is
/// rejected as [`SchedulingError::SlotConflict`] instead of silently
/// double-booking. Abandoning a flow before confirmation persists nothing.
pub struct BookingTransactionCoordinator {
    repo: Arc<dyn FullRepository>,
}

impl BookingTransactionCoordinator {
    pub fn new(repo: Arc<dyn FullRepository>) -> Self {
        Self { repo }
    }

    fn build_booking(
        staff_id: StaffId,
        project_id: ProjectId,
        date: NaiveDate,
        start: NaiveTime,
        end: NaiveTime,
        kind: Option<BookingKind>,
        sequence: Option<SequenceTag>,
    ) -> Result<Booking, SchedulingError> {
        let hours = hours_between(start, end);
        if hours <= 0.0 {
            return Err(SchedulingError::InvalidDuration { start, end });
        }
        Ok(Booking {
            id: None,
            project_id,
            staff_id,
            date,
            start,
            end,
            hours,
            status: BookingStatus::Scheduled,
            kind,
            sequence,
        })
    }

    fn map_insert_error(err: RepositoryError) -> SchedulingError {
        if err.is_conflict() {
            SchedulingError::SlotConflict(err.to_string())
        } else {
            SchedulingError::Repository(err)
        }
    }

    /// Persist one user-chosen slot as a scheduled booking.
    pub async fn confirm_single(
        &self,
        staff_id: StaffId,
        project_id: ProjectId,
        slot: &CandidateSlot,
        kind: Option<BookingKind>,
    ) -> Result<Booking, SchedulingError> {
        let booking = Self::build_booking(
            staff_id, project_id, slot.date, slot.start, slot.end, kind, None,
        )?;
        let booking = self
            .repo
            .insert_booking(booking)
            .await
            .map_err(Self::map_insert_error)?;
        info!(
            booking_id = booking.id.map(|id| id.value()),
            staff_id = staff_id.value(),
            date = %slot.date,
            "booking confirmed"
        );
        Ok(booking)
    }

    /// Persist a dual shoot+edit confirmation: shoot first, then edit.
    ///
    /// Both slots are validated before the first write, so an invalid edit
    /// slot can never follow a persisted shoot booking. If the edit WRITE
    /// fails after the shoot write succeeded, the shoot booking is NOT
    /// rolled back; the error reports the partial state and callers must
    /// reconcile manually.
    pub async fn confirm_dual(
        &self,
        staff_id: StaffId,
        project_id: ProjectId,
        shoot_slot: &CandidateSlot,
        edit_slot: &CandidateSlot,
    ) -> Result<DualBooking, SchedulingError> {
        let shoot_booking = Self::build_booking(
            staff_id,
            project_id,
            shoot_slot.date,
            shoot_slot.start,
            shoot_slot.end,
            Some(BookingKind::Shoot),
            None,
        )?;
        let edit_booking = Self::build_booking(
            staff_id,
            project_id,
            edit_slot.date,
            edit_slot.start,
            edit_slot.end,
            Some(BookingKind::Edit),
            None,
        )?;

        let shoot = self
            .repo
            .insert_booking(shoot_booking)
            .await
            .map_err(Self::map_insert_error)?;
        match self.repo.insert_booking(edit_booking).await {
            Ok(edit) => Ok(DualBooking { shoot, edit }),
            Err(err) => {
                warn!(
                    shoot_booking_id = shoot.id.map(|id| id.value()),
                    "edit write failed after shoot write; shoot booking left in place"
                );
                Err(SchedulingError::PartialWrite {
                    written: 1,
                    failed: 1,
                    source: err,
                })
            }
        }
    }

    /// Persist a multi-day allocation plan as a booking sequence.
    ///
    /// Each row is tagged with its 1-based sequence index and the sequence
    /// total. Every slot is validated before the first write, so an invalid
    /// slot can never follow a partial write. Per-slot WRITE failures do not
    /// stop the remaining writes; failures aggregate into
    /// [`SchedulingError::PartialWrite`] with counts, and already-written
    /// bookings remain.
    pub async fn confirm_plan(
        &self,
        staff_id: StaffId,
        project_id: ProjectId,
        plan: &MultiDayPlan,
    ) -> Result<Vec<Booking>, SchedulingError> {
        if !plan.can_fit {
            return Err(SchedulingError::IncompletePlan);
        }

        let total = plan.slots.len() as u32;
        let mut bookings = Vec::with_capacity(plan.slots.len());
        for slot in &plan.slots {
            bookings.push(Self::build_booking(
                staff_id,
                project_id,
                slot.date,
                slot.start,
                slot.end,
                None,
                Some(SequenceTag {
                    index: slot.sequence,
                    total,
                }),
            )?);
        }

        let mut written = Vec::with_capacity(bookings.len());
        let mut failed = 0usize;
        let mut first_error: Option<RepositoryError> = None;

        for (slot, booking) in plan.slots.iter().zip(bookings) {
            match self.repo.insert_booking(booking).await {
                Ok(persisted) => written.push(persisted),
                Err(err) => {
                    warn!(date = %slot.date, sequence = slot.sequence, %err, "sequence write failed");
                    failed += 1;
                    first_error.get_or_insert(err);
                }
            }
        }

        if failed > 0 {
            return Err(SchedulingError::PartialWrite {
                written: written.len(),
                failed,
                // First failure stands in for the aggregate.
                source: first_error.unwrap_or_else(|| {
                    RepositoryError::internal("sequence write failed without an error")
                }),
            });
        }

        info!(
            staff_id = staff_id.value(),
            bookings = written.len(),
            "multi-day sequence confirmed"
        );
        Ok(written)
    }

    /// Change a booking's staff assignment and/or time.
    ///
    /// Duration is recomputed from the new start/end, rejecting non-positive
    /// spans. No capacity re-validation happens here; callers should re-run
    /// the slot finder before reassigning. The store still enforces the
    /// non-overlap invariant, so a move onto occupied time fails with
    /// [`SchedulingError::SlotConflict`].
    pub async fn reassign(
        &self,
        id: BookingId,
        changes: Reassignment,
    ) -> Result<Booking, SchedulingError> {
        let mut booking = self.repo.fetch_booking(id).await?;

        if let Some(staff_id) = changes.staff_id {
            booking.staff_id = staff_id;
        }
        if let Some(date) = changes.date {
            booking.date = date;
        }
        if let Some(start) = changes.start {
            booking.start = start;
        }
        if let Some(end) = changes.end {
            booking.end = end;
        }

        let hours = hours_between(booking.start, booking.end);
        if hours <= 0.0 {
            return Err(SchedulingError::InvalidDuration {
                start: booking.start,
                end: booking.end,
            });
        }
        booking.hours = hours;

        self.repo
            .update_booking(booking)
            .await
            .map_err(Self::map_insert_error)
    }
}
