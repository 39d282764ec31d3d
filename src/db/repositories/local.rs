//! In-memory repository implementation.
//!
//! `LocalRepository` backs the repository traits with `parking_lot` maps. It
//! exists for unit testing and local development, but it honors the same
//! write contract a production backend must: booking inserts and updates
//! re-verify the non-overlap invariant under the write lock, so two
//! concurrent confirms of the same slot cannot both succeed.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::debug;

use crate::api::{
    AvailabilityWindow, Booking, BookingId, DateRange, StaffId, StaffMember, TimeOff,
};
use crate::db::repository::{
    AvailabilityRepository, BookingRepository, ErrorContext, FullRepository, RepositoryError,
    RepositoryResult, StaffRepository, TimeOffRepository,
};
use crate::models::hours_between;

#[derive(Default)]
struct Inner {
    staff: HashMap<StaffId, StaffMember>,
    windows: HashMap<StaffId, Vec<AvailabilityWindow>>,
    bookings: HashMap<StaffId, Vec<Booking>>,
    time_off: HashMap<StaffId, Vec<TimeOff>>,
    next_booking_id: i64,
}

/// In-memory repository for unit testing and local development.
pub struct LocalRepository {
    inner: RwLock<Inner>,
}

impl LocalRepository {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                next_booking_id: 1,
                ..Default::default()
            }),
        }
    }

    /// Seed a roster record.
    pub fn add_staff(&self, member: StaffMember) {
        self.inner.write().staff.insert(member.id, member);
    }

    /// Seed an availability window.
    ///
    /// Replaces any existing window for the same (staff, weekday), keeping
    /// the at-most-one-per-weekday invariant.
    pub fn add_window(&self, window: AvailabilityWindow) -> RepositoryResult<()> {
        if window.end <= window.start {
            return Err(RepositoryError::validation_with_context(
                "availability window must end after it starts",
                ErrorContext::new("add_window").with_entity("availability_window"),
            ));
        }
        let mut inner = self.inner.write();
        let windows = inner.windows.entry(window.staff_id).or_default();
        windows.retain(|w| w.weekday != window.weekday);
        windows.push(window);
        Ok(())
    }

    /// Seed a time-off entry.
    pub fn add_time_off(&self, entry: TimeOff) -> RepositoryResult<()> {
        if entry.end_date < entry.start_date {
            return Err(RepositoryError::validation_with_context(
                "time off must not end before it starts",
                ErrorContext::new("add_time_off").with_entity("time_off"),
            ));
        }
        self.inner
            .write()
            .time_off
            .entry(entry.staff_id)
            .or_default()
            .push(entry);
        Ok(())
    }

    /// Number of stored bookings across all staff. Test helper.
    pub fn booking_count(&self) -> usize {
        self.inner.read().bookings.values().map(Vec::len).sum()
    }

    fn validate_booking(booking: &Booking) -> RepositoryResult<()> {
        let span = hours_between(booking.start, booking.end);
        if span <= 0.0 {
            return Err(RepositoryError::validation_with_context(
                "booking must end after it starts",
                ErrorContext::new("validate_booking").with_entity("booking"),
            ));
        }
        if (span - booking.hours).abs() > 1e-9 {
            return Err(RepositoryError::validation_with_context(
                format!(
                    "booking hours {} do not match its time range ({} h)",
                    booking.hours, span
                ),
                ErrorContext::new("validate_booking").with_entity("booking"),
            ));
        }
        Ok(())
    }

    /// Conflict check against every active booking on the same staff/date.
    /// `exclude` skips the row being updated.
    fn find_conflict(inner: &Inner, booking: &Booking, exclude: Option<BookingId>) -> bool {
        inner
            .bookings
            .get(&booking.staff_id)
            .map(|rows| {
                rows.iter().any(|b| {
                    b.id != exclude
                        && b.date == booking.date
                        && b.is_active()
                        && b.overlaps(booking.start, booking.end)
                })
            })
            .unwrap_or(false)
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AvailabilityRepository for LocalRepository {
    async fn fetch_windows(&self, staff_id: StaffId) -> RepositoryResult<Vec<AvailabilityWindow>> {
        Ok(self
            .inner
            .read()
            .windows
            .get(&staff_id)
            .cloned()
            .unwrap_or_default())
    }
}

#[async_trait]
impl BookingRepository for LocalRepository {
    async fn fetch_bookings(
        &self,
        staff_id: StaffId,
        range: DateRange,
    ) -> RepositoryResult<Vec<Booking>> {
        Ok(self
            .inner
            .read()
            .bookings
            .get(&staff_id)
            .map(|rows| {
                rows.iter()
                    .filter(|b| range.contains(b.date))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn fetch_booking(&self, id: BookingId) -> RepositoryResult<Booking> {
        self.inner
            .read()
            .bookings
            .values()
            .flatten()
            .find(|b| b.id == Some(id))
            .cloned()
            .ok_or_else(|| {
                RepositoryError::not_found_with_context(
                    format!("booking {} does not exist", id),
                    ErrorContext::new("fetch_booking")
                        .with_entity("booking")
                        .with_entity_id(id),
                )
            })
    }

    async fn insert_booking(&self, mut booking: Booking) -> RepositoryResult<Booking> {
        Self::validate_booking(&booking)?;

        let mut inner = self.inner.write();
        if Self::find_conflict(&inner, &booking, None) {
            return Err(RepositoryError::conflict_with_context(
                format!(
                    "staff {} already has an active booking overlapping {} {}-{}",
                    booking.staff_id, booking.date, booking.start, booking.end
                ),
                ErrorContext::new("insert_booking").with_entity("booking"),
            ));
        }

        let id = BookingId::new(inner.next_booking_id);
        inner.next_booking_id += 1;
        booking.id = Some(id);
        debug!(booking_id = id.value(), staff_id = booking.staff_id.value(), date = %booking.date, "booking inserted");
        inner
            .bookings
            .entry(booking.staff_id)
            .or_default()
            .push(booking.clone());
        Ok(booking)
    }

    async fn update_booking(&self, booking: Booking) -> RepositoryResult<Booking> {
        let id = booking.id.ok_or_else(|| {
            RepositoryError::validation_with_context(
                "cannot update a booking without an id",
                ErrorContext::new("update_booking").with_entity("booking"),
            )
        })?;
        Self::validate_booking(&booking)?;

        let mut inner = self.inner.write();
        if Self::find_conflict(&inner, &booking, Some(id)) {
            return Err(RepositoryError::conflict_with_context(
                format!(
                    "staff {} already has an active booking overlapping {} {}-{}",
                    booking.staff_id, booking.date, booking.start, booking.end
                ),
                ErrorContext::new("update_booking")
                    .with_entity("booking")
                    .with_entity_id(id),
            ));
        }

        // The booking may have moved to a different staff member.
        let existed = inner
            .bookings
            .values_mut()
            .any(|rows| {
                let before = rows.len();
                rows.retain(|b| b.id != Some(id));
                rows.len() != before
            });
        if !existed {
            return Err(RepositoryError::not_found_with_context(
                format!("booking {} does not exist", id),
                ErrorContext::new("update_booking")
                    .with_entity("booking")
                    .with_entity_id(id),
            ));
        }

        inner
            .bookings
            .entry(booking.staff_id)
            .or_default()
            .push(booking.clone());
        Ok(booking)
    }
}

#[async_trait]
impl TimeOffRepository for LocalRepository {
    async fn fetch_time_off(
        &self,
        staff_id: StaffId,
        range: DateRange,
    ) -> RepositoryResult<Vec<TimeOff>> {
        Ok(self
            .inner
            .read()
            .time_off
            .get(&staff_id)
            .map(|rows| {
                rows.iter()
                    .filter(|t| t.start_date <= range.to && t.end_date >= range.from)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}

#[async_trait]
impl StaffRepository for LocalRepository {
    async fn fetch_staff(&self, id: StaffId) -> RepositoryResult<StaffMember> {
        self.inner.read().staff.get(&id).cloned().ok_or_else(|| {
            RepositoryError::not_found_with_context(
                format!("staff member {} does not exist", id),
                ErrorContext::new("fetch_staff")
                    .with_entity("staff")
                    .with_entity_id(id),
            )
        })
    }

    async fn list_staff(&self) -> RepositoryResult<Vec<StaffMember>> {
        let mut roster: Vec<StaffMember> = self.inner.read().staff.values().cloned().collect();
        roster.sort_by_key(|m| m.id);
        Ok(roster)
    }
}

#[async_trait]
impl FullRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(true)
    }
}
