//! Repository trait definitions.
//!
//! The engine consumes four narrow read/write interfaces plus an umbrella
//! trait combining them. Implementations are expected to be `Send + Sync`
//! and cheap to share behind an `Arc`.

mod error;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};

use async_trait::async_trait;

use crate::api::{
    AvailabilityWindow, Booking, BookingId, DateRange, StaffId, StaffMember, TimeOff,
};

/// Read-only access to recurring per-weekday availability windows.
#[async_trait]
pub trait AvailabilityRepository: Send + Sync {
    /// Fetch all availability windows for a staff member.
    ///
    /// At most one window per weekday is meaningful; implementations return
    /// rows as stored, without merging or filtering.
    async fn fetch_windows(&self, staff_id: StaffId) -> RepositoryResult<Vec<AvailabilityWindow>>;
}

/// Booking reads and writes.
///
/// # Write contract
///
/// `insert_booking` and `update_booking` must re-verify the non-overlap
/// invariant (no two active bookings for one staff member overlap in time on
/// the same date) inside the store's critical section and fail with
/// [`RepositoryError::Conflict`] when it would be violated. Relational
/// backends satisfy this with an exclusion constraint on
/// (staff_id, date, time range); the in-memory backend checks under its
/// write lock. Planning reads happen in separate round-trips, so this check
/// is what prevents a concurrent actor from double-booking a slot between
/// read and write.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Fetch bookings for a staff member within an inclusive date range.
    /// Returns raw, unmerged rows including cancelled ones.
    async fn fetch_bookings(
        &self,
        staff_id: StaffId,
        range: DateRange,
    ) -> RepositoryResult<Vec<Booking>>;

    /// Fetch a single booking by id.
    async fn fetch_booking(&self, id: BookingId) -> RepositoryResult<Booking>;

    /// Insert a booking, assigning its id. Atomic w.r.t. the non-overlap
    /// invariant (see trait docs).
    async fn insert_booking(&self, booking: Booking) -> RepositoryResult<Booking>;

    /// Update an existing booking in place. Atomic w.r.t. the non-overlap
    /// invariant; the row being updated is excluded from its own check.
    async fn update_booking(&self, booking: Booking) -> RepositoryResult<Booking>;
}

/// Read-only access to time-off entries.
#[async_trait]
pub trait TimeOffRepository: Send + Sync {
    /// Fetch time-off entries for a staff member that intersect an inclusive
    /// date range. Returns raw rows in all approval states.
    async fn fetch_time_off(
        &self,
        staff_id: StaffId,
        range: DateRange,
    ) -> RepositoryResult<Vec<TimeOff>>;
}

/// Read-only access to the staff roster.
#[async_trait]
pub trait StaffRepository: Send + Sync {
    /// Fetch a single roster record.
    async fn fetch_staff(&self, id: StaffId) -> RepositoryResult<StaffMember>;

    /// List the full roster in stable order.
    async fn list_staff(&self) -> RepositoryResult<Vec<StaffMember>>;
}

/// Umbrella trait for backends implementing the full persistence surface.
#[async_trait]
pub trait FullRepository:
    AvailabilityRepository + BookingRepository + TimeOffRepository + StaffRepository
{
    /// Verify the backend is reachable.
    async fn health_check(&self) -> RepositoryResult<bool>;
}
