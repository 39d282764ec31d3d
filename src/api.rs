//! Public API surface for the scheduling engine.
//!
//! This file consolidates the DTO types shared by the engine and its callers.
//! All types derive Serialize/Deserialize for JSON serialization.

use chrono::{NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::models::hours_between;

/// Staff member identifier (database primary key).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StaffId(pub i64);

/// Project identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProjectId(pub i64);

/// Booking identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BookingId(pub i64);

impl StaffId {
    pub fn new(value: i64) -> Self {
        StaffId(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl ProjectId {
    pub fn new(value: i64) -> Self {
        ProjectId(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl BookingId {
    pub fn new(value: i64) -> Self {
        BookingId(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for StaffId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl std::fmt::Display for ProjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl std::fmt::Display for BookingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Roster record for a staff member.
///
/// The `department` field is used to suggest same-department alternates when
/// a capacity warning is raised.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffMember {
    pub id: StaffId,
    pub name: String,
    pub role: String,
    pub department: String,
}

/// A staff member's recurring working hours for one weekday.
///
/// At most one window per (staff, weekday) is meaningful; the absence of a
/// window means zero capacity for that weekday. A window with
/// `is_available = false` is treated the same as an absent window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityWindow {
    pub staff_id: StaffId,
    pub weekday: Weekday,
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub is_available: bool,
}

impl AvailabilityWindow {
    /// Length of the working window in hours.
    pub fn span_hours(&self) -> f64 {
        hours_between(self.start, self.end)
    }
}

/// Lifecycle status of a booking.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

/// Kind tag for dual shoot+edit bookings.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingKind {
    Shoot,
    Edit,
}

/// Position of a booking inside a multi-day sequence (1-based).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceTag {
    pub index: u32,
    pub total: u32,
}

/// A persisted (or about-to-be-persisted) booking row.
///
/// Invariant: `hours` equals the span between `start` and `end`, and no two
/// active bookings for the same staff member overlap in time on the same
/// date. The repository enforces the overlap invariant at insert/update time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    /// Database ID (server-assigned on insert).
    #[serde(default)]
    pub id: Option<BookingId>,
    pub project_id: ProjectId,
    pub staff_id: StaffId,
    pub date: NaiveDate,
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub hours: f64,
    pub status: BookingStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<BookingKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence: Option<SequenceTag>,
}

impl Booking {
    /// Whether this booking counts toward a staff member's committed time.
    ///
    /// Every status except `Cancelled` occupies its interval.
    pub fn is_active(&self) -> bool {
        self.status != BookingStatus::Cancelled
    }

    /// Strict interval overlap test against another time range on the same date.
    pub fn overlaps(&self, start: NaiveTime, end: NaiveTime) -> bool {
        start < self.end && end > self.start
    }
}

/// Approval status of a time-off entry.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeOffStatus {
    Pending,
    Approved,
    Cancelled,
}

/// A time-off entry for a staff member.
///
/// Invariant: `end_date >= start_date`. Approved full-day entries block the
/// entire day's capacity; approved partial entries block their time range
/// like a booking would. Pending and cancelled entries block nothing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeOff {
    pub staff_id: StaffId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub is_full_day: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<NaiveTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<NaiveTime>,
    pub status: TimeOffStatus,
}

impl TimeOff {
    /// Whether this entry blocks capacity on the given date.
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.status == TimeOffStatus::Approved && self.start_date <= date && date <= self.end_date
    }
}

/// An ephemeral booking request. Never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRequest {
    pub staff_id: StaffId,
    pub project_id: ProjectId,
    /// Total hours needed across all sessions.
    pub total_hours: f64,
    /// Optional shoot/edit sub-split of the total.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shoot_hours: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edit_hours: Option<f64>,
    /// Earliest date the work may start.
    pub earliest: NaiveDate,
}

/// Inclusive calendar date range.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        Self { from, to }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }
}

/// A candidate contiguous interval on one date satisfying a requested
/// duration without overlapping existing commitments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateSlot {
    pub date: NaiveDate,
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub hours: f64,
}

/// One day of a multi-day allocation plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedSlot {
    pub date: NaiveDate,
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub hours: f64,
    /// 1-based position in the allocation sequence.
    pub sequence: u32,
}

/// Result of a multi-day allocation round.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultiDayPlan {
    /// True iff the allocated total covers the requested total.
    pub can_fit: bool,
    pub total_days: u32,
    pub slots: Vec<PlannedSlot>,
    /// Human-readable summary for the confirmation screen.
    pub summary: String,
}

impl MultiDayPlan {
    /// Sum of hours across all planned slots.
    pub fn allocated_hours(&self) -> f64 {
        self.slots.iter().map(|s| s.hours).sum()
    }
}

/// Outcome of a single-day slot search.
///
/// The warning variants are expected planning outcomes, not errors: each
/// carries an actionable user-facing message (switch staff, reduce hours,
/// try the multi-day path, pick another date).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SlotSearch {
    /// Valid candidates in ascending start order. The engine never
    /// auto-selects; the caller presents all of them for confirmation.
    Candidates(Vec<CandidateSlot>),
    /// No availability window for the day (or weekend / full-day time off).
    NoAvailability { message: String },
    /// A window exists but remaining capacity falls short of the request.
    InsufficientCapacity {
        remaining_hours: f64,
        requested_hours: f64,
        message: String,
    },
    /// Enough total hours remain, but no contiguous run fits.
    Fragmented {
        remaining_hours: f64,
        message: String,
    },
}

impl SlotSearch {
    /// Candidate slots, if the search produced any.
    pub fn candidates(&self) -> Option<&[CandidateSlot]> {
        match self {
            SlotSearch::Candidates(slots) => Some(slots),
            _ => None,
        }
    }

    /// The capacity-warning message, if the search produced one.
    pub fn warning(&self) -> Option<&str> {
        match self {
            SlotSearch::Candidates(_) => None,
            SlotSearch::NoAvailability { message }
            | SlotSearch::InsufficientCapacity { message, .. }
            | SlotSearch::Fragmented { message, .. } => Some(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn t(h: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, 0, 0).unwrap()
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_staff_id_new() {
        let id = StaffId::new(42);
        assert_eq!(id.value(), 42);
    }

    #[test]
    fn test_id_equality_and_hash() {
        use std::collections::HashSet;

        let mut set = HashSet::new();
        set.insert(StaffId::new(1));
        set.insert(StaffId::new(2));
        set.insert(StaffId::new(1));
        assert_eq!(set.len(), 2);

        assert_eq!(BookingId::new(7), BookingId::new(7));
        assert_ne!(ProjectId::new(1), ProjectId::new(2));
    }

    #[test]
    fn test_id_display() {
        assert_eq!(StaffId::new(5).to_string(), "5");
        assert_eq!(BookingId::new(-1).to_string(), "-1");
    }

    #[test]
    fn test_window_span_hours() {
        let window = AvailabilityWindow {
            staff_id: StaffId::new(1),
            weekday: Weekday::Mon,
            start: t(9),
            end: t(17),
            is_available: true,
        };
        assert_eq!(window.span_hours(), 8.0);
    }

    #[test]
    fn test_booking_overlap_strict() {
        let booking = Booking {
            id: None,
            project_id: ProjectId::new(1),
            staff_id: StaffId::new(1),
            date: d(2026, 3, 2),
            start: t(10),
            end: t(12),
            hours: 2.0,
            status: BookingStatus::Scheduled,
            kind: None,
            sequence: None,
        };

        assert!(booking.overlaps(t(9), t(13)));
        assert!(booking.overlaps(t(11), t(12)));
        // Touching endpoints do not overlap.
        assert!(!booking.overlaps(t(12), t(14)));
        assert!(!booking.overlaps(t(8), t(10)));
    }

    #[test]
    fn test_cancelled_booking_inactive() {
        let mut booking = Booking {
            id: None,
            project_id: ProjectId::new(1),
            staff_id: StaffId::new(1),
            date: d(2026, 3, 2),
            start: t(10),
            end: t(12),
            hours: 2.0,
            status: BookingStatus::Cancelled,
            kind: None,
            sequence: None,
        };
        assert!(!booking.is_active());

        booking.status = BookingStatus::Completed;
        assert!(booking.is_active());
    }

    #[test]
    fn test_time_off_covers() {
        let entry = TimeOff {
            staff_id: StaffId::new(1),
            start_date: d(2026, 3, 2),
            end_date: d(2026, 3, 4),
            is_full_day: true,
            start: None,
            end: None,
            status: TimeOffStatus::Approved,
        };

        assert!(entry.covers(d(2026, 3, 2)));
        assert!(entry.covers(d(2026, 3, 4)));
        assert!(!entry.covers(d(2026, 3, 5)));
    }

    #[test]
    fn test_pending_time_off_blocks_nothing() {
        let entry = TimeOff {
            staff_id: StaffId::new(1),
            start_date: d(2026, 3, 2),
            end_date: d(2026, 3, 2),
            is_full_day: true,
            start: None,
            end: None,
            status: TimeOffStatus::Pending,
        };
        assert!(!entry.covers(d(2026, 3, 2)));
    }

    #[test]
    fn test_date_range_contains() {
        let range = DateRange::new(d(2026, 3, 2), d(2026, 3, 8));
        assert!(range.contains(d(2026, 3, 2)));
        assert!(range.contains(d(2026, 3, 8)));
        assert!(!range.contains(d(2026, 3, 9)));
    }

    #[test]
    fn test_plan_allocated_hours() {
        let plan = MultiDayPlan {
            can_fit: true,
            total_days: 2,
            slots: vec![
                PlannedSlot {
                    date: d(2026, 3, 2),
                    start: t(9),
                    end: t(17),
                    hours: 8.0,
                    sequence: 1,
                },
                PlannedSlot {
                    date: d(2026, 3, 3),
                    start: t(9),
                    end: t(13),
                    hours: 4.0,
                    sequence: 2,
                },
            ],
            summary: String::new(),
        };
        assert_eq!(plan.allocated_hours(), 12.0);
    }

    #[test]
    fn test_slot_search_accessors() {
        let hit = SlotSearch::Candidates(vec![CandidateSlot {
            date: d(2026, 3, 2),
            start: t(9),
            end: t(13),
            hours: 4.0,
        }]);
        assert_eq!(hit.candidates().map(|c| c.len()), Some(1));
        assert!(hit.warning().is_none());

        let miss = SlotSearch::NoAvailability {
            message: "no availability".into(),
        };
        assert!(miss.candidates().is_none());
        assert_eq!(miss.warning(), Some("no availability"));
    }

    #[test]
    fn test_booking_serde_roundtrip() {
        let booking = Booking {
            id: Some(BookingId::new(9)),
            project_id: ProjectId::new(3),
            staff_id: StaffId::new(1),
            date: d(2026, 3, 2),
            start: t(9),
            end: t(13),
            hours: 4.0,
            status: BookingStatus::Scheduled,
            kind: Some(BookingKind::Shoot),
            sequence: None,
        };

        let json = serde_json::to_string(&booking).unwrap();
        assert!(json.contains("\"shoot\""));
        assert!(json.contains("\"scheduled\""));
        let back: Booking = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, booking.id);
        assert_eq!(back.kind, booking.kind);
    }
}
