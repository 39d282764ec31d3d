//! The scheduling engine.
//!
//! Components in dependency order, leaves first:
//!
//! - [`AvailabilityCatalog`] and [`CommitmentLedger`] are pure readers over
//!   the repository.
//! - [`SingleDaySlotFinder`] consumes both to enumerate candidate slots of a
//!   requested duration on one date.
//! - [`MultiDayAllocator`] reuses the same daily-capacity computation across
//!   a bounded lookahead horizon when no single day suffices.
//! - [`BookingTransactionCoordinator`] turns a confirmed slot or slot
//!   sequence into persisted booking rows, which invalidates the ledger for
//!   any subsequent planning round.
//!
//! Every computation runs synchronously within one user-triggered flow to
//! completion; there is no background worker or queue. All planning entry
//! points take an explicit reference date instead of reading the wall clock.

pub mod allocator;
pub mod catalog;
pub mod coordinator;
pub mod ledger;
pub mod slot_finder;

pub use allocator::MultiDayAllocator;
pub use catalog::AvailabilityCatalog;
pub use coordinator::{BookingTransactionCoordinator, DualBooking, Reassignment, SchedulingError};
pub use ledger::{CommitmentLedger, DayCommitments};
pub use slot_finder::SingleDaySlotFinder;
