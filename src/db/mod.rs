//! Persistence abstraction for the scheduling engine.
//!
//! The engine never talks to a database directly: all reads (availability
//! windows, bookings, time off, roster) and writes (booking rows) go through
//! the repository traits in this module, allowing storage backends to be
//! swapped easily.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Application layer (CRM, dashboards, confirmation UI)    │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Scheduling engine (scheduler/) - business logic         │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository traits (repository/) - abstract interface    │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!     ┌──────────────────────────────────────────────┐
//!     │             Local repository                  │
//!     │               (in-memory)                     │
//!     └──────────────────────────────────────────────┘
//! ```
//!
//! The module includes:
//! - `repository`: trait definitions and error types
//! - `repositories::local`: in-memory implementation for unit testing and
//!   local development
//! - `factory`: factory for creating repository instances
//!
//! A production deployment backs the traits with a conventional relational
//! store. The booking insert/update contract requires the backend to enforce
//! the non-overlap invariant atomically (see [`repository::BookingRepository`]).

pub mod factory;
pub mod repositories;
pub mod repository;

pub use factory::{RepositoryFactory, RepositoryType};
pub use repositories::LocalRepository;
pub use repository::{
    AvailabilityRepository, BookingRepository, ErrorContext, FullRepository, RepositoryError,
    RepositoryResult, StaffRepository, TimeOffRepository,
};
