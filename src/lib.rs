//! # Crewbook
//!
//! Staff booking and capacity scheduling engine.
//!
//! This crate implements the scheduling core of a staffing application: it
//! allocates a requested number of work hours for a project to a staff member
//! across one or more calendar days, respecting the staff member's recurring
//! weekly availability, their already-booked time, and approved time off.
//! The surrounding application (CRM records, chat, uploads, auth) is a
//! collaborator that supplies roster data and persists the engine's output
//! through the repository traits in [`db`].
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`api`]: Data Transfer Objects (DTOs) shared across the engine
//! - [`config`]: Engine configuration from TOML files and environment
//! - [`db`]: Repository pattern and persistence abstraction
//! - [`scheduler`]: The scheduling engine itself
//! - [`services`]: Higher-level helpers built on repository reads
//!
//! ## Scheduling pipeline
//!
//! Dependency order, leaves first:
//!
//! ```text
//! AvailabilityCatalog ─┐
//!                      ├─> SingleDaySlotFinder ─┐
//! CommitmentLedger  ───┤                        ├─> BookingTransactionCoordinator
//!                      └─> MultiDayAllocator ───┘
//! ```
//!
//! The two readers are pure lookups; the finder enumerates candidate slots on
//! one date; the allocator greedily spreads hours across a bounded lookahead
//! horizon; the coordinator turns a confirmed choice into persisted booking
//! rows. Every planning computation takes an explicit reference date, so the
//! engine is deterministic and free of wall-clock reads.

pub mod api;
pub mod config;
pub mod db;
pub mod models;
pub mod scheduler;
pub mod services;
