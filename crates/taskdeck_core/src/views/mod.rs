//! Read-only projections over the task list.
//!
//! # Responsibility
//! - Compute filtered subsets, search results, aggregate stats and the
//!   dashboard summary from a task slice.
//!
//! # Invariants
//! - Every function here is pure: input order is preserved and `now` is an
//!   explicit argument, never read from the system clock.

pub mod dashboard;
pub mod derive;
pub mod filter;
