//! Key-value persistence behind the stores.
//!
//! # Responsibility
//! - Define the `KeyValueRepository` contract (string keys, JSON text values).
//! - Provide SQLite and in-memory implementations.
//! - Offer typed, best-effort JSON helpers used by the stores.
//!
//! # Invariants
//! - Each key holds one whole collection; writes replace it entirely.
//! - Best-effort helpers never propagate storage errors, they log them.

pub mod json_store;
pub mod kv_repo;
pub mod memory_repo;
