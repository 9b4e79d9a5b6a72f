//! Domain records for tasks, categories and user settings.
//!
//! # Responsibility
//! - Define the persisted shapes (`camelCase` JSON) of every record.
//! - Own record-level invariants and the factory/patch helpers that keep them.
//!
//! # Invariants
//! - Record ids are generated once by a factory and never change.
//! - Titles and names are stored trimmed and are never blank.

pub mod category;
pub mod settings;
pub mod task;
