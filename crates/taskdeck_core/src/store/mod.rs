//! In-memory stores synchronized to key-value storage.
//!
//! # Responsibility
//! - Own the task, category and settings collections for one session.
//! - Apply every mutation to memory first, then persist the whole collection.
//! - Compose the stores into `AppState`, which cascades category deletes and
//!   notifies subscribers.
//!
//! # Invariants
//! - Persistence is best-effort: a failed write is logged and the in-memory
//!   change stands.
//! - Unknown ids are reported as `None` / `false`, never as errors.
//! - Concurrent sessions on the same storage overwrite each other (last write
//!   wins); no cross-session locking exists.

pub mod app_state;
pub mod category_store;
pub mod settings_store;
pub mod task_store;
