//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical task structure used by storage, filters and export.
//!
//! # Invariants
//! - A `Task` value only exists after title/id/date validation succeeded.

pub mod task;
