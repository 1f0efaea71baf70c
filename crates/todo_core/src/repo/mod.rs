//! Persistence layer for the task collection.
//!
//! # Responsibility
//! - Define the repository contract used by services.
//! - Keep file format details out of service/business orchestration.
//!
//! # Invariants
//! - The unit of storage mutation is the whole collection.

pub mod task_repo;
