//! Task selection by optional criteria.
//!
//! # Responsibility
//! - Provide pure, order-preserving filters over a task list.
//!
//! # Invariants
//! - An absent criterion passes every task through unchanged.
//! - Criteria combine by intersection.

pub mod criteria;
