//! # saks-core
//!
//! Core types shared across all Saks crates.
//!
//! This crate provides the foundational, I/O-free pieces of the board case tracker:
//! - Entity structs for cases, comments, meetings, agenda items, minutes and audit records
//! - Enums for statuses, priorities, outcomes, audit actions and PDF document types
//! - Sequence scopes partitioning the gap-free counters
//! - Structured snapshot payloads captured by the audit trail
//! - The case timeline merge
//! - Cross-cutting error types

pub mod entities;
pub mod enums;
pub mod errors;
pub mod sequence;
pub mod snapshot;
pub mod timeline;
