//! # chronicle-core
//!
//! Core types and the diff/assembly pipeline for Chronicle, an entity-level
//! change-auditing engine.
//!
//! This crate provides the pure, non-suspending half of the system:
//! - Audit log entities (`AuditLog`, `AuditLogDetail`)
//! - Event type enum and user attribution
//! - The tracking registry (per-entity metadata: keys, exclusions, table names)
//! - Snapshot values and culture-invariant rendering
//! - Record-id formatting for single and composite keys
//! - The property diff engine and the audit log assembler
//!
//! Everything here is deterministic and side-effect free. Persistence lives
//! in `chronicle-db`, which feeds pending changes through this pipeline and
//! writes the results inside the same transaction as the data change.

pub mod assembler;
pub mod diff;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod identity;
pub mod key;
pub mod registry;
pub mod snapshot;
