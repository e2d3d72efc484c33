//! Repository modules implementing the save and query operations.
//!
//! Each module adds methods to `ChronicleService` via `impl ChronicleService`
//! blocks.

pub mod commit;
pub mod logs;
