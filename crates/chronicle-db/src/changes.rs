//! Pending-change input contract.
//!
//! The persistence collaborator hands the commit coordinator a `ChangeSet`:
//! one `PendingChange` per entity whose state is Added, Modified, or
//! Deleted, each carrying its prior/current snapshots and the SQL mutations
//! (`DataOp`) that perform the business change. The coordinator runs data
//! ops and audit inserts in one transaction, so the two commit or roll back
//! together.

use chronicle_core::enums::EventType;
use chronicle_core::snapshot::Snapshot;

/// One SQL statement of the business mutation.
#[derive(Debug, Clone)]
pub struct DataOp {
    pub sql: String,
    pub params: Vec<libsql::Value>,
}

/// One entity's pending change, as observed by the persistence layer.
#[derive(Debug, Clone)]
pub struct PendingChange {
    /// Logical entity name, as registered in the tracking registry.
    pub entity: String,
    /// Change classification from the persistence layer. `SoftDeleted` is
    /// normally derived by the coordinator, not passed in.
    pub kind: EventType,
    /// Original-values view. Empty for additions.
    pub prior: Snapshot,
    /// Current values. Empty for deletions.
    pub current: Snapshot,
    /// Business mutations to run in the same transaction.
    pub ops: Vec<DataOp>,
}

impl PendingChange {
    #[must_use]
    pub fn added(entity: impl Into<String>, current: Snapshot) -> Self {
        Self {
            entity: entity.into(),
            kind: EventType::Added,
            prior: Snapshot::new(),
            current,
            ops: Vec::new(),
        }
    }

    #[must_use]
    pub fn modified(entity: impl Into<String>, prior: Snapshot, current: Snapshot) -> Self {
        Self {
            entity: entity.into(),
            kind: EventType::Modified,
            prior,
            current,
            ops: Vec::new(),
        }
    }

    #[must_use]
    pub fn deleted(entity: impl Into<String>, prior: Snapshot) -> Self {
        Self {
            entity: entity.into(),
            kind: EventType::Deleted,
            prior,
            current: Snapshot::new(),
            ops: Vec::new(),
        }
    }

    /// Attach a business mutation, chaining.
    #[must_use]
    pub fn op(mut self, sql: impl Into<String>, params: Vec<libsql::Value>) -> Self {
        self.ops.push(DataOp {
            sql: sql.into(),
            params,
        });
        self
    }
}

/// The batch of pending changes for one save operation.
#[derive(Debug, Clone, Default)]
pub struct ChangeSet {
    changes: Vec<PendingChange>,
}

impl ChangeSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a change, chaining.
    #[must_use]
    pub fn with(mut self, change: PendingChange) -> Self {
        self.changes.push(change);
        self
    }

    pub fn push(&mut self, change: PendingChange) {
        self.changes.push(change);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PendingChange> {
        self.changes.iter()
    }
}

impl<'a> IntoIterator for &'a ChangeSet {
    type Item = &'a PendingChange;
    type IntoIter = std::slice::Iter<'a, PendingChange>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
