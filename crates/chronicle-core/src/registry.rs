//! Tracking registry: which entities are audited, and how.
//!
//! Chronicle never inspects entity shapes at runtime. Each audit-enabled
//! entity is described once at startup by an [`EntityDescriptor`] and the
//! resulting [`TrackingRegistry`] is immutable from then on — share it via
//! `Arc` and read it from any number of concurrent saves.

use std::collections::{BTreeMap, BTreeSet};

use crate::errors::TrackingError;

/// Per-entity tracking metadata: table name, ordered key fields, excluded
/// fields, column-name overrides, and the optional soft-delete flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityDescriptor {
    entity: String,
    table: String,
    key_fields: Vec<String>,
    excluded: BTreeSet<String>,
    column_names: BTreeMap<String, String>,
    soft_delete_field: Option<String>,
}

impl EntityDescriptor {
    /// Describe an entity with its ordered primary-key fields.
    ///
    /// The table name defaults to the naive plural of the entity name;
    /// override it with [`table`](Self::table) when the mapping differs.
    #[must_use]
    pub fn new<I, S>(entity: impl Into<String>, key_fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entity = entity.into();
        let table = pluralize(&entity);
        Self {
            entity,
            table,
            key_fields: key_fields.into_iter().map(Into::into).collect(),
            excluded: BTreeSet::new(),
            column_names: BTreeMap::new(),
            soft_delete_field: None,
        }
    }

    /// Override the storage table name.
    #[must_use]
    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    /// Opt a field out of tracking. Excluded fields never appear in diffs.
    #[must_use]
    pub fn exclude(mut self, field: impl Into<String>) -> Self {
        self.excluded.insert(field.into());
        self
    }

    /// Record that `field` is stored under a different column name
    /// (foreign-key backing columns whose storage name differs from the
    /// snapshot field name).
    #[must_use]
    pub fn column_name(mut self, field: impl Into<String>, column: impl Into<String>) -> Self {
        self.column_names.insert(field.into(), column.into());
        self
    }

    /// Declare the boolean soft-delete flag for this entity.
    ///
    /// Soft deletion is never inferred from a field's name; without this
    /// declaration a flag flip is audited as a plain modification.
    #[must_use]
    pub fn soft_delete(mut self, field: impl Into<String>) -> Self {
        self.soft_delete_field = Some(field.into());
        self
    }

    #[must_use]
    pub fn entity(&self) -> &str {
        &self.entity
    }

    #[must_use]
    pub fn table_name(&self) -> &str {
        &self.table
    }

    /// Primary-key field names in declared order.
    #[must_use]
    pub fn key_fields(&self) -> &[String] {
        &self.key_fields
    }

    #[must_use]
    pub fn is_excluded(&self, field: &str) -> bool {
        self.excluded.contains(field)
    }

    /// Storage column override for `field`, if one was declared.
    #[must_use]
    pub fn column_for(&self, field: &str) -> Option<&str> {
        self.column_names.get(field).map(String::as_str)
    }

    #[must_use]
    pub fn soft_delete_field(&self) -> Option<&str> {
        self.soft_delete_field.as_deref()
    }
}

/// Immutable map of entity name → descriptor.
///
/// An entity with no descriptor is not audited: every change kind for it is
/// a valid no-op, not an error.
#[derive(Debug, Default)]
pub struct TrackingRegistry {
    entities: BTreeMap<String, EntityDescriptor>,
}

impl TrackingRegistry {
    #[must_use]
    pub fn builder() -> TrackingRegistryBuilder {
        TrackingRegistryBuilder {
            descriptors: Vec::new(),
        }
    }

    /// Look up tracking metadata. `None` means tracking is disabled for
    /// this entity type.
    #[must_use]
    pub fn resolve(&self, entity: &str) -> Option<&EntityDescriptor> {
        self.entities.get(entity)
    }

    #[must_use]
    pub fn is_tracked(&self, entity: &str) -> bool {
        self.entities.contains_key(entity)
    }

    /// Table name for an entity: the descriptor's table, or the plural
    /// fallback when the entity was never registered. The fallback lets the
    /// typed query surface return an empty result set for unknown names
    /// instead of erroring.
    #[must_use]
    pub fn table_for(&self, entity: &str) -> String {
        self.resolve(entity)
            .map_or_else(|| pluralize(entity), |d| d.table_name().to_string())
    }
}

/// Collects descriptors, then validates the whole set at once.
pub struct TrackingRegistryBuilder {
    descriptors: Vec<EntityDescriptor>,
}

impl TrackingRegistryBuilder {
    /// Register a descriptor.
    #[must_use]
    pub fn track(mut self, descriptor: EntityDescriptor) -> Self {
        self.descriptors.push(descriptor);
        self
    }

    /// Validate and freeze the registry.
    ///
    /// # Errors
    ///
    /// Returns `TrackingError::NoKeyFields` for a descriptor without keys and
    /// `TrackingError::DuplicateEntity` when the same entity name was
    /// registered twice. Both are configuration errors and must surface
    /// before any diffing happens.
    pub fn build(self) -> Result<TrackingRegistry, TrackingError> {
        let mut entities = BTreeMap::new();
        for descriptor in self.descriptors {
            if descriptor.key_fields.is_empty() {
                return Err(TrackingError::NoKeyFields {
                    entity: descriptor.entity,
                });
            }
            let name = descriptor.entity.clone();
            if entities.insert(name.clone(), descriptor).is_some() {
                return Err(TrackingError::DuplicateEntity { entity: name });
            }
        }
        Ok(TrackingRegistry { entities })
    }
}

/// Naive pluralization used for table-name fallback.
fn pluralize(entity: &str) -> String {
    format!("{entity}s")
}
