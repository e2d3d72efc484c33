//! User attribution for save batches.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Who performed a change. Attached to a whole save batch, not to
/// individual entities.
///
/// Both forms are stored stringified in the single `user_name` column, so
/// numeric and string principals query uniformly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum UserRef {
    /// A username or other string principal.
    Name(String),
    /// A numeric user id, e.g. from an identity provider.
    Id(i64),
}

impl UserRef {
    /// The canonical string stored in `audit_log.user_name`.
    #[must_use]
    pub fn as_user_name(&self) -> String {
        match self {
            Self::Name(name) => name.clone(),
            Self::Id(id) => id.to_string(),
        }
    }
}

impl From<&str> for UserRef {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for UserRef {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<i64> for UserRef {
    fn from(id: i64) -> Self {
        Self::Id(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_id_stringifies() {
        assert_eq!(UserRef::from(42).as_user_name(), "42");
        assert_eq!(UserRef::from("alice").as_user_name(), "alice");
    }
}
