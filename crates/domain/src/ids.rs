use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

macro_rules! define_id {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }
    };
}

/// Maximum length of externally assigned keys (chat user ids, catalog ids)
const MAX_KEY_LENGTH: usize = 100;

/// String keys assigned outside the engine: validated (non-empty, trimmed,
/// bounded) at construction, opaque afterwards.
macro_rules! define_key {
    ($name:ident, $label:literal) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
                let value = value.into();
                let trimmed = value.trim();
                if trimmed.is_empty() {
                    return Err(DomainError::invalid_id(concat!($label, " cannot be empty")));
                }
                if trimmed.len() > MAX_KEY_LENGTH {
                    return Err(DomainError::invalid_id(format!(
                        "{} cannot exceed {} characters",
                        $label, MAX_KEY_LENGTH
                    )));
                }
                Ok(Self(trimmed.to_string()))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = DomainError;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                Self::new(s)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> String {
                value.0
            }
        }
    };
}

// Quest IDs
define_id!(QuestId);
define_id!(QuestSetId);

// Externally assigned keys
define_key!(UserId, "User id");
define_key!(CardId, "Card id");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_id_is_trimmed() {
        let id = UserId::new("  123456789  ").expect("valid id");
        assert_eq!(id.as_str(), "123456789");
    }

    #[test]
    fn empty_card_id_is_rejected() {
        let err = CardId::new("   ").expect_err("blank id must fail");
        assert!(matches!(err, DomainError::InvalidId(_)));
    }

    #[test]
    fn overlong_key_is_rejected() {
        assert!(UserId::new("x".repeat(MAX_KEY_LENGTH + 1)).is_err());
    }

    #[test]
    fn card_id_deserializes_through_validation() {
        let id: CardId = serde_json::from_str("\"zoro_b_01\"").expect("valid json");
        assert_eq!(id.as_str(), "zoro_b_01");
        assert!(serde_json::from_str::<CardId>("\"\"").is_err());
    }

    #[test]
    fn quest_ids_are_unique() {
        assert_ne!(QuestId::new(), QuestId::new());
    }
}
