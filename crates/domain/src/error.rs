//! Unified error types for the domain layer
//!
//! Covers the failure taxonomy shared by every economy operation. Storage
//! failures are not represented here; they belong to the engine's port layer.

use thiserror::Error;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// Validation failed (e.g., an out-of-range amount)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Invalid ID format
    #[error("Invalid ID format: {0}")]
    InvalidId(String),

    /// Entity not found
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// The user does not hold enough of a consumable resource
    #[error("Not enough {resource}: need {required}, have {available}")]
    InsufficientResource {
        resource: &'static str,
        required: u64,
        available: u64,
    },

    /// Static configuration is malformed; detected at start-up
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Parse error (for value objects)
    #[error("Parse error: {0}")]
    Parse(String),
}

impl DomainError {
    /// Creates a validation error for rejected inputs.
    ///
    /// # Example
    /// ```ignore
    /// if amount == 0 {
    ///     return Err(DomainError::validation("Amount must be at least 1"));
    /// }
    /// ```
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a not found error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Create an insufficient resource error
    pub fn insufficient(resource: &'static str, required: u64, available: u64) -> Self {
        Self::InsufficientResource {
            resource,
            required,
            available,
        }
    }

    /// Creates a configuration error.
    ///
    /// Only raised while loading settings or the catalog. Callers treat it as
    /// fatal and refuse to start.
    pub fn invalid_configuration(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    /// Create an invalid ID error
    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    /// Creates a parse error for string-to-type conversion failures.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Check if this is a NotFound error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is an InsufficientResource error.
    pub fn is_insufficient(&self) -> bool {
        matches!(self, Self::InsufficientResource { .. })
    }
}
