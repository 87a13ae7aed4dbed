//! Result and error types for Pagina.

use thiserror::Error;

use crate::locator::{Locator, Strategy};

/// Result type for Pagina operations
pub type PaginaResult<T> = Result<T, PaginaError>;

/// Errors that can occur in Pagina
///
/// Only `StaleReference` is ever recovered locally (by the element handle,
/// up to its fixed retry bound); every other variant always surfaces to the
/// caller.
#[derive(Debug, Error)]
pub enum PaginaError {
    /// The remote element no longer corresponds to a live node
    #[error("stale element '{strategy}={value}' after {attempts} attempt(s)")]
    StaleReference {
        /// Locator strategy of the handle
        strategy: Strategy,
        /// Locator value of the handle
        value: String,
        /// Number of lookup attempts made before giving up
        attempts: usize,
    },

    /// A lookup matched zero elements where one was required
    #[error("element does not exist: '{strategy}={value}'")]
    NotFound {
        /// Locator strategy of the failed lookup
        strategy: Strategy,
        /// Locator value of the failed lookup
        value: String,
    },

    /// Disallowed descriptor configuration or accessor misuse
    #[error("invalid descriptor: {message}")]
    InvalidDescriptor {
        /// What was wrong with the descriptor
        message: String,
    },

    /// A dynamic descriptor was resolved on an instance without an identifier
    #[error("dynamic locator '{strategy}={value}' requires an instance identifier")]
    MissingIdentifier {
        /// Locator strategy of the dynamic descriptor
        strategy: Strategy,
        /// Locator value template of the dynamic descriptor
        value: String,
    },

    /// Container iteration requested but the rows collection was never declared
    #[error("container model '{model}' is not iterable (rows are not initialized)")]
    RowsNotInitialized {
        /// Name of the container model
        model: String,
    },

    /// Initial page validation failed
    #[error("could not validate page '{page}': {reason}")]
    PageValidation {
        /// Page label
        page: String,
        /// The underlying lookup failure
        reason: String,
    },

    /// A wait condition did not hold within the timeout
    #[error("wait for '{condition}' timed out after {ms}ms")]
    Timeout {
        /// Timeout in milliseconds
        ms: u64,
        /// Description of the awaited condition
        condition: String,
    },

    /// Transport-level fault raised by a session implementation
    #[error("session error: {message}")]
    Session {
        /// Error message
        message: String,
    },
}

impl PaginaError {
    /// Create a stale-reference error for a locator, with the attempt count
    pub fn stale(locator: &Locator, attempts: usize) -> Self {
        Self::StaleReference {
            strategy: locator.strategy(),
            value: locator.value().to_string(),
            attempts,
        }
    }

    /// Create a not-found error for a locator
    pub fn not_found(locator: &Locator) -> Self {
        Self::NotFound {
            strategy: locator.strategy(),
            value: locator.value().to_string(),
        }
    }

    /// Create a session transport error
    pub fn session<S: Into<String>>(message: S) -> Self {
        Self::Session {
            message: message.into(),
        }
    }

    /// Whether this error is the stale-reference fault signal
    #[must_use]
    pub const fn is_stale(&self) -> bool {
        matches!(self, Self::StaleReference { .. })
    }

    /// Whether this error is the distinct "element does not exist" condition
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stale_error_message_carries_locator_and_attempts() {
        let err = PaginaError::stale(&Locator::id("VMList_name_vm-07"), 5);
        let msg = err.to_string();
        assert!(msg.contains("id=VMList_name_vm-07"));
        assert!(msg.contains('5'));
    }

    #[test]
    fn test_not_found_message_carries_locator() {
        let err = PaginaError::not_found(&Locator::css("button.primary"));
        assert!(err.to_string().contains("css selector=button.primary"));
        assert!(err.is_not_found());
        assert!(!err.is_stale());
    }

    #[test]
    fn test_timeout_message() {
        let err = PaginaError::Timeout {
            ms: 5000,
            condition: "login page to appear".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("5000"));
        assert!(msg.contains("login page to appear"));
    }
}
