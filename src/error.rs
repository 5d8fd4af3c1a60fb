//! Error types for the Bill Split Engine.
//!
//! The allocation engine itself never fails: malformed numbers degrade to zero
//! and inconsistent assignments surface as a reconciliation status. This module
//! covers the failures that can happen at the edges of the engine, such as
//! loading configuration, validating an incoming bill, or packaging an expense.

use thiserror::Error;

use crate::models::ReconciliationStatus;

/// The main error type for the Bill Split Engine.
///
/// # Example
///
/// ```
/// use bill_split_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/engine.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/engine.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A bill snapshot broke one of its structural rules (duplicate ids and the like).
    #[error("Invalid bill field '{field}': {message}")]
    InvalidBill {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// An expense was requested for a bill that is not balanced.
    #[error("Bill is not reconciled: status is {status}")]
    NotReconciled {
        /// The reconciliation status the bill was in.
        status: ReconciliationStatus,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_displays_path() {
        let error = EngineError::ConfigNotFound {
            path: "/missing/engine.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/engine.yaml"
        );
    }

    #[test]
    fn test_config_parse_error_displays_path_and_message() {
        let error = EngineError::ConfigParseError {
            path: "/config/bad.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration file '/config/bad.yaml': invalid YAML syntax"
        );
    }

    #[test]
    fn test_invalid_bill_displays_field_and_message() {
        let error = EngineError::InvalidBill {
            field: "items[1].id".to_string(),
            message: "duplicate item id 'item_1'".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid bill field 'items[1].id': duplicate item id 'item_1'"
        );
    }

    #[test]
    fn test_not_reconciled_displays_status() {
        let error = EngineError::NotReconciled {
            status: ReconciliationStatus::Incomplete,
        };
        assert_eq!(
            error.to_string(),
            "Bill is not reconciled: status is incomplete"
        );
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_not_reconciled() -> EngineResult<()> {
            Err(EngineError::NotReconciled {
                status: ReconciliationStatus::Mismatched,
            })
        }

        fn propagates_error() -> EngineResult<()> {
            returns_not_reconciled()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
