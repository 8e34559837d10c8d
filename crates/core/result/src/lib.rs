#[cfg(feature = "serde")]
#[macro_use]
extern crate serde;

use std::fmt;

/// Result type with custom Error
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Error information
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone)]
pub struct Error {
    /// Type of error and additional information
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub error_type: ErrorType,

    /// Where this error occurred
    pub location: String,
}

/// Possible error types
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type"))]
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorType {
    // ? Platform lookups
    UnknownServer,
    UnknownChannel,
    UnknownMessage,

    // ? Reporting related errors
    CannotReportYourself,

    // ? Moderation related errors
    ReportAlreadyClaimed,
    SecondOpinionConflict,
    NotClaimant,

    // ? General errors
    DatabaseError {
        operation: String,
        collection: String,
    },
    InternalError,
    NotFound,
    FailedValidation {
        error: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} at {}", self.error_type, self.location)
    }
}

impl std::error::Error for Error {}

#[macro_export]
macro_rules! create_error {
    ( $error: ident $( $tt:tt )? ) => {
        $crate::Error {
            error_type: $crate::ErrorType::$error $( $tt )?,
            location: format!("{}:{}:{}", file!(), line!(), column!()),
        }
    };
}

#[macro_export]
macro_rules! create_database_error {
    ( $operation: expr, $collection: expr ) => {
        $crate::create_error!(DatabaseError {
            operation: $operation.to_string(),
            collection: $collection.to_string()
        })
    };
}

#[cfg(test)]
mod tests {
    use crate::ErrorType;

    #[test]
    fn use_macro_to_construct_error() {
        let error = create_error!(CannotReportYourself);
        assert!(matches!(error.error_type, ErrorType::CannotReportYourself));
        assert!(error.location.contains("lib.rs"));
    }

    #[test]
    fn use_macro_to_construct_complex_error() {
        let error = create_error!(FailedValidation {
            error: "missing field".to_string()
        });
        assert_eq!(
            error.error_type,
            ErrorType::FailedValidation {
                error: "missing field".to_string()
            }
        );
    }

    #[test]
    fn use_macro_to_construct_database_error() {
        let error = create_database_error!("flush", "history");
        assert!(matches!(
            error.error_type,
            ErrorType::DatabaseError { ref operation, ref collection }
                if operation == "flush" && collection == "history"
        ));
    }
}
