//! Error types for the search crate.

use thiserror::Error;

/// Result type alias for search operations.
pub type Result<T> = std::result::Result<T, SearchError>;

/// Errors that can occur while building a metro table or a search index.
///
/// Normalizing and querying never fail; only construction does.
#[derive(Debug, Error)]
pub enum SearchError {
    /// A metro rule pattern failed to compile
    #[error("Invalid pattern for metro '{label}': {source}")]
    InvalidPattern {
        /// Label of the offending rule
        label: String,
        /// Regex compilation error
        #[source]
        source: regex::Error,
    },

    /// Matcher options out of range
    #[error("Invalid match options: {0}")]
    InvalidOptions(String),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Error code for integration with jobboard-core error handling.
/// Range: 11xxx for search errors.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchErrorCode {
    /// Metro pattern failed to compile
    InvalidPattern = 11001,
    /// Matcher options out of range
    InvalidOptions = 11002,
    /// JSON parsing error
    JsonParsing = 11003,
}

impl SearchError {
    /// Returns the error code for this error.
    pub fn code(&self) -> SearchErrorCode {
        match self {
            SearchError::InvalidPattern { .. } => SearchErrorCode::InvalidPattern,
            SearchError::InvalidOptions(_) => SearchErrorCode::InvalidOptions,
            SearchError::JsonError(_) => SearchErrorCode::JsonParsing,
        }
    }
}

impl From<SearchError> for jobboard_core::Error {
    fn from(err: SearchError) -> Self {
        use jobboard_core::ErrorCode;

        let code = match err.code() {
            SearchErrorCode::InvalidPattern => ErrorCode::InvalidMetroPattern,
            SearchErrorCode::InvalidOptions => ErrorCode::InvalidMatchOptions,
            SearchErrorCode::JsonParsing => ErrorCode::InvalidFormat,
        };
        jobboard_core::Error::new(code, err.to_string()).with_source(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = SearchError::InvalidOptions("threshold".into());
        assert_eq!(err.code(), SearchErrorCode::InvalidOptions);
        assert_eq!(err.code() as u32, 11002);
    }

    #[test]
    fn test_into_core_error() {
        let source = regex::Regex::new("(unclosed").unwrap_err();
        let err = SearchError::InvalidPattern {
            label: "toronto".into(),
            source,
        };
        let core: jobboard_core::Error = err.into();
        assert_eq!(core.code, jobboard_core::ErrorCode::InvalidMetroPattern);
        assert!(core.message.contains("toronto"));
    }
}
