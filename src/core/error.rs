use anyhow::Error as AnyhowError;
use std::fmt;

/// Structured error types for selector and rule evaluation
#[derive(Debug)]
pub enum SelruleError {
    /// A `Class::Method` selector without the `::` separator
    InvalidSelector { selector: String, message: String },
    /// A pattern that could not be compiled into a regex
    InvalidPattern {
        pattern: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
    /// Configuration related errors
    Config {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
    /// Input/Output related errors (rule files, directory scans, etc.)
    Io {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
    /// Generic errors that don't fit other categories
    Other {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl fmt::Display for SelruleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelruleError::InvalidSelector { selector, message } => {
                write!(f, "Invalid selector '{}': {}", selector, message)
            }
            SelruleError::InvalidPattern { pattern, .. } => {
                write!(f, "Invalid pattern '{}'", pattern)
            }
            SelruleError::Config { message, .. } => {
                write!(f, "Configuration error: {}", message)
            }
            SelruleError::Io { message, .. } => {
                write!(f, "I/O error: {}", message)
            }
            SelruleError::Other { message, .. } => {
                write!(f, "Error: {}", message)
            }
        }
    }
}

impl std::error::Error for SelruleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SelruleError::InvalidSelector { .. } => None,
            SelruleError::InvalidPattern { source, .. }
            | SelruleError::Config { source, .. }
            | SelruleError::Io { source, .. }
            | SelruleError::Other { source, .. } => source
                .as_ref()
                .map(|e| e.as_ref() as &(dyn std::error::Error + 'static)),
        }
    }
}

impl SelruleError {
    /// Create an invalid selector error
    pub fn invalid_selector<S: Into<String>, M: Into<String>>(selector: S, message: M) -> Self {
        Self::InvalidSelector {
            selector: selector.into(),
            message: message.into(),
        }
    }

    /// Create an invalid pattern error with the regex failure as source
    pub fn invalid_pattern<P: Into<String>, E: std::error::Error + Send + Sync + 'static>(
        pattern: P,
        source: E,
    ) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
        }
    }

    /// Create a configuration error with source
    pub fn config_with_source<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
        message: S,
        source: E,
    ) -> Self {
        Self::Config {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

// Readers report through anyhow; keep the chain when they cross into the library
impl From<AnyhowError> for SelruleError {
    fn from(error: AnyhowError) -> Self {
        Self::Other {
            message: error.to_string(),
            source: Some(error.into()),
        }
    }
}

impl From<std::io::Error> for SelruleError {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: error.to_string(),
            source: Some(Box::new(error)),
        }
    }
}

/// Custom Result type for the crate
pub type Result<T> = std::result::Result<T, SelruleError>;

/// Extension trait to add context to errors
pub trait ErrorContext<T> {
    fn context_config<S: Into<String>>(self, message: S) -> Result<T>;
    fn context_pattern<P: Into<String>>(self, pattern: P) -> Result<T>;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context_config<S: Into<String>>(self, message: S) -> Result<T> {
        self.map_err(|e| SelruleError::config_with_source(message, e))
    }

    fn context_pattern<P: Into<String>>(self, pattern: P) -> Result<T> {
        self.map_err(|e| SelruleError::invalid_pattern(pattern, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_invalid_selector_display() {
        let err = SelruleError::invalid_selector("App\\*", "missing '::' separator");
        assert_eq!(
            err.to_string(),
            "Invalid selector 'App\\*': missing '::' separator"
        );
        assert!(err.source().is_none());
    }

    #[test]
    fn test_pattern_context_keeps_source() {
        let result: std::result::Result<regex::Regex, regex::Error> = regex::Regex::new("(");
        let err = result.context_pattern("(").unwrap_err();

        assert!(matches!(err, SelruleError::InvalidPattern { .. }));
        assert!(err.source().is_some());
        assert_eq!(err.to_string(), "Invalid pattern '('");
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: SelruleError = io.into();
        assert!(err.to_string().starts_with("I/O error"));
    }
}
