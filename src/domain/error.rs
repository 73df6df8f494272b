use thiserror::Error;

/// Core engine errors
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Cache error: {message}")]
    Cache { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl EngineError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn dimension_mismatch(expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch { expected, actual }
    }

    pub fn cache(message: impl Into<String>) -> Self {
        Self::Cache {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_error() {
        let error = EngineError::configuration("dimension must be greater than 0");
        assert_eq!(
            error.to_string(),
            "Configuration error: dimension must be greater than 0"
        );
    }

    #[test]
    fn test_dimension_mismatch_error() {
        let error = EngineError::dimension_mismatch(8, 4);
        assert_eq!(
            error.to_string(),
            "Embedding dimension mismatch: expected 8, got 4"
        );
    }

    #[test]
    fn test_cache_error() {
        let error = EngineError::cache("connection refused");
        assert_eq!(error.to_string(), "Cache error: connection refused");
    }
}
