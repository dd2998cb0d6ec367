//! Error types for trigrate

use thiserror::Error;

/// trigrate error type
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// Computation error
    #[error("Computation error: {0}")]
    Computation(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_carries_category() {
        let e = Error::Validation("bad edges".into());
        assert_eq!(e.to_string(), "Validation error: bad edges");

        let e = Error::Config("no thresholds".into());
        assert_eq!(e.to_string(), "Config error: no thresholds");
    }

    #[test]
    fn json_error_converts() {
        let err = serde_json::from_str::<u32>("nope").unwrap_err();
        let e: Error = err.into();
        assert!(e.to_string().starts_with("JSON error"));
    }
}
