//! Error types for the worldmap marker engine.

use thiserror::Error;

/// Result type alias using MapError.
pub type MapResult<T> = Result<T, MapError>;

/// Primary error type for marker and legend operations.
#[derive(Debug, Error)]
pub enum MapError {
    // === Configuration / input errors ===
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Palette has {colors} colors but {thresholds} thresholds need {required}")]
    PaletteTooShort {
        thresholds: usize,
        colors: usize,
        required: usize,
    },

    #[error("Thresholds must be strictly ascending: {0}")]
    UnorderedThresholds(String),

    // === Loading errors ===
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

impl MapError {
    /// Create an InvalidInput error.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Whether the error stems from configuration or data that the caller
    /// has to fix, as opposed to a loading failure.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            MapError::InvalidInput(_)
                | MapError::PaletteTooShort { .. }
                | MapError::UnorderedThresholds(_)
        )
    }
}

impl From<std::io::Error> for MapError {
    fn from(err: std::io::Error) -> Self {
        MapError::IoError(err.to_string())
    }
}

impl From<serde_json::Error> for MapError {
    fn from(err: serde_json::Error) -> Self {
        MapError::ParseError(format!("JSON error: {}", err))
    }
}

impl From<serde_yaml::Error> for MapError {
    fn from(err: serde_yaml::Error) -> Self {
        MapError::ParseError(format!("YAML error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_classification() {
        assert!(MapError::invalid_input("log of zero").is_invalid_input());
        assert!(MapError::PaletteTooShort {
            thresholds: 2,
            colors: 2,
            required: 3
        }
        .is_invalid_input());
        assert!(!MapError::IoError("missing".into()).is_invalid_input());
    }

    #[test]
    fn test_palette_message() {
        let err = MapError::PaletteTooShort {
            thresholds: 3,
            colors: 3,
            required: 4,
        };
        assert_eq!(
            err.to_string(),
            "Palette has 3 colors but 3 thresholds need 4"
        );
    }
}
