//! Error types for breathe.

use thiserror::Error;

/// Errors that can occur while loading techniques or running a session.
#[derive(Error, Debug)]
pub enum BreatheError {
    /// Configuration file could not be read or understood.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A technique definition failed validation.
    #[error("Invalid technique '{id}': {reason}")]
    InvalidTechnique {
        /// Id of the offending technique (may be empty).
        id: String,
        /// What was wrong with it.
        reason: String,
    },

    /// The technique list contained no entries.
    #[error("No techniques available")]
    EmptyCatalog,

    /// No technique with the requested id.
    #[error("Technique not found: {0}")]
    NotFound(String),

    /// JSON parsing failed.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// YAML parsing failed.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Filesystem or terminal I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Terminal setup or drawing failed.
    #[error("Terminal error: {0}")]
    Terminal(String),
}

impl BreatheError {
    /// Build an [`BreatheError::InvalidTechnique`].
    pub fn invalid(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidTechnique {
            id: id.into(),
            reason: reason.into(),
        }
    }

    /// Whether this error comes from bad technique or config data rather than
    /// the environment.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::Config(_)
                | Self::InvalidTechnique { .. }
                | Self::EmptyCatalog
                | Self::NotFound(_)
                | Self::Parse(_)
                | Self::Yaml(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_message() {
        let err = BreatheError::invalid("box", "step 2 has non-positive seconds");
        assert_eq!(
            err.to_string(),
            "Invalid technique 'box': step 2 has non-positive seconds"
        );
    }

    #[test]
    fn test_is_configuration() {
        assert!(BreatheError::EmptyCatalog.is_configuration());
        assert!(BreatheError::NotFound("x".to_string()).is_configuration());
        assert!(!BreatheError::Terminal("x".to_string()).is_configuration());
        let io = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        assert!(!BreatheError::from(io).is_configuration());
    }
}
