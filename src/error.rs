use thiserror::Error;

#[derive(Debug, Error)]
pub enum BlendError {
    /// Invalid or missing input; no solve was attempted.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The solver did not converge or produced an infeasible blend.
    #[error("Numerical error: {0}")]
    Numerical(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl BlendError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        BlendError::Configuration(msg.into())
    }

    pub fn numerical(msg: impl Into<String>) -> Self {
        BlendError::Numerical(msg.into())
    }

    /// True when the caller can fix the problem by correcting its input.
    pub fn is_user_correctable(&self) -> bool {
        matches!(self, BlendError::Configuration(_))
    }

    /// Process exit code for the command-line binaries.
    pub fn exit_code(&self) -> i32 {
        match self {
            BlendError::Configuration(_) => 2,
            BlendError::Numerical(_) => 3,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, BlendError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(BlendError::configuration("x").exit_code(), 2);
        assert_eq!(BlendError::numerical("x").exit_code(), 3);
        let io = BlendError::from(std::io::Error::other("disk"));
        assert_eq!(io.exit_code(), 1);
    }

    #[test]
    fn test_only_configuration_is_user_correctable() {
        assert!(BlendError::configuration("empty").is_user_correctable());
        assert!(!BlendError::numerical("diverged").is_user_correctable());
    }
}
