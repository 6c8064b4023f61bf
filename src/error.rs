use thiserror::Error;

/// Balance race error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid input for {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The mutex-protected scenario produced a negative balance
    #[error("Locked scenario broke the balance invariant in {violations} of {trials} trials")]
    LockedInvariantBroken { violations: u64, trials: u64 },
}

impl Error {
    pub fn invalid_input(field: impl Into<String>, reason: impl ToString) -> Self {
        Self::InvalidInput {
            field: field.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_message() {
        let error = Error::invalid_input("run.trials", "must be greater than zero");
        assert_eq!(
            error.to_string(),
            "Invalid input for run.trials: must be greater than zero"
        );
    }

    #[test]
    fn test_locked_invariant_message() {
        let error = Error::LockedInvariantBroken {
            violations: 3,
            trials: 10_000,
        };
        assert!(error.to_string().contains("3 of 10000 trials"));
    }
}
