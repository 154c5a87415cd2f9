use thiserror::Error;

use crate::config::LoadError;

#[derive(Debug, Error)]
pub enum InfraError {
    #[error("terminal i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("telemetry initialization failed: {0}")]
    Telemetry(String),
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] LoadError),
}

impl InfraError {
    pub fn telemetry(message: impl Into<String>) -> Self {
        Self::Telemetry(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_error_names_the_key() {
        let err = InfraError::from(LoadError::Invalid {
            key: "search.debounce_ms",
            reason: "must be at most 60000".to_string(),
        });
        assert_eq!(
            err.to_string(),
            "failed to load configuration: invalid configuration for `search.debounce_ms`: must be at most 60000"
        );
    }
}
