use std::error::Error;

/// Base trait for all application errors
pub trait BeaconError: Error + Send + Sync + 'static {
    /// Error code for programmatic handling
    fn error_code(&self) -> &'static str;

    /// Whether this error should be logged as an error or warning
    fn is_user_error(&self) -> bool {
        false
    }
}

/// Common result type for the application
pub type BeaconResult<T> = Result<T, Box<dyn BeaconError>>;

impl BeaconError for beacon_config::ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            beacon_config::ConfigError::ConfigParseError { .. } => "CONFIG_PARSE_ERROR",
            beacon_config::ConfigError::InvalidConfiguration { .. } => "INVALID_CONFIGURATION",
            beacon_config::ConfigError::PathUnavailable { .. } => "CONFIG_PATH_UNAVAILABLE",
            beacon_config::ConfigError::IoError { .. } => "CONFIG_IO_ERROR",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(
            self,
            beacon_config::ConfigError::ConfigParseError { .. }
                | beacon_config::ConfigError::InvalidConfiguration { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("test error")]
    struct TestError;

    impl BeaconError for TestError {
        fn error_code(&self) -> &'static str {
            "TEST_ERROR"
        }
    }

    #[test]
    fn test_default_is_not_user_error() {
        let error = TestError;
        assert_eq!(error.error_code(), "TEST_ERROR");
        assert!(!error.is_user_error());
    }

    #[test]
    fn test_boxed_result() {
        let result: BeaconResult<()> = Err(Box::new(TestError));
        let err = result.unwrap_err();
        assert_eq!(err.error_code(), "TEST_ERROR");
        assert_eq!(err.to_string(), "test error");
    }

    #[test]
    fn test_config_error_codes() {
        let error = beacon_config::ConfigError::InvalidConfiguration {
            message: "bad".to_string(),
        };
        assert_eq!(error.error_code(), "INVALID_CONFIGURATION");
        assert!(error.is_user_error());

        let error = beacon_config::ConfigError::PathUnavailable {
            message: "no home".to_string(),
        };
        assert_eq!(error.error_code(), "CONFIG_PATH_UNAVAILABLE");
        assert!(!error.is_user_error());
    }
}
