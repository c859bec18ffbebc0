//! Provider error types.

use crate::errors::BeaconError;

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("No API token for account '{account}' (set 'token' or the 'token_env' variable)")]
    MissingToken { account: String },

    #[error("Unknown account '{account}'")]
    UnknownAccount { account: String },

    #[error("Request to {provider} failed: {message}")]
    RequestFailed {
        provider: &'static str,
        message: String,
    },

    #[error("{provider} API returned HTTP {status}: {body}")]
    HttpStatus {
        provider: &'static str,
        status: u16,
        body: String,
    },

    #[error("Failed to decode {provider} response: {message}")]
    DecodeFailed {
        provider: &'static str,
        message: String,
    },

    #[error("Railway GraphQL errors: {messages}")]
    GraphQl { messages: String },
}

impl BeaconError for ProviderError {
    fn error_code(&self) -> &'static str {
        match self {
            ProviderError::MissingToken { .. } => "PROVIDER_MISSING_TOKEN",
            ProviderError::UnknownAccount { .. } => "PROVIDER_UNKNOWN_ACCOUNT",
            ProviderError::RequestFailed { .. } => "PROVIDER_REQUEST_FAILED",
            ProviderError::HttpStatus { .. } => "PROVIDER_HTTP_STATUS",
            ProviderError::DecodeFailed { .. } => "PROVIDER_DECODE_FAILED",
            ProviderError::GraphQl { .. } => "PROVIDER_GRAPHQL_ERROR",
        }
    }

    fn is_user_error(&self) -> bool {
        match self {
            ProviderError::MissingToken { .. } | ProviderError::UnknownAccount { .. } => true,
            ProviderError::HttpStatus { status, .. } => matches!(status, 401 | 403),
            _ => false,
        }
    }
}

/// A single provider record that could not be mapped. The record is skipped.
#[derive(Debug, thiserror::Error)]
pub enum MappingError {
    #[error("record is missing required field '{field}'")]
    MissingField { field: &'static str },

    #[error("record field '{field}' is invalid: {message}")]
    InvalidField {
        field: &'static str,
        message: String,
    },

    #[error("record has unexpected shape: {message}")]
    Malformed { message: String },
}

impl BeaconError for MappingError {
    fn error_code(&self) -> &'static str {
        match self {
            MappingError::MissingField { .. } => "MAPPING_MISSING_FIELD",
            MappingError::InvalidField { .. } => "MAPPING_INVALID_FIELD",
            MappingError::Malformed { .. } => "MAPPING_MALFORMED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_token() {
        let error = ProviderError::MissingToken {
            account: "personal".to_string(),
        };
        assert!(error.to_string().contains("'personal'"));
        assert_eq!(error.error_code(), "PROVIDER_MISSING_TOKEN");
        assert!(error.is_user_error());
    }

    #[test]
    fn test_http_status_auth_is_user_error() {
        let unauthorized = ProviderError::HttpStatus {
            provider: "Vercel",
            status: 401,
            body: "forbidden".to_string(),
        };
        assert!(unauthorized.is_user_error());
        assert_eq!(
            unauthorized.to_string(),
            "Vercel API returned HTTP 401: forbidden"
        );

        let server = ProviderError::HttpStatus {
            provider: "Vercel",
            status: 502,
            body: String::new(),
        };
        assert!(!server.is_user_error());
    }

    #[test]
    fn test_graphql_error() {
        let error = ProviderError::GraphQl {
            messages: "Not Authorized".to_string(),
        };
        assert_eq!(error.to_string(), "Railway GraphQL errors: Not Authorized");
        assert_eq!(error.error_code(), "PROVIDER_GRAPHQL_ERROR");
        assert!(!error.is_user_error());
    }

    #[test]
    fn test_mapping_error_codes() {
        let error = MappingError::MissingField { field: "uid" };
        assert_eq!(error.to_string(), "record is missing required field 'uid'");
        assert_eq!(error.error_code(), "MAPPING_MISSING_FIELD");
    }
}
