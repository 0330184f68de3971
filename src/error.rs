use thiserror::Error;

#[derive(Error, Debug)]
pub enum ForecastError {
    #[error("No JSON object found in the response.")]
    Extraction,

    #[error("Failed to parse JSON from model response: {0}")]
    Parse(String),

    #[error("The forecast result does not contain expected 'past_prices' and 'future_prices'. Please try again.")]
    MissingData,

    #[error("Invalid forecast request: {0}")]
    InvalidRequest(String),

    #[error("Completion service error: {0}")]
    Completion(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[cfg(feature = "gemini")]
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
}

impl ForecastError {
    /// Stable machine-readable code, used by the JSON API.
    pub fn code(&self) -> &'static str {
        match self {
            ForecastError::Extraction => "EXTRACTION_ERROR",
            ForecastError::Parse(_) => "PARSE_ERROR",
            ForecastError::MissingData => "MISSING_DATA",
            ForecastError::InvalidRequest(_) => "INVALID_REQUEST",
            ForecastError::Completion(_) => "COMPLETION_ERROR",
            ForecastError::Config(_) => "CONFIG_ERROR",
            ForecastError::SerializationError(_) => "SERIALIZATION_ERROR",
            #[cfg(feature = "gemini")]
            ForecastError::Http(_) => "HTTP_ERROR",
        }
    }

    /// Whether the failure came from the model's answer or the service producing it,
    /// as opposed to the caller's input or our own plumbing.
    pub fn is_upstream(&self) -> bool {
        match self {
            ForecastError::Extraction | ForecastError::Parse(_) | ForecastError::Completion(_) => {
                true
            }
            #[cfg(feature = "gemini")]
            ForecastError::Http(_) => true,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, ForecastError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_data_message_names_both_series() {
        let msg = ForecastError::MissingData.to_string();
        assert!(msg.contains("'past_prices'"));
        assert!(msg.contains("'future_prices'"));
    }

    #[test]
    fn test_parse_error_carries_reason() {
        let err = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let wrapped = ForecastError::Parse(err.to_string());
        assert!(wrapped.to_string().starts_with("Failed to parse JSON"));
        assert!(wrapped.is_upstream());
        assert_eq!(wrapped.code(), "PARSE_ERROR");
    }

    #[test]
    fn test_invalid_request_is_not_upstream() {
        assert!(!ForecastError::InvalidRequest("x".into()).is_upstream());
        assert!(!ForecastError::MissingData.is_upstream());
    }
}
