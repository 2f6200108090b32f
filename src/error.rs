use thiserror::Error;

/// Error types that can occur while querying backends or handling run data.
#[derive(Debug, Error)]
pub enum EvalError {
    /// Credential environment variable not set
    #[error("missing credential: {0} is not set")]
    MissingCredential(String),
    /// Transport level failure (connect, timeout, body read)
    #[error("{0}")]
    Http(String),
    /// Backend answered with a non-success status code
    #[error("HTTP {0}")]
    Status(u16),
    /// API response parsing or format error. The raw body is kept for logs
    /// only and stays out of the message.
    #[error("Response format error: {message}")]
    ResponseFormat {
        message: String,
        raw_response: String,
    },
    /// Requested category is not part of the catalog
    #[error("Unknown category: {name}. Available: {}", .available.join(", "))]
    UnknownCategory {
        name: String,
        available: Vec<String>,
    },
    /// Catalog file is structurally invalid
    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// JSON serialization/deserialization errors
    #[error("JSON parse error: {0}")]
    Json(String),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Converts reqwest errors into transport errors, keeping the status when there is one
impl From<reqwest::Error> for EvalError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => EvalError::Status(status.as_u16()),
            None => EvalError::Http(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for EvalError {
    fn from(err: serde_json::Error) -> Self {
        EvalError::Json(format!(
            "{} at line {} column {}",
            err,
            err.line(),
            err.column()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_reads_like_http_code() {
        assert_eq!(EvalError::Status(503).to_string(), "HTTP 503");
    }

    #[test]
    fn unknown_category_lists_available_names() {
        let err = EvalError::UnknownCategory {
            name: "nope".to_string(),
            available: vec!["simple".to_string(), "medium".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Unknown category: nope. Available: simple, medium"
        );
    }

    #[test]
    fn response_format_message_leaves_out_raw_body() {
        let err = EvalError::ResponseFormat {
            message: "expected value at line 1 column 1".to_string(),
            raw_response: "<html>bad gateway</html>".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Response format error: expected value at line 1 column 1"
        );
    }

    #[test]
    fn json_error_carries_position() {
        let err: EvalError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(err.to_string().contains("line 1"));
    }
}
