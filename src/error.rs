//! Error type shared by the data source, report writer and server

/// Error type for dashboard operations
#[derive(Debug)]
pub enum DashError {
    /// Transport failure talking to the dataset URL
    Fetch(reqwest::Error),
    /// The dataset URL answered with a non-success status
    Status { url: String, status: u16 },
    /// The document was not a valid dataset
    Parse(serde_json::Error),
    Io(std::io::Error),
    Config(String),
    Server(String),
}

impl std::fmt::Display for DashError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DashError::Fetch(e) => write!(f, "Fetch error: {}", e),
            DashError::Status { url, status } => write!(f, "HTTP {} from {}", status, url),
            DashError::Parse(e) => write!(f, "Dataset parse error: {}", e),
            DashError::Io(e) => write!(f, "I/O error: {}", e),
            DashError::Config(msg) => write!(f, "Config error: {}", msg),
            DashError::Server(msg) => write!(f, "Server error: {}", msg),
        }
    }
}

impl std::error::Error for DashError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DashError::Fetch(e) => Some(e),
            DashError::Parse(e) => Some(e),
            DashError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for DashError {
    fn from(e: reqwest::Error) -> Self {
        DashError::Fetch(e)
    }
}

impl From<serde_json::Error> for DashError {
    fn from(e: serde_json::Error) -> Self {
        DashError::Parse(e)
    }
}

impl From<std::io::Error> for DashError {
    fn from(e: std::io::Error) -> Self {
        DashError::Io(e)
    }
}

pub type Result<T> = std::result::Result<T, DashError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display_names_url() {
        let err = DashError::Status { url: "http://x/samples.json".to_string(), status: 404 };
        assert_eq!(err.to_string(), "HTTP 404 from http://x/samples.json");
    }

    #[test]
    fn test_parse_error_converts() {
        let bad = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: DashError = bad.into();
        assert!(matches!(err, DashError::Parse(_)));
        assert!(err.to_string().starts_with("Dataset parse error"));
    }
}
