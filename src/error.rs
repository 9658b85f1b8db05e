use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Missing required column '{0}' in transaction data")]
    MissingColumn(String),

    #[error("Invalid month name in filter: {0}")]
    InvalidMonthName(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DashboardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_error_display_is_not_prefixed() {
        let inner = csv::Error::from(std::io::Error::other("stream closed"));
        let expected = inner.to_string();

        let err = DashboardError::from(inner);
        assert_eq!(err.to_string(), expected);
        assert!(!err.to_string().starts_with("CSV error"));
    }
}
