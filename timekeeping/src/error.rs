use thiserror::Error;

pub type Result<T> = std::result::Result<T, CommonError>;

#[derive(Debug, Error)]
pub enum CommonError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Failed to validate: {0}")]
    ValidationError(#[from] validator::ValidationErrors),
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CommonError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        CommonError::InvalidArgument(message.into())
    }
}

impl From<&str> for CommonError {
    fn from(s: &str) -> Self {
        CommonError::InvalidArgument(s.to_owned())
    }
}

impl From<String> for CommonError {
    fn from(s: String) -> Self {
        CommonError::InvalidArgument(s)
    }
}

#[cfg(test)]
mod tests {
    use super::CommonError;

    #[test]
    fn test_io_error_message() {
        let err = CommonError::from(std::io::Error::from_raw_os_error(libc::EBADF));
        assert!(err.to_string().starts_with("I/O error: "));
    }

    #[test]
    fn test_invalid_argument_from_str() {
        let err = CommonError::from("empty input");
        assert!(matches!(err, CommonError::InvalidArgument(ref m) if m == "empty input"));
        assert_eq!(err.to_string(), "Invalid argument: empty input");
    }
}
