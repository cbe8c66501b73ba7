use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    InvalidInput(String),
    InvalidData(String),
    Io(String),
    OracleUnavailable(String),
    StoreWrite(String),
    AuthUnavailable(String),
    MissingEditTarget(String),
}

impl AppError {
    pub fn invalid_input<M: Into<String>>(message: M) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn invalid_data<M: Into<String>>(message: M) -> Self {
        Self::InvalidData(message.into())
    }

    pub fn io<M: Into<String>>(message: M) -> Self {
        Self::Io(message.into())
    }

    pub fn oracle_unavailable<M: Into<String>>(message: M) -> Self {
        Self::OracleUnavailable(message.into())
    }

    pub fn store_write<M: Into<String>>(message: M) -> Self {
        Self::StoreWrite(message.into())
    }

    pub fn auth_unavailable<M: Into<String>>(message: M) -> Self {
        Self::AuthUnavailable(message.into())
    }

    pub fn missing_edit_target<M: Into<String>>(message: M) -> Self {
        Self::MissingEditTarget(message.into())
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::InvalidData(_) => "invalid_data",
            Self::Io(_) => "io_error",
            Self::OracleUnavailable(_) => "oracle_unavailable",
            Self::StoreWrite(_) => "store_write_failed",
            Self::AuthUnavailable(_) => "auth_unavailable",
            Self::MissingEditTarget(_) => "missing_edit_target",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::InvalidInput(message) => message,
            Self::InvalidData(message) => message,
            Self::Io(message) => message,
            Self::OracleUnavailable(message) => message,
            Self::StoreWrite(message) => message,
            Self::AuthUnavailable(message) => message,
            Self::MissingEditTarget(message) => message,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.code(), self.message())
    }
}

impl std::error::Error for AppError {}
