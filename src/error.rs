//! Error taxonomy for the forecast pipeline.
//!
//! Every stage returns `Result<_, AppError>`. The kind decides the process
//! exit code; the message carries the context (path, line, underlying cause).

/// What went wrong, coarse enough to pick an exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Input path does not exist. Raised before any read attempt.
    MissingInput,
    /// The table could not be read or parsed.
    Read,
    /// Invalid configuration value.
    Config,
    /// Not enough observations to aggregate or fit.
    InsufficientData,
    /// The estimator could not produce finite parameters.
    ModelFit,
    /// A rendering sink failed.
    Render,
    /// Writing the export file failed.
    Export,
    /// Month-end arithmetic left the supported calendar.
    DateRange,
}

impl ErrorKind {
    pub fn exit_code(self) -> u8 {
        match self {
            ErrorKind::MissingInput | ErrorKind::Read | ErrorKind::Config | ErrorKind::Export => 2,
            ErrorKind::InsufficientData => 3,
            ErrorKind::ModelFit => 4,
            ErrorKind::Render => 5,
            ErrorKind::DateRange => 6,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    kind: ErrorKind,
    message: String,
}

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn missing_input(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MissingInput, message)
    }

    pub fn read(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Read, message)
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Config, message)
    }

    pub fn insufficient_data(required: usize, actual: usize) -> Self {
        Self::new(
            ErrorKind::InsufficientData,
            format!("Insufficient data: need at least {required} observations, got {actual}."),
        )
    }

    pub fn model_fit(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ModelFit, message)
    }

    pub fn render(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Render, message)
    }

    pub fn export(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Export, message)
    }

    pub fn date_range(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::DateRange, message)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn exit_code(&self) -> u8 {
        self.kind.exit_code()
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("kind", &self.kind)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_kind() {
        assert_eq!(AppError::missing_input("x").exit_code(), 2);
        assert_eq!(AppError::insufficient_data(5, 1).exit_code(), 3);
        assert_eq!(AppError::model_fit("x").exit_code(), 4);
        assert_eq!(AppError::render("x").exit_code(), 5);
        assert_eq!(AppError::date_range("x").exit_code(), 6);
    }

    #[test]
    fn insufficient_data_message_names_counts() {
        let err = AppError::insufficient_data(5, 2);
        assert_eq!(err.kind(), ErrorKind::InsufficientData);
        assert!(err.to_string().contains("at least 5"));
        assert!(err.to_string().contains("got 2"));
    }
}
