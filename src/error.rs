use chrono::NaiveDate;
use thiserror::Error;

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
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
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

/// Failures raised by the return engine.
///
/// An empty or not-yet-loaded series is *not* an error; `resolve` reports it
/// through `ResolvedResult::empty()`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Degenerate value {value} on {date}: cannot compute a return from a zero base")]
    DegenerateValue { date: NaiveDate, value: f64 },

    #[error("Return between {start} and {end} is not a finite number")]
    NonFiniteReturn { start: NaiveDate, end: NaiveDate },

    #[error("Custom range start {start} is after its end {end}")]
    InvertedRange { start: NaiveDate, end: NaiveDate },
}

impl From<EngineError> for AppError {
    fn from(err: EngineError) -> Self {
        AppError::new(4, err.to_string())
    }
}
