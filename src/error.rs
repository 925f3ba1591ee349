//! Process-level error type.
//!
//! Every fallible operation returns `Result<_, AppError>`. The exit code travels
//! with the message so `main` can map it straight to the process status:
//!
//! - `2`: invalid input or configuration
//! - `3`: insufficient data
//! - `4`: estimator / numerical failure reported by the learning library

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

    /// Invalid input or configuration (exit code 2).
    pub fn input(message: impl Into<String>) -> Self {
        Self::new(2, message)
    }

    /// Not enough usable data to proceed (exit code 3).
    pub fn insufficient(message: impl Into<String>) -> Self {
        Self::new(3, message)
    }

    /// A failure surfaced by the learning library, with context.
    pub fn model(context: &str, err: impl std::fmt::Display) -> Self {
        Self::new(4, format!("{context}: {err}"))
    }

    /// Writing the console report failed.
    pub fn output(err: std::io::Error) -> Self {
        Self::new(2, format!("Failed to write output: {err}"))
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
