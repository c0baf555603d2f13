use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ConformResult<T> = Result<T, ConformError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConformErrorCategory {
    InputValidationError,
    IoSystemError,
    InternalError,
}

impl ConformErrorCategory {
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::InputValidationError => 2,
            Self::IoSystemError => 3,
            Self::InternalError => 5,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InputValidationError => "InputValidationError",
            Self::IoSystemError => "IoSystemError",
            Self::InternalError => "InternalError",
        }
    }
}

/// Error surfaced to the operator. `placeholder` is a stable dotted token
/// (`INPUT.ARG_COUNT`, `IO.REPORT_WRITE`, ...) that tests and scripts can
/// match on without depending on the message wording.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConformError {
    category: ConformErrorCategory,
    placeholder: &'static str,
    message: String,
}

impl ConformError {
    pub fn new(
        category: ConformErrorCategory,
        placeholder: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            category,
            placeholder,
            message: message.into(),
        }
    }

    pub fn input_validation(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(
            ConformErrorCategory::InputValidationError,
            placeholder,
            message,
        )
    }

    pub fn io_system(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(ConformErrorCategory::IoSystemError, placeholder, message)
    }

    pub fn internal(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(ConformErrorCategory::InternalError, placeholder, message)
    }

    pub const fn category(&self) -> ConformErrorCategory {
        self.category
    }

    pub const fn placeholder(&self) -> &'static str {
        self.placeholder
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn exit_code(&self) -> i32 {
        self.category.exit_code()
    }

    pub fn diagnostic_line(&self) -> String {
        format!("ERROR: [{}] {}", self.placeholder, self.message)
    }

    pub fn fatal_exit_line(&self) -> String {
        format!("FATAL EXIT CODE: {}", self.exit_code())
    }
}

impl Display for ConformError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{}] {}",
            self.category.as_str(),
            self.placeholder,
            self.message
        )
    }
}

impl Error for ConformError {}

#[cfg(test)]
mod tests {
    use super::{ConformError, ConformErrorCategory};

    #[test]
    fn exit_mapping_is_stable() {
        let cases = [
            (ConformErrorCategory::InputValidationError, 2),
            (ConformErrorCategory::IoSystemError, 3),
            (ConformErrorCategory::InternalError, 5),
        ];

        for (category, exit_code) in cases {
            assert_eq!(category.exit_code(), exit_code, "{}", category.as_str());
        }
    }

    #[test]
    fn fatal_error_renders_diagnostic_lines() {
        let error = ConformError::input_validation(
            "INPUT.UNKNOWN_MILESTONE",
            "unexpected milestone 'chap99'",
        );

        assert_eq!(error.exit_code(), 2);
        assert_eq!(
            error.diagnostic_line(),
            "ERROR: [INPUT.UNKNOWN_MILESTONE] unexpected milestone 'chap99'"
        );
        assert_eq!(error.fatal_exit_line(), "FATAL EXIT CODE: 2");
        assert_eq!(
            error.to_string(),
            "InputValidationError [INPUT.UNKNOWN_MILESTONE] unexpected milestone 'chap99'"
        );
    }
}
