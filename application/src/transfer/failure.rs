use error_stack::Report;
use serde::Serialize;

use kernel::KernelError;

/// Structured `{ name, message }` body describing why an operation was rejected.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct FailureDto {
    pub name: String,
    pub message: String,
}

impl From<&KernelError> for FailureDto {
    fn from(value: &KernelError) -> Self {
        Self {
            name: value.name().to_string(),
            message: value.to_string(),
        }
    }
}

impl From<&Report<KernelError>> for FailureDto {
    fn from(value: &Report<KernelError>) -> Self {
        Self::from(value.current_context())
    }
}
