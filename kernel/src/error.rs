use std::fmt::Display;

use error_stack::Context;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Resource {
    User,
    Movie,
    Rental,
}

impl Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Resource::User => write!(f, "User"),
            Resource::Movie => write!(f, "Movie"),
            Resource::Rental => write!(f, "Rental"),
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum KernelError {
    NotFound(Resource),
    PendentRental,
    MovieInRental,
    InsufficientAge,
    InvalidRequest,
    Concurrency,
    Timeout,
    Internal,
}

impl KernelError {
    /// Stable identifier of the failure kind, surfaced to clients next to the message.
    pub fn name(&self) -> &'static str {
        match self {
            KernelError::NotFound(_) => "NotFoundError",
            KernelError::PendentRental => "PendentRentalError",
            KernelError::MovieInRental => "MovieInRentalError",
            KernelError::InsufficientAge => "InsufficientAgeError",
            KernelError::InvalidRequest => "InvalidDataError",
            KernelError::Concurrency => "ConflictError",
            KernelError::Timeout => "TimeoutError",
            KernelError::Internal => "InternalError",
        }
    }

    /// Returns true for rejections caused by the request itself rather than the infrastructure.
    pub fn is_business_rule(&self) -> bool {
        !matches!(
            self,
            KernelError::Concurrency | KernelError::Timeout | KernelError::Internal
        )
    }
}

impl Display for KernelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KernelError::NotFound(resource) => write!(f, "{resource} not found."),
            KernelError::PendentRental => write!(f, "The user already have a rental!"),
            KernelError::MovieInRental => write!(f, "Movie alredy in a rental"),
            KernelError::InsufficientAge => write!(f, "Cannot see that movie."),
            KernelError::InvalidRequest => {
                write!(f, "A rental must contain at least one movie.")
            }
            KernelError::Concurrency => write!(f, "Concurrency error"),
            KernelError::Timeout => write!(f, "Process timed out"),
            KernelError::Internal => write!(f, "Internal kernel error"),
        }
    }
}

impl Context for KernelError {}
