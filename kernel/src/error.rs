use std::fmt::Display;

use error_stack::Context;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum KernelError {
    NotFound,
    Unauthorized,
    InvalidState,
    InvalidInput,
    InsufficientBalance,
    Concurrency,
    Timeout,
    Internal,
}

impl Display for KernelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KernelError::NotFound => write!(f, "Requested resource was not found"),
            KernelError::Unauthorized => write!(f, "Actor is not permitted to do this"),
            KernelError::InvalidState => write!(f, "Current state does not allow this operation"),
            KernelError::InvalidInput => write!(f, "Invalid input"),
            KernelError::InsufficientBalance => write!(f, "Balance would fall below the floor"),
            KernelError::Concurrency => write!(f, "Concurrency error"),
            KernelError::Timeout => write!(f, "Process timed out"),
            KernelError::Internal => write!(f, "Internal kernel error"),
        }
    }
}

impl Context for KernelError {}
