use error_stack::Report;
use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

use crate::KernelError;

pub const MAX_PAGE_SIZE: i32 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Fromln, AsRefln, Serialize, Deserialize)]
pub struct SelectLimit(i32);

impl SelectLimit {
    pub fn new(value: impl Into<i32>) -> Self {
        SelectLimit(value.into())
    }

    pub fn unbounded() -> Self {
        SelectLimit(i32::MAX)
    }
}

impl Default for SelectLimit {
    fn default() -> Self {
        Self::new(30)
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, Fromln, AsRefln, Serialize, Deserialize)]
pub struct SelectOffset(i32);

impl SelectOffset {
    pub fn new(value: impl Into<i32>) -> Self {
        SelectOffset(value.into())
    }
}

/// Converts a 1-based page number and page size into limit/offset.
pub fn paginate(
    page: i32,
    page_size: i32,
) -> error_stack::Result<(SelectLimit, SelectOffset), KernelError> {
    if page < 1 {
        return Err(Report::new(KernelError::InvalidInput)
            .attach_printable(format!("page must be 1 or greater, got {page}")));
    }
    if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
        return Err(Report::new(KernelError::InvalidInput).attach_printable(format!(
            "page_size must be between 1 and {MAX_PAGE_SIZE}, got {page_size}"
        )));
    }
    let offset = (page - 1).checked_mul(page_size).ok_or_else(|| {
        Report::new(KernelError::InvalidInput).attach_printable("page is out of range")
    })?;
    Ok((SelectLimit::new(page_size), SelectOffset::new(offset)))
}
