mod actor;
mod ledger;
mod rental;

pub use self::{actor::*, ledger::*, rental::*};

pub(crate) fn first_page() -> i32 {
    1
}

pub(crate) fn default_page_size() -> i32 {
    20
}
