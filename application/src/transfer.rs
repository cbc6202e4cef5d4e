mod ledger;
mod rental;

pub use self::{ledger::*, rental::*};
