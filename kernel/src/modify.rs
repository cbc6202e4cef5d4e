mod ledger;
mod rental;
mod tool;

pub use self::{ledger::*, rental::*, tool::*};
