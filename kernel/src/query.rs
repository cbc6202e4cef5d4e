mod ledger;
mod rental;
mod tool;
mod user;

pub use self::{ledger::*, rental::*, tool::*, user::*};
