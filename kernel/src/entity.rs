mod common;
mod ledger;
mod organization;
mod rental;
mod tool;
mod user;

pub use self::{common::*, ledger::*, organization::*, rental::*, tool::*, user::*};
