mod date_change;
mod fulfillment;
mod ledger;
mod notify;
mod overdue;
mod rental;
mod request;

pub use self::{date_change::*, fulfillment::*, ledger::*, overdue::*, rental::*, request::*};

#[cfg(test)]
mod test;
