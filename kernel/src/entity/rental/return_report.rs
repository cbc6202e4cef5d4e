use destructure::Destructure;
use serde::{Deserialize, Serialize};
use vodca::References;

use crate::entity::{Cents, RentalNotes, ReturnCondition};

/// What the owner recorded when the tool came back. A positive surcharge is
/// charged to the renter on top of the rental cost, a negative one is
/// credited back to them.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize, References, Destructure)]
pub struct ReturnReport {
    condition: ReturnCondition,
    surcharge_or_credit: Cents,
    notes: Option<RentalNotes>,
}

impl ReturnReport {
    pub fn new(
        condition: ReturnCondition,
        surcharge_or_credit: Cents,
        notes: Option<RentalNotes>,
    ) -> Self {
        Self {
            condition,
            surcharge_or_credit,
            notes,
        }
    }
}
