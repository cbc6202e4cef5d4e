mod description;
mod id;
mod kind;

pub use self::{description::*, id::*, kind::*};
use destructure::Destructure;
use serde::{Deserialize, Serialize};
use time::Date;
use vodca::References;

use crate::entity::{Cents, CreatedAt, OrganizationId, RentalId, UserId};

/// One immutable posting against a member's account. A negative amount is a
/// debit. Entries are never updated or deleted; corrections are new entries.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize, References, Destructure)]
pub struct LedgerTransaction {
    id: LedgerTransactionId,
    org_id: OrganizationId,
    user_id: UserId,
    amount: Cents,
    kind: LedgerTransactionType,
    related_rental_id: Option<RentalId>,
    description: LedgerDescription,
    charged_on: Date,
    created_at: CreatedAt<LedgerTransaction>,
}

impl LedgerTransaction {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: LedgerTransactionId,
        org_id: OrganizationId,
        user_id: UserId,
        amount: Cents,
        kind: LedgerTransactionType,
        related_rental_id: Option<RentalId>,
        description: LedgerDescription,
        charged_on: Date,
        created_at: CreatedAt<LedgerTransaction>,
    ) -> Self {
        Self {
            id,
            org_id,
            user_id,
            amount,
            kind,
            related_rental_id,
            description,
            charged_on,
            created_at,
        }
    }
}
