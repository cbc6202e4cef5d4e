use destructure::Destructure;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;
use vodca::{AsRefln, Fromln, References};

use crate::entity::{Cents, UserId};

#[derive(Debug, Clone, Hash, Eq, PartialEq, Fromln, AsRefln, Serialize, Deserialize)]
pub struct OrganizationId(Uuid);

impl OrganizationId {
    pub fn new(id: impl Into<Uuid>) -> Self {
        Self(id.into())
    }
}

impl Display for OrganizationId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A user's seat in an organization. `balance` is a cached projection of the
/// ledger and is only ever written together with the ledger row it mirrors.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize, Destructure, References)]
pub struct Membership {
    org_id: OrganizationId,
    user_id: UserId,
    balance: Cents,
}

impl Membership {
    pub fn new(org_id: OrganizationId, user_id: UserId, balance: Cents) -> Self {
        Self {
            org_id,
            user_id,
            balance,
        }
    }
}
