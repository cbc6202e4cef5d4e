use destructure::Destructure;
use vodca::References;

use crate::entity::{RentalStatus, SelectLimit, SelectOffset};

/// Listing filter. An empty status set matches every status.
#[derive(Debug, Clone, Default, Eq, PartialEq, References, Destructure)]
pub struct RentalFilter {
    statuses: Vec<RentalStatus>,
    limit: SelectLimit,
    offset: SelectOffset,
}

impl RentalFilter {
    pub fn new(statuses: Vec<RentalStatus>, limit: SelectLimit, offset: SelectOffset) -> Self {
        Self {
            statuses,
            limit,
            offset,
        }
    }

    /// Every rental in one of `statuses`, without paging.
    pub fn with_statuses(statuses: impl IntoIterator<Item = RentalStatus>) -> Self {
        Self {
            statuses: statuses.into_iter().collect(),
            limit: SelectLimit::unbounded(),
            offset: SelectOffset::default(),
        }
    }

    pub fn matches(&self, status: &RentalStatus) -> bool {
        self.statuses.is_empty() || self.statuses.contains(status)
    }
}
