use destructure::Destructure;
use std::fmt::{Display, Formatter};
use vodca::References;

use crate::entity::{RentalId, RentalStatus, User};
use crate::KernelError;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum NotificationKind {
    Requested,
    Approved,
    Rejected,
    Finalized,
    PickedUp,
    Completed,
    Cancelled,
    DatesProposed,
    DatesApproved,
    DatesCountered,
    DatesSettled,
    DatesWithdrawn,
}

impl Display for NotificationKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            NotificationKind::Requested => "requested",
            NotificationKind::Approved => "approved",
            NotificationKind::Rejected => "rejected",
            NotificationKind::Finalized => "finalized",
            NotificationKind::PickedUp => "picked_up",
            NotificationKind::Completed => "completed",
            NotificationKind::Cancelled => "cancelled",
            NotificationKind::DatesProposed => "dates_proposed",
            NotificationKind::DatesApproved => "dates_approved",
            NotificationKind::DatesCountered => "dates_countered",
            NotificationKind::DatesSettled => "dates_settled",
            NotificationKind::DatesWithdrawn => "dates_withdrawn",
        };
        f.write_str(name)
    }
}

/// A message for the counterparty of a committed transition.
#[derive(Debug, Clone, Eq, PartialEq, References, Destructure)]
pub struct RentalNotification {
    rental_id: RentalId,
    status: RentalStatus,
    kind: NotificationKind,
    recipient: User,
}

impl RentalNotification {
    pub fn new(
        rental_id: RentalId,
        status: RentalStatus,
        kind: NotificationKind,
        recipient: User,
    ) -> Self {
        Self {
            rental_id,
            status,
            kind,
            recipient,
        }
    }
}

/// Delivery sink for rental notifications. Callers treat it as
/// fire-and-forget; an error here never undoes the transition.
#[async_trait::async_trait]
pub trait RentalNotifier: 'static + Sync + Send {
    async fn notify(
        &self,
        notification: RentalNotification,
    ) -> error_stack::Result<(), KernelError>;
}

pub trait DependOnRentalNotifier: 'static + Sync + Send {
    type RentalNotifier: RentalNotifier;
    fn rental_notifier(&self) -> &Self::RentalNotifier;
}
