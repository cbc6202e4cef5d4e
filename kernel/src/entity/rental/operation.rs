use std::fmt::{Display, Formatter};

use crate::entity::RentalStatus;

/// Who may drive a transition.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Party {
    Renter,
    Owner,
    Either,
}

/// Every guarded transition of the rental lifecycle.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum RentalOperation {
    Approve,
    Reject,
    Finalize,
    Activate,
    Complete,
    Cancel,
    ChangeDates,
    ApproveDateChange,
    RejectDateChange,
    AcknowledgeDateChangeRejection,
    CancelDateChange,
}

impl RentalOperation {
    pub fn party(&self) -> Party {
        match self {
            RentalOperation::Approve
            | RentalOperation::Reject
            | RentalOperation::Activate
            | RentalOperation::Complete
            | RentalOperation::ApproveDateChange
            | RentalOperation::RejectDateChange => Party::Owner,
            RentalOperation::Finalize
            | RentalOperation::AcknowledgeDateChangeRejection
            | RentalOperation::CancelDateChange => Party::Renter,
            RentalOperation::Cancel | RentalOperation::ChangeDates => Party::Either,
        }
    }

    pub fn permits(&self, status: RentalStatus) -> bool {
        use RentalStatus::*;
        match self {
            RentalOperation::Approve | RentalOperation::Reject => matches!(status, Pending),
            RentalOperation::Finalize => matches!(status, Approved),
            RentalOperation::Activate => matches!(status, Scheduled),
            RentalOperation::Complete => matches!(status, Active | Overdue),
            RentalOperation::Cancel => matches!(status, Pending | Approved | Scheduled),
            RentalOperation::ChangeDates => matches!(status, Scheduled | Active),
            RentalOperation::ApproveDateChange
            | RentalOperation::RejectDateChange
            | RentalOperation::CancelDateChange => matches!(status, ReturnDateChanged),
            RentalOperation::AcknowledgeDateChangeRejection => {
                matches!(status, ReturnDateChangeRejected)
            }
        }
    }
}

impl Display for RentalOperation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RentalOperation::Approve => "approve",
            RentalOperation::Reject => "reject",
            RentalOperation::Finalize => "finalize",
            RentalOperation::Activate => "activate",
            RentalOperation::Complete => "complete",
            RentalOperation::Cancel => "cancel",
            RentalOperation::ChangeDates => "change the dates of",
            RentalOperation::ApproveDateChange => "approve the date change of",
            RentalOperation::RejectDateChange => "reject the date change of",
            RentalOperation::AcknowledgeDateChangeRejection => {
                "acknowledge the counter-proposal of"
            }
            RentalOperation::CancelDateChange => "withdraw the date change of",
        };
        f.write_str(name)
    }
}
