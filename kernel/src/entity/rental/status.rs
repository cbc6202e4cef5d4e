use error_stack::Report;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::KernelError;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RentalStatus {
    Pending,
    Approved,
    Rejected,
    Scheduled,
    Active,
    Completed,
    Cancelled,
    Overdue,
    ReturnDateChanged,
    ReturnDateChangeRejected,
}

impl RentalStatus {
    pub const ALL: [RentalStatus; 10] = [
        RentalStatus::Pending,
        RentalStatus::Approved,
        RentalStatus::Rejected,
        RentalStatus::Scheduled,
        RentalStatus::Active,
        RentalStatus::Completed,
        RentalStatus::Cancelled,
        RentalStatus::Overdue,
        RentalStatus::ReturnDateChanged,
        RentalStatus::ReturnDateChangeRejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RentalStatus::Pending => "PENDING",
            RentalStatus::Approved => "APPROVED",
            RentalStatus::Rejected => "REJECTED",
            RentalStatus::Scheduled => "SCHEDULED",
            RentalStatus::Active => "ACTIVE",
            RentalStatus::Completed => "COMPLETED",
            RentalStatus::Cancelled => "CANCELLED",
            RentalStatus::Overdue => "OVERDUE",
            RentalStatus::ReturnDateChanged => "RETURN_DATE_CHANGED",
            RentalStatus::ReturnDateChangeRejected => "RETURN_DATE_CHANGE_REJECTED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RentalStatus::Completed | RentalStatus::Cancelled | RentalStatus::Rejected
        )
    }
}

impl Display for RentalStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RentalStatus {
    type Err = Report<KernelError>;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RentalStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                Report::new(KernelError::InvalidInput)
                    .attach_printable(format!("Unknown rental status `{s}`"))
            })
    }
}

#[cfg(test)]
mod test {
    use super::RentalStatus;
    use std::str::FromStr;

    #[test]
    fn parses_storage_names() {
        for status in RentalStatus::ALL {
            assert_eq!(RentalStatus::from_str(status.as_str()).unwrap(), status);
        }
        assert_eq!(
            RentalStatus::from_str("return_date_changed").unwrap(),
            RentalStatus::ReturnDateChanged
        );
        assert!(RentalStatus::from_str("LOST").is_err());
    }
}
