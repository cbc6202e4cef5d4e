use error_stack::Report;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::KernelError;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LedgerTransactionType {
    RentalDebit,
    LendingCredit,
    Refund,
    Adjustment,
}

impl LedgerTransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LedgerTransactionType::RentalDebit => "RENTAL_DEBIT",
            LedgerTransactionType::LendingCredit => "LENDING_CREDIT",
            LedgerTransactionType::Refund => "REFUND",
            LedgerTransactionType::Adjustment => "ADJUSTMENT",
        }
    }
}

impl Display for LedgerTransactionType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LedgerTransactionType {
    type Err = Report<KernelError>;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "RENTAL_DEBIT" => Ok(LedgerTransactionType::RentalDebit),
            "LENDING_CREDIT" => Ok(LedgerTransactionType::LendingCredit),
            "REFUND" => Ok(LedgerTransactionType::Refund),
            "ADJUSTMENT" => Ok(LedgerTransactionType::Adjustment),
            _ => Err(Report::new(KernelError::InvalidInput)
                .attach_printable(format!("Unknown ledger transaction type `{s}`"))),
        }
    }
}
