use error_stack::Report;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use vodca::{AsRefln, Fromln};

use crate::KernelError;

/// Signed amount of money in cents. Negative values are debits.
#[derive(
    Debug, Default, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Fromln, AsRefln, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Cents(i64);

impl Cents {
    pub const ZERO: Cents = Cents(0);

    pub fn new(cents: impl Into<i64>) -> Self {
        Self(cents.into())
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// The `checked_*` family fails with `InvalidInput` when the result
    /// leaves the `i64` range.
    pub fn checked_add(self, rhs: Cents) -> error_stack::Result<Cents, KernelError> {
        self.0
            .checked_add(rhs.0)
            .map(Cents)
            .ok_or_else(|| overflow(format!("{self} + {rhs}")))
    }

    pub fn checked_sub(self, rhs: Cents) -> error_stack::Result<Cents, KernelError> {
        self.0
            .checked_sub(rhs.0)
            .map(Cents)
            .ok_or_else(|| overflow(format!("{self} - {rhs}")))
    }

    pub fn checked_neg(self) -> error_stack::Result<Cents, KernelError> {
        self.0
            .checked_neg()
            .map(Cents)
            .ok_or_else(|| overflow(format!("-{self}")))
    }

    pub fn checked_mul(self, rhs: i64) -> error_stack::Result<Cents, KernelError> {
        self.0
            .checked_mul(rhs)
            .map(Cents)
            .ok_or_else(|| overflow(format!("{self} * {rhs}")))
    }

    pub fn checked_sum<I>(amounts: I) -> error_stack::Result<Cents, KernelError>
    where
        I: IntoIterator<Item = Cents>,
    {
        amounts
            .into_iter()
            .try_fold(Cents::ZERO, |total, amount| total.checked_add(amount))
    }
}

fn overflow(expression: String) -> Report<KernelError> {
    Report::new(KernelError::InvalidInput)
        .attach_printable(format!("Amount out of range: {expression}"))
}

impl Display for Cents {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}¢", self.0)
    }
}

#[cfg(test)]
mod test {
    use super::Cents;
    use crate::KernelError;

    #[test]
    fn arithmetic_in_range() {
        let amount = Cents::new(8500);
        assert_eq!(amount.checked_add(Cents::new(1500)).unwrap(), Cents::new(10000));
        assert_eq!(amount.checked_sub(Cents::new(9000)).unwrap(), Cents::new(-500));
        assert_eq!(amount.checked_neg().unwrap(), Cents::new(-8500));
        assert_eq!(amount.checked_mul(3).unwrap(), Cents::new(25500));
        assert_eq!(
            Cents::checked_sum([amount, Cents::new(-500), Cents::ZERO]).unwrap(),
            Cents::new(8000)
        );
    }

    #[test]
    fn overflow_is_invalid_input() {
        let errors = [
            Cents::new(i64::MAX).checked_add(Cents::new(1)).unwrap_err(),
            Cents::new(i64::MIN).checked_sub(Cents::new(1)).unwrap_err(),
            Cents::new(i64::MIN).checked_neg().unwrap_err(),
            Cents::new(i64::MAX).checked_mul(2).unwrap_err(),
            Cents::checked_sum([Cents::new(i64::MAX), Cents::new(1)]).unwrap_err(),
        ];
        for error in errors {
            assert_eq!(error.current_context(), &KernelError::InvalidInput);
        }
    }
}
