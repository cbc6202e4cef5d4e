use error_stack::Report;

use crate::entity::Cents;
use crate::KernelError;

/// Optional floor a member's balance may not be pushed below by a new
/// rental request. Without a floor every request is accepted.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct BalancePolicy {
    min_allowed_balance: Option<Cents>,
}

impl BalancePolicy {
    pub fn new(min_allowed_balance: Option<Cents>) -> Self {
        Self {
            min_allowed_balance,
        }
    }

    pub fn min_allowed_balance(&self) -> Option<Cents> {
        self.min_allowed_balance
    }

    pub fn check(&self, balance: Cents, cost: Cents) -> error_stack::Result<(), KernelError> {
        let Some(floor) = self.min_allowed_balance else {
            return Ok(());
        };
        if balance.checked_sub(cost)? < floor {
            return Err(Report::new(KernelError::InsufficientBalance).attach_printable(format!(
                "Balance {balance} minus cost {cost} would fall below {floor}"
            )));
        }
        Ok(())
    }
}

pub trait DependOnBalancePolicy: 'static + Sync + Send {
    fn balance_policy(&self) -> &BalancePolicy;
}

#[cfg(test)]
mod test {
    use super::BalancePolicy;
    use crate::entity::Cents;
    use crate::KernelError;

    #[test]
    fn no_floor_accepts_anything() {
        let policy = BalancePolicy::default();
        assert!(policy.check(Cents::new(-1_000_000), Cents::new(500)).is_ok());
    }

    #[test]
    fn floor_is_inclusive() {
        let policy = BalancePolicy::new(Some(Cents::new(-1000)));
        assert!(policy.check(Cents::new(0), Cents::new(1000)).is_ok());
        let error = policy.check(Cents::new(0), Cents::new(1001)).unwrap_err();
        assert_eq!(error.current_context(), &KernelError::InsufficientBalance);
    }

    #[test]
    fn out_of_range_cost_is_invalid_input() {
        let policy = BalancePolicy::new(Some(Cents::new(0)));
        let error = policy
            .check(Cents::new(i64::MIN), Cents::new(1))
            .unwrap_err();
        assert_eq!(error.current_context(), &KernelError::InvalidInput);
    }
}
