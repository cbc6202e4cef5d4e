use error_stack::Report;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::pricing::parse_date;
use crate::KernelError;

/// Half-open booking interval `[start, end)`: the tool goes out on `start`
/// and is due back on `end`, so `end - start` is the number of charged days.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct RentalPeriod {
    start: Date,
    end: Date,
}

impl RentalPeriod {
    pub fn new(start: Date, end: Date) -> error_stack::Result<Self, KernelError> {
        if end < start {
            return Err(Report::new(KernelError::InvalidInput)
                .attach_printable(format!("End date {end} is before start date {start}")));
        }
        Ok(Self { start, end })
    }

    pub fn parse(start: &str, end: &str) -> error_stack::Result<Self, KernelError> {
        Self::new(parse_date(start)?, parse_date(end)?)
    }

    pub fn start(&self) -> Date {
        self.start
    }

    pub fn end(&self) -> Date {
        self.end
    }

    pub fn overlaps(&self, other: &RentalPeriod) -> bool {
        self.start < other.end && other.start < self.end
    }
}

#[cfg(test)]
mod test {
    use super::RentalPeriod;
    use crate::KernelError;
    use time::macros::date;

    #[test]
    fn rejects_reversed_range() {
        let error = RentalPeriod::new(date!(2024 - 03 - 02), date!(2024 - 03 - 01)).unwrap_err();
        assert_eq!(error.current_context(), &KernelError::InvalidInput);
    }

    #[test]
    fn same_day_is_an_empty_but_valid_range() {
        let period = RentalPeriod::parse("2024-03-01", "2024-03-01").unwrap();
        assert_eq!(period.start(), period.end());
    }

    #[test]
    fn malformed_dates_are_invalid_input() {
        let error = RentalPeriod::parse("2024-13-01", "2024-03-01").unwrap_err();
        assert_eq!(error.current_context(), &KernelError::InvalidInput);
        assert!(RentalPeriod::parse("yesterday", "2024-03-01").is_err());
    }

    #[test]
    fn touching_ranges_do_not_overlap() {
        let first = RentalPeriod::parse("2024-03-01", "2024-03-05").unwrap();
        let second = RentalPeriod::parse("2024-03-05", "2024-03-09").unwrap();
        let third = RentalPeriod::parse("2024-03-04", "2024-03-06").unwrap();
        assert!(!first.overlaps(&second));
        assert!(first.overlaps(&third));
        assert!(second.overlaps(&third));
    }
}
