use error_stack::Report;
use time::macros::format_description;
use time::{Date, Month};
use vodca::References;

use crate::entity::{Cents, DurationUnit, PriceSnapshot};
use crate::KernelError;

/// Parses a calendar date in `YYYY-MM-DD` form.
pub fn parse_date(value: &str) -> error_stack::Result<Date, KernelError> {
    Date::parse(value.trim(), format_description!("[year]-[month]-[day]")).map_err(|error| {
        Report::new(KernelError::InvalidInput)
            .attach_printable(format!("`{value}` is not a YYYY-MM-DD date: {error}"))
    })
}

/// Moves `date` forward by whole calendar months, clamping the day to the
/// end of the target month (Jan 31 + 1 month is the last day of February).
pub fn add_months(date: Date, months: u32) -> error_stack::Result<Date, KernelError> {
    let index = date.year() as i64 * 12 + (date.month() as i64 - 1) + months as i64;
    let year = i32::try_from(index.div_euclid(12)).map_err(|_| {
        Report::new(KernelError::InvalidInput).attach_printable("Date is out of range")
    })?;
    let month = Month::try_from(index.rem_euclid(12) as u8 + 1)
        .map_err(|error| Report::new(KernelError::Internal).attach_printable(error))?;
    let day = date.day().min(time::util::days_in_year_month(year, month));
    Date::from_calendar_date(year, month, day).map_err(|error| {
        Report::new(KernelError::InvalidInput)
            .attach_printable(format!("Date is out of range: {error}"))
    })
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, References)]
pub struct DateDifference {
    months: u32,
    days: u32,
}

/// Splits `[start, end)` into whole calendar months counted from `start` and
/// the days left over after the last whole month.
pub fn calculate_date_difference(
    start: Date,
    end: Date,
) -> error_stack::Result<DateDifference, KernelError> {
    if end < start {
        return Err(Report::new(KernelError::InvalidInput)
            .attach_printable(format!("End date {end} is before start date {start}")));
    }
    let mut months = ((end.year() - start.year()) * 12 + end.month() as i32
        - start.month() as i32)
        .max(0) as u32;
    let mut anchor = add_months(start, months)?;
    if anchor > end {
        months -= 1;
        anchor = add_months(start, months)?;
    }
    let days = (end - anchor).whole_days() as u32;
    Ok(DateDifference { months, days })
}

/// Billed units and their cost. `months`, `weeks` and `days` are what is
/// actually charged, after any rounding up to a cheaper larger unit.
#[derive(Debug, Clone, Copy, Eq, PartialEq, References)]
pub struct CostBreakdown {
    months: u32,
    weeks: u32,
    days: u32,
    month_cost: Cents,
    week_cost: Cents,
    day_cost: Cents,
    total: Cents,
}

impl CostBreakdown {
    fn new(
        months: u32,
        weeks: u32,
        days: u32,
        price: &PriceSnapshot,
    ) -> error_stack::Result<Self, KernelError> {
        let month_cost = price.monthly_price().checked_mul(months.into())?;
        let week_cost = price.weekly_price().checked_mul(weeks.into())?;
        let day_cost = price.daily_price().checked_mul(days.into())?;
        Ok(Self {
            months,
            weeks,
            days,
            month_cost,
            week_cost,
            day_cost,
            total: Cents::checked_sum([month_cost, week_cost, day_cost])?,
        })
    }
}

pub fn calculate_rental_cost_breakdown(
    start: Date,
    end: Date,
    price: &PriceSnapshot,
) -> error_stack::Result<CostBreakdown, KernelError> {
    let difference = calculate_date_difference(start, end)?;
    let mut months = difference.months;
    let remainder = difference.days;
    let daily = *price.daily_price();
    let weekly = *price.weekly_price();
    let monthly = *price.monthly_price();

    // A larger unit replaces the leftover smaller ones whenever it is cheaper.
    let breakdown = match price.duration_unit() {
        DurationUnit::Day => {
            let mut weeks = remainder / 7;
            let mut days = remainder % 7;
            if weekly.is_positive() && daily.checked_mul(days.into())? > weekly {
                weeks += 1;
                days = 0;
            }
            let partial = weekly
                .checked_mul(weeks.into())?
                .checked_add(daily.checked_mul(days.into())?)?;
            if monthly.is_positive() && partial > monthly {
                months += 1;
                weeks = 0;
                days = 0;
            }
            CostBreakdown::new(months, weeks, days, price)?
        }
        DurationUnit::Week => {
            let mut weeks = remainder.div_ceil(7);
            if monthly.is_positive() && weekly.checked_mul(weeks.into())? > monthly {
                months += 1;
                weeks = 0;
            }
            CostBreakdown::new(months, weeks, 0, price)?
        }
        DurationUnit::Month => {
            if remainder > 0 {
                months += 1;
            }
            CostBreakdown::new(months.max(1), 0, 0, price)?
        }
    };
    Ok(breakdown)
}

pub fn calculate_rental_cost(
    start: Date,
    end: Date,
    price: &PriceSnapshot,
) -> error_stack::Result<Cents, KernelError> {
    Ok(calculate_rental_cost_breakdown(start, end, price)?.total)
}

#[cfg(test)]
mod test {
    use proptest::prelude::*;
    use time::macros::date;
    use time::Duration;

    use super::*;
    use crate::entity::{Cents, DurationUnit, PriceSnapshot};

    fn sheet(unit: DurationUnit) -> PriceSnapshot {
        PriceSnapshot::new(
            unit,
            Cents::new(1000),
            Cents::new(4500),
            Cents::new(13500),
            Cents::new(50000),
        )
    }

    #[test]
    fn eleven_days_is_a_week_and_four_days() {
        let breakdown = calculate_rental_cost_breakdown(
            date!(2024 - 03 - 01),
            date!(2024 - 03 - 12),
            &sheet(DurationUnit::Day),
        )
        .unwrap();
        assert_eq!(breakdown.weeks(), &1);
        assert_eq!(breakdown.days(), &4);
        assert_eq!(breakdown.total(), &Cents::new(8500));
    }

    #[test]
    fn month_unit_rounds_partial_months_up() {
        let cost = calculate_rental_cost(
            date!(2024 - 01 - 10),
            date!(2024 - 03 - 15),
            &sheet(DurationUnit::Month),
        )
        .unwrap();
        assert_eq!(cost, Cents::new(40500));

        let same_day = calculate_rental_cost(
            date!(2024 - 01 - 10),
            date!(2024 - 01 - 10),
            &sheet(DurationUnit::Month),
        )
        .unwrap();
        assert_eq!(same_day, Cents::new(13500));
    }

    #[test]
    fn week_unit_charges_partial_weeks_in_full() {
        let cost = calculate_rental_cost(
            date!(2024 - 03 - 01),
            date!(2024 - 03 - 09),
            &sheet(DurationUnit::Week),
        )
        .unwrap();
        assert_eq!(cost, Cents::new(9000));
    }

    #[test]
    fn six_days_bill_as_a_week_when_cheaper() {
        let breakdown = calculate_rental_cost_breakdown(
            date!(2024 - 03 - 01),
            date!(2024 - 03 - 07),
            &sheet(DurationUnit::Day),
        )
        .unwrap();
        assert_eq!(breakdown.weeks(), &1);
        assert_eq!(breakdown.days(), &0);
        assert_eq!(breakdown.total(), &Cents::new(4500));
    }

    #[test]
    fn month_difference_borrows_across_month_lengths() {
        let difference =
            calculate_date_difference(date!(2024 - 01 - 31), date!(2024 - 02 - 29)).unwrap();
        assert_eq!((difference.months(), difference.days()), (&1, &0));

        let difference =
            calculate_date_difference(date!(2023 - 01 - 31), date!(2023 - 03 - 02)).unwrap();
        assert_eq!((difference.months(), difference.days()), (&1, &2));

        let difference =
            calculate_date_difference(date!(2024 - 03 - 15), date!(2024 - 04 - 14)).unwrap();
        assert_eq!((difference.months(), difference.days()), (&0, &30));

        let difference =
            calculate_date_difference(date!(2023 - 12 - 20), date!(2025 - 01 - 25)).unwrap();
        assert_eq!((difference.months(), difference.days()), (&13, &5));
    }

    #[test]
    fn month_end_clamps_in_leap_and_common_years() {
        assert_eq!(
            add_months(date!(2024 - 01 - 31), 1).unwrap(),
            date!(2024 - 02 - 29)
        );
        assert_eq!(
            add_months(date!(2023 - 01 - 31), 1).unwrap(),
            date!(2023 - 02 - 28)
        );
        assert_eq!(
            add_months(date!(2023 - 11 - 30), 3).unwrap(),
            date!(2024 - 02 - 29)
        );
    }

    #[test]
    fn reversed_or_malformed_dates_are_invalid_input() {
        let error = calculate_rental_cost(
            date!(2024 - 03 - 12),
            date!(2024 - 03 - 01),
            &sheet(DurationUnit::Day),
        )
        .unwrap_err();
        assert_eq!(error.current_context(), &KernelError::InvalidInput);

        for value in ["2024-02-30", "2024/02/01", "", "24-2-1"] {
            let error = parse_date(value).unwrap_err();
            assert_eq!(error.current_context(), &KernelError::InvalidInput);
        }
        assert_eq!(parse_date("2024-02-29").unwrap(), date!(2024 - 02 - 29));
    }

    fn unit() -> impl Strategy<Value = DurationUnit> {
        prop_oneof![
            Just(DurationUnit::Day),
            Just(DurationUnit::Week),
            Just(DurationUnit::Month),
        ]
    }

    proptest! {
        #[test]
        fn cost_never_decreases_as_the_rental_grows(
            unit in unit(),
            daily in 1i64..20_000,
            weekly in 1i64..100_000,
            monthly in 1i64..400_000,
            offset in 0i64..3_000,
            length in 0i64..500,
        ) {
            let price = PriceSnapshot::new(
                unit,
                Cents::new(daily),
                Cents::new(weekly),
                Cents::new(monthly),
                Cents::ZERO,
            );
            let start = date!(2022 - 01 - 01) + Duration::days(offset);
            let end = start + Duration::days(length);
            let shorter = calculate_rental_cost(start, end, &price).unwrap();
            let longer = calculate_rental_cost(start, end + Duration::days(1), &price).unwrap();
            prop_assert!(shorter <= longer, "{shorter} > {longer} for {start}..{end}");
        }
    }
}
