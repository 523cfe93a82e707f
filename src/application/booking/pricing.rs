//! Pricing calculator

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::domain::{DomainError, DomainResult, StayPeriod};

/// `price_per_night × nights`, nights being whole days between the dates.
///
/// Callers guarantee `check_out > check_in`; no rounding is applied beyond
/// the precision of the nightly rate. A total beyond `Decimal` range is a
/// `Validation` error.
pub fn calculate_total_price(
    price_per_night: Decimal,
    check_in: NaiveDate,
    check_out: NaiveDate,
) -> DomainResult<Decimal> {
    let nights = (check_out - check_in).num_days();
    price_per_night
        .checked_mul(Decimal::from(nights))
        .ok_or_else(|| {
            DomainError::Validation(format!(
                "Total price overflows for {} nights at {}",
                nights, price_per_night
            ))
        })
}

pub fn price_for_period(price_per_night: Decimal, period: &StayPeriod) -> DomainResult<Decimal> {
    calculate_total_price(price_per_night, period.check_in, period.check_out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn two_nights_at_one_hundred() {
        let total = calculate_total_price(Decimal::new(100, 0), date(2024, 6, 12), date(2024, 6, 14));
        assert_eq!(total.unwrap(), Decimal::new(200, 0));
    }

    #[test]
    fn total_is_rate_times_nights() {
        let rates = ["99.99", "150", "0.01", "1234.50"];
        for rate in rates {
            let rate = Decimal::from_str(rate).unwrap();
            for nights in 1..=31i64 {
                let check_in = date(2024, 1, 1);
                let check_out = check_in + chrono::Duration::days(nights);
                assert_eq!(
                    calculate_total_price(rate, check_in, check_out).unwrap(),
                    rate * Decimal::from(nights)
                );
            }
        }
    }

    #[test]
    fn keeps_cents_exact() {
        let rate = Decimal::from_str("99.99").unwrap();
        let total = calculate_total_price(rate, date(2024, 2, 28), date(2024, 3, 1));
        assert_eq!(total.unwrap(), Decimal::from_str("199.98").unwrap());
    }

    #[test]
    fn period_wrapper_agrees() {
        let period = StayPeriod::new(date(2024, 6, 10), date(2024, 6, 13)).unwrap();
        assert_eq!(
            price_for_period(Decimal::new(150, 0), &period).unwrap(),
            Decimal::new(450, 0)
        );
    }

    #[test]
    fn overflowing_total_is_a_validation_error() {
        let err = calculate_total_price(Decimal::MAX, date(2024, 6, 10), date(2024, 6, 12))
            .unwrap_err();
        assert_eq!(err.kind(), "Validation");
        assert_eq!(
            calculate_total_price(Decimal::MAX, date(2024, 6, 10), date(2024, 6, 11)).unwrap(),
            Decimal::MAX
        );
    }
}
