//! Decimal ↔ cents conversion for money columns

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::domain::{DomainError, DomainResult};

/// Exact conversion to whole cents for storage.
///
/// Amounts with sub-cent digits or outside the `i64` range are refused
/// rather than rounded, so what is read back equals what was written.
pub fn to_cents(amount: Decimal) -> DomainResult<i64> {
    if amount.round_dp(2) != amount {
        return Err(DomainError::Validation(format!(
            "Amount {} has more than two decimal places",
            amount
        )));
    }
    amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|cents| cents.to_i64())
        .ok_or_else(|| DomainError::Validation(format!("Amount out of range: {}", amount)))
}

pub fn from_cents(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn cents_keep_two_decimals() {
        let amount = Decimal::from_str("199.98").unwrap();
        assert_eq!(to_cents(amount).unwrap(), 19998);
        assert_eq!(from_cents(19998), amount);
        assert_eq!(from_cents(20000), Decimal::new(200, 0));
        assert_eq!(to_cents(Decimal::from_str("10.500").unwrap()).unwrap(), 1050);
    }

    #[test]
    fn sub_cent_amounts_are_refused() {
        for raw in ["0.004", "10.005", "99.995"] {
            let err = to_cents(Decimal::from_str(raw).unwrap()).unwrap_err();
            assert_eq!(err.kind(), "Validation", "{}", raw);
        }
    }

    #[test]
    fn huge_amounts_are_refused_without_panicking() {
        assert_eq!(to_cents(Decimal::MAX).unwrap_err().kind(), "Validation");
        assert_eq!(to_cents(Decimal::MIN).unwrap_err().kind(), "Validation");
        let beyond_i64 = Decimal::from(i64::MAX);
        assert_eq!(to_cents(beyond_i64).unwrap_err().kind(), "Validation");
    }
}
