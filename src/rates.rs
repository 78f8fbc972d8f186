use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{CalculationError, Result};
use crate::inputs::LoanInputs;

/// Per-period rate and payment count for a monthly-pay loan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateTerm {
    /// Monthly interest rate as a decimal (0.005625 for 6.75% a year).
    pub monthly_rate: Decimal,
    /// Total number of monthly payments.
    pub num_payments: u32,
}

impl RateTerm {
    pub fn new(interest_rate_percent: Decimal, term_years: u32) -> Result<Self> {
        let num_payments = term_years
            .checked_mul(12)
            .ok_or(CalculationError::Overflow {
                stage: "number of payments",
            })?;

        Ok(Self {
            monthly_rate: normalize_annual_interest_rate(interest_rate_percent),
            num_payments,
        })
    }

    pub fn from_inputs(inputs: &LoanInputs) -> Result<Self> {
        Self::new(inputs.interest_rate_percent, inputs.term_years)
    }
}

/// Normalizes an annual interest rate percentage to a nominal monthly rate.
///
/// US mortgages quote a nominal annual rate, so 6.75% a year becomes
/// 6.75 / 100 / 12 = 0.005625 per month with no compounding adjustment.
pub fn normalize_annual_interest_rate(input: Decimal) -> Decimal {
    input / dec!(100) / dec!(12)
}

/// Per-diem rate for an annual percentage, used for interest charged between
/// closing and the first payment.
pub fn daily_rate(interest_rate_percent: Decimal, days_per_year: u32) -> Decimal {
    if days_per_year == 0 {
        return Decimal::ZERO;
    }
    interest_rate_percent / dec!(100) / Decimal::from(days_per_year)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(dec!(6.75), dec!(0.005625))]
    #[case(dec!(12), dec!(0.01))]
    #[case(dec!(0), dec!(0))]
    fn test_normalize_annual_interest_rate(#[case] annual: Decimal, #[case] monthly: Decimal) {
        assert_eq!(normalize_annual_interest_rate(annual), monthly);
    }

    #[test]
    fn test_rate_term_from_inputs() {
        let inputs = LoanInputs::new(dec!(750000), dec!(150000), dec!(6.75), 30);
        let rate_term = RateTerm::from_inputs(&inputs).unwrap();
        assert_eq!(rate_term.monthly_rate, dec!(0.005625));
        assert_eq!(rate_term.num_payments, 360);
    }

    #[test]
    fn test_rate_term_overflow() {
        let result = RateTerm::new(dec!(5), u32::MAX);
        assert!(matches!(result, Err(CalculationError::Overflow { .. })));
    }

    #[test]
    fn test_daily_rate() {
        assert_eq!(daily_rate(dec!(7.3), 365), dec!(0.0002));
        assert_eq!(daily_rate(dec!(7.3), 0), dec!(0));
    }
}
