//! Loan inputs as the calculators collect them, plus the caller-side helpers
//! that turn form text into numbers.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{CalculationError, Result};

/// Loan program selected by the buyer.
///
/// Collected for display only. Mortgage insurance uses the same flat rule for
/// every program.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanType {
    #[default]
    Conventional,
    Fha,
    Va,
    Usda,
    Jumbo,
}

/// Property location, used to pick the transfer tax rate.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    California,
    NewYork,
    Texas,
    Florida,
    Illinois,
    #[default]
    Other,
}

impl Location {
    pub fn key(&self) -> &'static str {
        match self {
            Location::California => "california",
            Location::NewYork => "newyork",
            Location::Texas => "texas",
            Location::Florida => "florida",
            Location::Illinois => "illinois",
            Location::Other => "other",
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Location {
    type Err = Infallible;

    /// Accepts the calculator's select keys, plain state names and two-letter
    /// codes. Unknown locations fall back to `Other`.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();

        Ok(match normalized.as_str() {
            "california" | "ca" => Location::California,
            "newyork" | "ny" => Location::NewYork,
            "texas" | "tx" => Location::Texas,
            "florida" | "fl" => Location::Florida,
            "illinois" | "il" => Location::Illinois,
            _ => Location::Other,
        })
    }
}

/// Everything the mortgage and closing-cost calculators ask for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanInputs {
    /// Purchase price of the home.
    pub home_price: Decimal,
    /// Cash paid up front. Must not exceed the home price.
    pub down_payment: Decimal,
    /// Annual interest rate as a percentage (e.g., 6.75 for 6.75%).
    pub interest_rate_percent: Decimal,
    /// Loan term in years.
    pub term_years: u32,
    #[serde(default)]
    pub property_tax_annual: Decimal,
    #[serde(default)]
    pub home_insurance_annual: Decimal,
    #[serde(default)]
    pub hoa_annual: Decimal,
    #[serde(default)]
    pub location: Location,
    #[serde(default)]
    pub loan_type: LoanType,
}

impl LoanInputs {
    /// Inputs with no taxes, insurance or HOA dues, in an unlisted location.
    pub fn new(
        home_price: Decimal,
        down_payment: Decimal,
        interest_rate_percent: Decimal,
        term_years: u32,
    ) -> Self {
        Self {
            home_price,
            down_payment,
            interest_rate_percent,
            term_years,
            property_tax_annual: Decimal::ZERO,
            home_insurance_annual: Decimal::ZERO,
            hoa_annual: Decimal::ZERO,
            location: Location::default(),
            loan_type: LoanType::default(),
        }
    }

    pub fn with_property_tax(mut self, annual: Decimal) -> Self {
        self.property_tax_annual = annual;
        self
    }

    pub fn with_insurance(mut self, annual: Decimal) -> Self {
        self.home_insurance_annual = annual;
        self
    }

    pub fn with_hoa(mut self, annual: Decimal) -> Self {
        self.hoa_annual = annual;
        self
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.location = location;
        self
    }

    pub fn with_loan_type(mut self, loan_type: LoanType) -> Self {
        self.loan_type = loan_type;
        self
    }

    /// Rejects inputs the formulas cannot give a meaningful answer for.
    pub fn validate(&self) -> Result<()> {
        if self.home_price <= Decimal::ZERO {
            return Err(CalculationError::invalid(
                "home_price",
                "must be greater than zero",
            ));
        }
        if self.down_payment < Decimal::ZERO {
            return Err(CalculationError::invalid(
                "down_payment",
                "cannot be negative",
            ));
        }
        if self.down_payment > self.home_price {
            return Err(CalculationError::invalid(
                "down_payment",
                format!(
                    "{} exceeds the home price of {}",
                    self.down_payment, self.home_price
                ),
            ));
        }
        if self.interest_rate_percent < Decimal::ZERO {
            return Err(CalculationError::invalid(
                "interest_rate_percent",
                "cannot be negative",
            ));
        }
        if self.term_years == 0 {
            return Err(CalculationError::ZeroTerm);
        }

        let annual_costs = [
            ("property_tax_annual", self.property_tax_annual),
            ("home_insurance_annual", self.home_insurance_annual),
            ("hoa_annual", self.hoa_annual),
        ];
        for (field, value) in annual_costs {
            if value < Decimal::ZERO {
                return Err(CalculationError::invalid(field, "cannot be negative"));
            }
        }

        Ok(())
    }

    pub fn loan_amount(&self) -> Decimal {
        self.home_price - self.down_payment
    }

    /// Down payment as a fraction of the home price (0.2 for 20%).
    pub fn down_payment_ratio(&self) -> Decimal {
        if self.home_price.is_zero() {
            return Decimal::ZERO;
        }
        self.down_payment / self.home_price
    }

    /// Loan amount as a fraction of the home price.
    pub fn loan_to_value(&self) -> Decimal {
        if self.home_price.is_zero() {
            return Decimal::ZERO;
        }
        self.loan_amount() / self.home_price
    }
}

/// Turns calculator form text into an amount.
///
/// Currency symbols, thousands separators, percent signs and whitespace are
/// ignored. Text that still isn't a number becomes zero.
pub fn coerce_amount(raw: &str) -> Decimal {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | '%' | '_') && !c.is_whitespace())
        .collect();

    if cleaned.is_empty() {
        return dec!(0);
    }

    match cleaned.parse::<Decimal>() {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("Coercing non-numeric input {:?} to zero: {}", raw, e);
            dec!(0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn sample() -> LoanInputs {
        LoanInputs::new(dec!(750000), dec!(150000), dec!(6.75), 30)
    }

    #[rstest]
    #[case("california", Location::California)]
    #[case("CA", Location::California)]
    #[case("newyork", Location::NewYork)]
    #[case("New York", Location::NewYork)]
    #[case("tx", Location::Texas)]
    #[case("Florida", Location::Florida)]
    #[case("IL", Location::Illinois)]
    #[case("oregon", Location::Other)]
    #[case("", Location::Other)]
    fn test_location_parsing(#[case] raw: &str, #[case] expected: Location) {
        assert_eq!(raw.parse::<Location>().unwrap(), expected);
    }

    #[test]
    fn test_loan_amount_and_ratios() {
        let inputs = sample();
        assert_eq!(inputs.loan_amount(), dec!(600000));
        assert_eq!(inputs.down_payment_ratio(), dec!(0.2));
        assert_eq!(inputs.loan_to_value(), dec!(0.8));
    }

    #[test]
    fn test_validate_accepts_sample() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn test_validate_accepts_full_cash_purchase() {
        let inputs = LoanInputs::new(dec!(300000), dec!(300000), dec!(6), 30);
        assert!(inputs.validate().is_ok());
    }

    #[rstest]
    #[case(LoanInputs::new(dec!(0), dec!(0), dec!(6), 30), "home_price")]
    #[case(LoanInputs::new(dec!(-1), dec!(0), dec!(6), 30), "home_price")]
    #[case(LoanInputs::new(dec!(100), dec!(-5), dec!(6), 30), "down_payment")]
    #[case(LoanInputs::new(dec!(100), dec!(150), dec!(6), 30), "down_payment")]
    #[case(LoanInputs::new(dec!(100), dec!(10), dec!(-1), 30), "interest_rate_percent")]
    #[case(
        LoanInputs::new(dec!(100), dec!(10), dec!(6), 30).with_hoa(dec!(-100)),
        "hoa_annual"
    )]
    fn test_validate_rejects(#[case] inputs: LoanInputs, #[case] expected_field: &str) {
        match inputs.validate() {
            Err(CalculationError::InvalidInput { field, .. }) => assert_eq!(field, expected_field),
            other => panic!("expected invalid {expected_field}, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_rejects_zero_term() {
        let inputs = LoanInputs::new(dec!(100000), dec!(0), dec!(6), 0);
        assert_eq!(inputs.validate(), Err(CalculationError::ZeroTerm));
    }

    #[rstest]
    #[case("750000", dec!(750000))]
    #[case("$750,000", dec!(750000))]
    #[case(" 6.75 % ", dec!(6.75))]
    #[case("", dec!(0))]
    #[case("abc", dec!(0))]
    #[case("12x", dec!(0))]
    fn test_coerce_amount(#[case] raw: &str, #[case] expected: Decimal) {
        assert_eq!(coerce_amount(raw), expected);
    }

    #[test]
    fn test_inputs_deserialize_with_defaults() {
        let json = r#"{
            "home_price": "500000",
            "down_payment": "50000",
            "interest_rate_percent": "7.1",
            "term_years": 15,
            "location": "newyork",
            "loan_type": "fha"
        }"#;
        let inputs: LoanInputs = serde_json::from_str(json).unwrap();
        assert_eq!(inputs.location, Location::NewYork);
        assert_eq!(inputs.loan_type, LoanType::Fha);
        assert_eq!(inputs.hoa_annual, dec!(0));
        assert_eq!(inputs.term_years, 15);
    }
}
