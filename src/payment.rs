use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{CalculationError, Result};
use crate::fees::{FeeSchedule, MortgageInsurancePolicy};
use crate::inputs::LoanInputs;
use crate::rates::RateTerm;

/// Monthly payment breakdown and lifetime totals for a loan.
///
/// Values are unrounded; round for display only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentResult {
    /// The amount borrowed: home price less down payment.
    pub loan_amount: Decimal,
    /// The monthly interest rate as a decimal.
    pub monthly_rate: Decimal,
    /// The total number of monthly payments.
    pub num_payments: u32,
    /// Fixed principal and interest payment.
    pub monthly_principal_and_interest: Decimal,
    /// The annual property tax spread over twelve months.
    pub monthly_property_tax: Decimal,
    /// The annual homeowner's insurance spread over twelve months.
    pub monthly_insurance: Decimal,
    /// The private mortgage insurance premium, zero at 20% down or more.
    pub monthly_pmi: Decimal,
    /// The annual HOA dues spread over twelve months.
    pub monthly_hoa: Decimal,
    /// Principal, interest, taxes, insurance, PMI and HOA.
    pub total_monthly_payment: Decimal,
    /// The interest paid over the full term.
    pub total_interest_over_term: Decimal,
    /// Principal plus all interest over the term.
    pub total_payment: Decimal,
}

/// Fixed monthly payment for a fully amortizing loan.
///
/// The formula is: PMT = P * [r(1 + r)^n] / [(1 + r)^n – 1]. A zero rate
/// reduces to P / n.
///
/// # Errors
///
/// Returns an error if `num_payments` is zero or `(1 + r)^n` overflows.
pub fn monthly_principal_and_interest(
    principal: Decimal,
    monthly_rate: Decimal,
    num_payments: u32,
) -> Result<Decimal> {
    if num_payments == 0 {
        return Err(CalculationError::ZeroTerm);
    }

    if monthly_rate.is_zero() {
        return Ok(principal / Decimal::from(num_payments));
    }

    let growth = (dec!(1) + monthly_rate)
        .checked_powu(num_payments.into())
        .ok_or(CalculationError::Overflow {
            stage: "compound growth factor",
        })?;

    let numerator = monthly_rate
        .checked_mul(growth)
        .and_then(|rate_growth| principal.checked_mul(rate_growth))
        .ok_or(CalculationError::Overflow {
            stage: "monthly payment",
        })?;

    numerator
        .checked_div(growth - dec!(1))
        .ok_or(CalculationError::Overflow {
            stage: "monthly payment",
        })
}

/// Monthly mortgage insurance. Charged only while the down payment is below
/// the policy threshold, at the same flat rate for every loan type.
pub fn monthly_pmi(inputs: &LoanInputs, policy: &MortgageInsurancePolicy) -> Decimal {
    if inputs.down_payment_ratio() < policy.equity_threshold {
        inputs.loan_amount() * policy.annual_rate / dec!(12)
    } else {
        Decimal::ZERO
    }
}

/// Computes the monthly payment using the default fee schedule.
pub fn compute_mortgage_payment(inputs: &LoanInputs) -> Result<PaymentResult> {
    compute_mortgage_payment_with(inputs, &FeeSchedule::default())
}

/// Computes the full monthly payment (PITI plus PMI and HOA dues) and the
/// lifetime totals of the loan.
///
/// # Errors
///
/// Returns an error if the inputs fail validation or the payment overflows.
pub fn compute_mortgage_payment_with(
    inputs: &LoanInputs,
    schedule: &FeeSchedule,
) -> Result<PaymentResult> {
    inputs.validate()?;

    let rate_term = RateTerm::from_inputs(inputs)?;
    let loan_amount = inputs.loan_amount();

    let monthly_pi = monthly_principal_and_interest(
        loan_amount,
        rate_term.monthly_rate,
        rate_term.num_payments,
    )?;

    let monthly_property_tax = inputs.property_tax_annual / dec!(12);
    let monthly_insurance = inputs.home_insurance_annual / dec!(12);
    let monthly_hoa = inputs.hoa_annual / dec!(12);
    let monthly_pmi = monthly_pmi(inputs, &schedule.mortgage_insurance);

    let total_monthly_payment = [monthly_property_tax, monthly_insurance, monthly_pmi, monthly_hoa]
        .into_iter()
        .try_fold(monthly_pi, |sum, part| sum.checked_add(part))
        .ok_or(CalculationError::Overflow {
            stage: "total monthly payment",
        })?;

    let total_interest_over_term = monthly_pi
        .checked_mul(Decimal::from(rate_term.num_payments))
        .and_then(|paid| paid.checked_sub(loan_amount))
        .ok_or(CalculationError::Overflow {
            stage: "total interest",
        })?;
    let total_payment = loan_amount
        .checked_add(total_interest_over_term)
        .ok_or(CalculationError::Overflow {
            stage: "total payment",
        })?;

    tracing::debug!(
        "Mortgage payment: loan={} rate={}% term={}y -> P&I={:.2} total={:.2}",
        loan_amount,
        inputs.interest_rate_percent,
        inputs.term_years,
        monthly_pi,
        total_monthly_payment
    );

    Ok(PaymentResult {
        loan_amount,
        monthly_rate: rate_term.monthly_rate,
        num_payments: rate_term.num_payments,
        monthly_principal_and_interest: monthly_pi,
        monthly_property_tax,
        monthly_insurance,
        monthly_pmi,
        monthly_hoa,
        total_monthly_payment,
        total_interest_over_term,
        total_payment,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inputs::LoanType;
    use rstest::rstest;

    fn close(a: Decimal, b: Decimal, tolerance: Decimal) -> bool {
        (a - b).abs() <= tolerance
    }

    #[test]
    fn test_compute_mortgage_payment_happy_path() {
        let inputs = LoanInputs::new(dec!(750000), dec!(150000), dec!(6.75), 30)
            .with_property_tax(dec!(9000))
            .with_insurance(dec!(1800))
            .with_hoa(dec!(1200));

        let result = compute_mortgage_payment(&inputs).unwrap();

        assert_eq!(result.loan_amount, dec!(600000));
        assert_eq!(result.monthly_rate, dec!(0.005625));
        assert_eq!(result.num_payments, 360);
        assert_eq!(result.monthly_principal_and_interest.round_dp(2), dec!(3891.59));
        assert_eq!(result.monthly_property_tax, dec!(750));
        assert_eq!(result.monthly_insurance, dec!(150));
        assert_eq!(result.monthly_hoa, dec!(100));
        assert_eq!(result.monthly_pmi, dec!(0));
        assert_eq!(result.total_monthly_payment.round_dp(2), dec!(4891.59));
        assert_eq!(result.total_interest_over_term.round_dp(2), dec!(800971.89));
    }

    #[test]
    fn test_totals_are_consistent() {
        let inputs = LoanInputs::new(dec!(412000), dec!(20000), dec!(5.125), 20);
        let result = compute_mortgage_payment(&inputs).unwrap();
        let n = Decimal::from(result.num_payments);

        assert!(close(
            result.monthly_principal_and_interest * n - result.loan_amount,
            result.total_interest_over_term,
            dec!(0.0000001),
        ));
        assert!(close(
            result.loan_amount + result.total_interest_over_term,
            result.total_payment,
            dec!(0.0000001),
        ));
    }

    #[test]
    fn test_payment_matches_float_formula() {
        let p = 600000.0_f64;
        let r = 0.0675_f64 / 12.0;
        let n = 360;
        let growth = (1.0 + r).powi(n);
        let expected = p * (r * growth) / (growth - 1.0);

        let actual = monthly_principal_and_interest(dec!(600000), dec!(0.005625), 360).unwrap();
        let actual: f64 = actual.to_string().parse().unwrap();
        assert!((actual - expected).abs() < 1e-6);
    }

    #[test]
    fn test_zero_rate_is_straight_line() {
        let payment = monthly_principal_and_interest(dec!(360000), dec!(0), 360).unwrap();
        assert_eq!(payment, dec!(1000));

        let inputs = LoanInputs::new(dec!(400000), dec!(40000), dec!(0), 30);
        let result = compute_mortgage_payment(&inputs).unwrap();
        assert_eq!(result.monthly_principal_and_interest, dec!(360000) / dec!(360));
        assert_eq!(result.total_interest_over_term, dec!(0));
    }

    #[test]
    fn test_zero_payments_error() {
        let result = monthly_principal_and_interest(dec!(100000), dec!(0.01), 0);
        assert_eq!(result, Err(CalculationError::ZeroTerm));
    }

    #[test]
    fn test_growth_times_rate_overflow_is_an_error() {
        // 2400% a year is 2 per month; 3^60 fits but 2 * 3^60 does not.
        let inputs = LoanInputs::new(dec!(100000), dec!(0), dec!(2400), 5);
        assert!(matches!(
            compute_mortgage_payment(&inputs),
            Err(CalculationError::Overflow { .. })
        ));
    }

    #[test]
    fn test_lifetime_total_overflow_is_an_error() {
        let inputs = LoanInputs::new(dec!(78000000000000000000000000000), dec!(0), dec!(1), 30);
        assert!(matches!(
            compute_mortgage_payment(&inputs),
            Err(CalculationError::Overflow { .. })
        ));
    }

    #[test]
    fn test_idempotent() {
        let inputs = LoanInputs::new(dec!(525000), dec!(52500), dec!(7.25), 30)
            .with_property_tax(dec!(6300));
        let first = compute_mortgage_payment(&inputs).unwrap();
        let second = compute_mortgage_payment(&inputs).unwrap();
        assert_eq!(first, second);
    }

    #[rstest]
    #[case(dec!(150000), false)]
    #[case(dec!(200000), false)]
    #[case(dec!(149999), true)]
    #[case(dec!(100000), true)]
    #[case(dec!(0), true)]
    fn test_pmi_threshold(#[case] down_payment: Decimal, #[case] charged: bool) {
        let inputs = LoanInputs::new(dec!(750000), down_payment, dec!(6.75), 30);
        let result = compute_mortgage_payment(&inputs).unwrap();
        assert_eq!(result.monthly_pmi > dec!(0), charged);
    }

    #[test]
    fn test_pmi_amount() {
        let inputs = LoanInputs::new(dec!(750000), dec!(100000), dec!(6.75), 30);
        let pmi = monthly_pmi(&inputs, &MortgageInsurancePolicy::default());
        assert_eq!(pmi, dec!(650000) * dec!(0.005) / dec!(12));
    }

    #[rstest]
    #[case(LoanType::Conventional)]
    #[case(LoanType::Fha)]
    #[case(LoanType::Va)]
    #[case(LoanType::Usda)]
    #[case(LoanType::Jumbo)]
    fn test_pmi_ignores_loan_type(#[case] loan_type: LoanType) {
        let base = LoanInputs::new(dec!(300000), dec!(15000), dec!(6), 30);
        let typed = base.clone().with_loan_type(loan_type);
        let policy = MortgageInsurancePolicy::default();
        assert_eq!(monthly_pmi(&typed, &policy), monthly_pmi(&base, &policy));
    }

    #[test]
    fn test_custom_insurance_policy() {
        let mut schedule = FeeSchedule::default();
        schedule.mortgage_insurance.annual_rate = dec!(0.012);
        let inputs = LoanInputs::new(dec!(100000), dec!(10000), dec!(6), 30);

        let result = compute_mortgage_payment_with(&inputs, &schedule).unwrap();
        assert_eq!(result.monthly_pmi, dec!(90));
    }

    #[test]
    fn test_invalid_inputs_are_rejected() {
        let inputs = LoanInputs::new(dec!(100000), dec!(200000), dec!(6), 30);
        assert!(matches!(
            compute_mortgage_payment(&inputs),
            Err(CalculationError::InvalidInput { field: "down_payment", .. })
        ));
    }
}
