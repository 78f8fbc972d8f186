//! Month-by-month split of each payment into principal and interest.
//!
//! A schedule is a description of the loan plus a horizon; rows are produced
//! lazily by [`AmortizationSchedule::iter`], which starts over from the
//! original balance on every call.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{CalculationError, Result};
use crate::inputs::LoanInputs;
use crate::payment::monthly_principal_and_interest;
use crate::rates::RateTerm;

/// Number of rows the calculator shows: the first year of payments.
pub const DEFAULT_SCHEDULE_HORIZON: u32 = 12;

/// One line of the schedule: how a single monthly payment splits between
/// principal and interest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationRow {
    /// The payment number, starting at 1 for the first monthly payment.
    pub period_index: u32,
    /// The fixed principal and interest payment.
    pub payment: Decimal,
    /// The part of this payment that pays down the loan balance.
    pub principal_portion: Decimal,
    /// The part of this payment charged as interest on the balance.
    pub interest_portion: Decimal,
    /// The loan balance still owed once this payment is made, floored at zero.
    pub remaining_balance: Decimal,
}

/// Totals over the rows of a schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    /// The number of payments covered.
    pub periods: u32,
    /// The sum of all payments made.
    pub total_paid: Decimal,
    /// The principal repaid across those payments.
    pub total_principal: Decimal,
    /// The interest paid across those payments.
    pub total_interest: Decimal,
    /// The balance left after the last covered payment.
    pub ending_balance: Decimal,
}

/// A loan and how many of its payments to lay out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    /// The amount borrowed.
    pub loan_amount: Decimal,
    /// The monthly interest rate as a decimal.
    pub monthly_rate: Decimal,
    /// The fixed principal and interest payment.
    pub monthly_payment: Decimal,
    /// The number of rows the schedule yields at most.
    pub horizon: u32,
}

impl AmortizationSchedule {
    pub fn iter(&self) -> AmortizationIter {
        AmortizationIter {
            monthly_rate: self.monthly_rate,
            monthly_payment: self.monthly_payment,
            horizon: self.horizon,
            balance: self.loan_amount,
            period: 0,
        }
    }

    pub fn rows(&self) -> Vec<AmortizationRow> {
        self.iter().collect()
    }

    pub fn summary(&self) -> ScheduleSummary {
        let mut summary = ScheduleSummary {
            periods: 0,
            total_paid: Decimal::ZERO,
            total_principal: Decimal::ZERO,
            total_interest: Decimal::ZERO,
            ending_balance: self.loan_amount,
        };

        for row in self.iter() {
            summary.periods = row.period_index;
            summary.total_paid += row.payment;
            summary.total_principal += row.principal_portion;
            summary.total_interest += row.interest_portion;
            summary.ending_balance = row.remaining_balance;
        }

        summary
    }
}

impl<'a> IntoIterator for &'a AmortizationSchedule {
    type Item = AmortizationRow;
    type IntoIter = AmortizationIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Lazy row generator. Stops at the horizon or once the loan is paid off.
#[derive(Debug, Clone)]
pub struct AmortizationIter {
    monthly_rate: Decimal,
    monthly_payment: Decimal,
    horizon: u32,
    balance: Decimal,
    period: u32,
}

impl Iterator for AmortizationIter {
    type Item = AmortizationRow;

    fn next(&mut self) -> Option<Self::Item> {
        if self.period >= self.horizon || self.balance <= Decimal::ZERO {
            return None;
        }

        // The balance never exceeds the loan amount, which was checked against
        // the rate when the schedule was built.
        let interest_portion = self.balance.checked_mul(self.monthly_rate)?;
        let principal_portion = self.monthly_payment - interest_portion;
        self.balance -= principal_portion;
        self.period += 1;

        Some(AmortizationRow {
            period_index: self.period,
            payment: self.monthly_payment,
            principal_portion,
            interest_portion,
            remaining_balance: self.balance.max(Decimal::ZERO),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.horizon.saturating_sub(self.period) as usize;
        if self.balance <= Decimal::ZERO {
            (0, Some(0))
        } else {
            (0, Some(remaining))
        }
    }
}

/// Builds the schedule for the first `horizon_periods` payments.
///
/// A horizon longer than the loan term is clamped to the term.
///
/// # Errors
///
/// Returns an error if the inputs fail validation or the payment overflows.
pub fn generate_amortization_schedule(
    inputs: &LoanInputs,
    horizon_periods: u32,
) -> Result<AmortizationSchedule> {
    inputs.validate()?;

    let rate_term = RateTerm::from_inputs(inputs)?;
    let loan_amount = inputs.loan_amount();
    let monthly_payment = monthly_principal_and_interest(
        loan_amount,
        rate_term.monthly_rate,
        rate_term.num_payments,
    )?;

    loan_amount
        .checked_mul(rate_term.monthly_rate)
        .ok_or(CalculationError::Overflow {
            stage: "first month interest",
        })?;

    let horizon = if horizon_periods > rate_term.num_payments {
        tracing::warn!(
            "Schedule horizon {} exceeds loan term of {} payments, clamping",
            horizon_periods,
            rate_term.num_payments
        );
        rate_term.num_payments
    } else {
        horizon_periods
    };

    tracing::debug!(
        "Amortization schedule: loan={} payment={:.2} horizon={}",
        loan_amount,
        monthly_payment,
        horizon
    );

    Ok(AmortizationSchedule {
        loan_amount,
        monthly_rate: rate_term.monthly_rate,
        monthly_payment,
        horizon,
    })
}

/// Schedule covering every payment of the loan.
pub fn full_schedule(inputs: &LoanInputs) -> Result<AmortizationSchedule> {
    let num_payments = RateTerm::from_inputs(inputs)?.num_payments;
    generate_amortization_schedule(inputs, num_payments)
}
