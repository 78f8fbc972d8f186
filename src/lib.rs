//! `us_mortgage_calc` is a Rust library for the numbers behind a US home purchase.
//!
//! It covers the three calculators a buyer works through:
//! - **Monthly payment**: principal and interest from the standard amortizing-loan
//!   formula, plus property tax, insurance, HOA dues and private mortgage
//!   insurance (PMI) when the down payment is under 20%.
//! - **Closing costs**: lender, third-party and government fees, prepaid items
//!   and the initial escrow deposit, line by line.
//! - **Amortization**: a lazy, restartable month-by-month split of each payment
//!   into principal and interest.
//!
//! Every calculation is a pure function of [`LoanInputs`] and recomputes from
//! scratch. Results are unrounded [`rust_decimal::Decimal`] values; round them
//! when displaying.
//!
//! ## Usage
//!
//! ```rust
//! use us_mortgage_calc::{
//!     compute_closing_costs, compute_mortgage_payment, generate_amortization_schedule,
//!     LoanInputs, Location,
//! };
//! use rust_decimal_macros::dec;
//!
//! fn main() -> Result<(), us_mortgage_calc::CalculationError> {
//!     let inputs = LoanInputs::new(dec!(750_000), dec!(150_000), dec!(6.75), 30)
//!         .with_property_tax(dec!(9_000))
//!         .with_insurance(dec!(1_800))
//!         .with_location(Location::California);
//!
//!     let payment = compute_mortgage_payment(&inputs)?;
//!     println!("Principal & interest: {:.2}", payment.monthly_principal_and_interest);
//!     println!("Total monthly:        {:.2}", payment.total_monthly_payment);
//!
//!     let costs = compute_closing_costs(&inputs)?;
//!     println!("Closing costs:        {:.2}", costs.total);
//!
//!     for row in &generate_amortization_schedule(&inputs, 12)? {
//!         println!("{:>3} {:>10.2} {:>10.2}", row.period_index, row.principal_portion, row.remaining_balance);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! Rates and fixed fees live in [`FeeSchedule`]; pass a custom one to the
//! `*_with` variants to price a different market.

pub mod amortization;
pub mod closing_costs;
pub mod error;
pub mod fees;
pub mod inputs;
pub mod payment;
pub mod rates;

pub use amortization::{
    AmortizationIter, AmortizationRow, AmortizationSchedule, DEFAULT_SCHEDULE_HORIZON,
    ScheduleSummary, full_schedule, generate_amortization_schedule,
};
pub use closing_costs::{
    ClosingCostBreakdown, EscrowAccount, GovernmentFees, LenderFees, PrepaidExpenses,
    ThirdPartyFees, compute_closing_costs, compute_closing_costs_with,
};
pub use error::{CalculationError, Result};
pub use fees::{
    EscrowPolicy, FeeSchedule, GovernmentFeeRates, LenderFeeRates, MortgageInsurancePolicy,
    PrepaidPolicy, ThirdPartyFeeRates,
};
pub use inputs::{LoanInputs, LoanType, Location, coerce_amount};
pub use payment::{
    PaymentResult, compute_mortgage_payment, compute_mortgage_payment_with,
    monthly_principal_and_interest, monthly_pmi,
};
pub use rates::{RateTerm, daily_rate, normalize_annual_interest_rate};
