//! One-time costs due at settlement, grouped the way the closing cost
//! breakdown presents them.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::fees::{FeeSchedule, months_of};
use crate::inputs::LoanInputs;
use crate::rates::daily_rate;

/// Fees charged by the lender for making the loan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LenderFees {
    /// The origination charge, a fraction of the loan amount.
    pub origination_fee: Decimal,
    /// The flat fee for underwriting the loan.
    pub underwriting_fee: Decimal,
    /// The flat fee for processing the application.
    pub processing_fee: Decimal,
    /// The cost of the property appraisal.
    pub appraisal_fee: Decimal,
    /// The cost of pulling the borrower's credit report.
    pub credit_report_fee: Decimal,
    /// The cost of the flood zone determination.
    pub flood_certification: Decimal,
    /// The fee for tracking property tax payments.
    pub tax_service: Decimal,
}

impl LenderFees {
    pub fn total(&self) -> Decimal {
        self.origination_fee
            + self.underwriting_fee
            + self.processing_fee
            + self.appraisal_fee
            + self.credit_report_fee
            + self.flood_certification
            + self.tax_service
    }
}

/// Services bought from parties other than the lender.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThirdPartyFees {
    /// The title insurance premium, a fraction of the home price.
    pub title_insurance: Decimal,
    /// The cost of the home inspection.
    pub home_inspection: Decimal,
    /// The cost of the pest inspection.
    pub pest_inspection: Decimal,
    /// The cost of the property survey.
    pub survey_fee: Decimal,
    /// The closing attorney's fee.
    pub attorney_fees: Decimal,
    /// The escrow or settlement agent's fee.
    pub escrow_fee: Decimal,
}

impl ThirdPartyFees {
    pub fn total(&self) -> Decimal {
        self.title_insurance
            + self.home_inspection
            + self.pest_inspection
            + self.survey_fee
            + self.attorney_fees
            + self.escrow_fee
    }
}

/// Charges levied by state and local government.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GovernmentFees {
    /// The fee for recording the deed and mortgage.
    pub recording_fee: Decimal,
    /// The transfer tax, the home price times the location's rate.
    pub transfer_tax: Decimal,
}

impl GovernmentFees {
    pub fn total(&self) -> Decimal {
        self.recording_fee + self.transfer_tax
    }
}

/// Costs paid in advance at closing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrepaidExpenses {
    /// The interest accrued between closing and the first payment.
    pub prepaid_interest: Decimal,
    /// The property tax paid ahead, six months by default.
    pub prepaid_property_tax: Decimal,
    /// The first year of homeowner's insurance.
    pub prepaid_insurance: Decimal,
}

impl PrepaidExpenses {
    pub fn total(&self) -> Decimal {
        self.prepaid_interest + self.prepaid_property_tax + self.prepaid_insurance
    }
}

/// The initial deposit into the lender's escrow account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EscrowAccount {
    /// The property tax reserve, three months by default.
    pub escrow_property_tax: Decimal,
    /// The insurance reserve, three months by default.
    pub escrow_insurance: Decimal,
}

impl EscrowAccount {
    pub fn total(&self) -> Decimal {
        self.escrow_property_tax + self.escrow_insurance
    }
}

/// Closing costs line by line, with the grand total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClosingCostBreakdown {
    /// The lender's charges.
    pub lender_fees: LenderFees,
    /// The third-party service charges.
    pub third_party_fees: ThirdPartyFees,
    /// The recording fee and transfer tax.
    pub government_fees: GovernmentFees,
    /// The items paid in advance.
    pub prepaid_expenses: PrepaidExpenses,
    /// The escrow reserves.
    pub escrow_account: EscrowAccount,
    /// Sum of every group total.
    pub total: Decimal,
}

impl ClosingCostBreakdown {
    /// Down payment plus closing costs: what the buyer brings to settlement.
    pub fn cash_to_close(&self, inputs: &LoanInputs) -> Decimal {
        inputs.down_payment + self.total
    }

    /// Closing costs as a percentage of the home price.
    pub fn percent_of_price(&self, inputs: &LoanInputs) -> Decimal {
        if inputs.home_price.is_zero() {
            return Decimal::ZERO;
        }
        self.total / inputs.home_price * dec!(100)
    }
}

pub fn compute_closing_costs(inputs: &LoanInputs) -> Result<ClosingCostBreakdown> {
    compute_closing_costs_with(inputs, &FeeSchedule::default())
}

/// Computes each closing cost line from the inputs and the given fee schedule.
///
/// # Errors
///
/// Returns an error if the inputs fail validation.
pub fn compute_closing_costs_with(
    inputs: &LoanInputs,
    schedule: &FeeSchedule,
) -> Result<ClosingCostBreakdown> {
    inputs.validate()?;

    let loan_amount = inputs.loan_amount();
    let lender = &schedule.lender;
    let third_party = &schedule.third_party;
    let government = &schedule.government;
    let prepaid = &schedule.prepaid;
    let escrow = &schedule.escrow;

    let lender_fees = LenderFees {
        origination_fee: loan_amount * lender.origination_rate,
        underwriting_fee: lender.underwriting,
        processing_fee: lender.processing,
        appraisal_fee: lender.appraisal,
        credit_report_fee: lender.credit_report,
        flood_certification: lender.flood_certification,
        tax_service: lender.tax_service,
    };

    let third_party_fees = ThirdPartyFees {
        title_insurance: inputs.home_price * third_party.title_insurance_rate,
        home_inspection: third_party.home_inspection,
        pest_inspection: third_party.pest_inspection,
        survey_fee: third_party.survey,
        attorney_fees: third_party.attorney,
        escrow_fee: third_party.escrow,
    };

    let government_fees = GovernmentFees {
        recording_fee: government.recording_fee,
        transfer_tax: inputs.home_price * government.transfer_tax_rate(inputs.location),
    };

    let per_diem = daily_rate(inputs.interest_rate_percent, prepaid.days_per_year);
    let prepaid_expenses = PrepaidExpenses {
        prepaid_interest: loan_amount * per_diem * Decimal::from(prepaid.interest_days),
        prepaid_property_tax: months_of(inputs.property_tax_annual, prepaid.property_tax_months),
        prepaid_insurance: months_of(inputs.home_insurance_annual, prepaid.insurance_months),
    };

    let escrow_account = EscrowAccount {
        escrow_property_tax: months_of(inputs.property_tax_annual, escrow.property_tax_months),
        escrow_insurance: months_of(inputs.home_insurance_annual, escrow.insurance_months),
    };

    let total = lender_fees.total()
        + third_party_fees.total()
        + government_fees.total()
        + prepaid_expenses.total()
        + escrow_account.total();

    tracing::debug!(
        "Closing costs: price={} loan={} location={} -> total={:.2}",
        inputs.home_price,
        loan_amount,
        inputs.location,
        total
    );

    Ok(ClosingCostBreakdown {
        lender_fees,
        third_party_fees,
        government_fees,
        prepaid_expenses,
        escrow_account,
        total,
    })
}
