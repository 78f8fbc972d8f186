//! Rate tables and fixed fees used by the payment and closing cost
//! calculations.
//!
//! [`FeeSchedule::default`] carries the figures the calculators ship with. A
//! different schedule can be loaded from JSON without touching the formulas.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::inputs::Location;

/// Private mortgage insurance rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MortgageInsurancePolicy {
    /// Annual premium as a fraction of the loan amount.
    pub annual_rate: Decimal,
    /// Down payment ratio at or above which no insurance is charged.
    pub equity_threshold: Decimal,
}

impl Default for MortgageInsurancePolicy {
    fn default() -> Self {
        Self {
            annual_rate: dec!(0.005),
            equity_threshold: dec!(0.20),
        }
    }
}

/// Lender charges: one rate on the loan amount plus flat fees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LenderFeeRates {
    /// The origination charge as a fraction of the loan amount.
    pub origination_rate: Decimal,
    /// The flat underwriting fee.
    pub underwriting: Decimal,
    /// The flat processing fee.
    pub processing: Decimal,
    /// The flat appraisal fee.
    pub appraisal: Decimal,
    /// The flat credit report fee.
    pub credit_report: Decimal,
    /// The flat flood certification fee.
    pub flood_certification: Decimal,
    /// The flat tax service fee.
    pub tax_service: Decimal,
}

impl Default for LenderFeeRates {
    fn default() -> Self {
        Self {
            origination_rate: dec!(0.005),
            underwriting: dec!(1200),
            processing: dec!(500),
            appraisal: dec!(600),
            credit_report: dec!(50),
            flood_certification: dec!(25),
            tax_service: dec!(85),
        }
    }
}

/// Third-party charges: title insurance on the price plus flat fees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThirdPartyFeeRates {
    /// The title insurance premium as a fraction of the home price.
    pub title_insurance_rate: Decimal,
    /// The flat home inspection fee.
    pub home_inspection: Decimal,
    /// The flat pest inspection fee.
    pub pest_inspection: Decimal,
    /// The flat survey fee.
    pub survey: Decimal,
    /// The flat attorney fee.
    pub attorney: Decimal,
    /// The flat escrow agent fee.
    pub escrow: Decimal,
}

impl Default for ThirdPartyFeeRates {
    fn default() -> Self {
        Self {
            title_insurance_rate: dec!(0.005),
            home_inspection: dec!(500),
            pest_inspection: dec!(150),
            survey: dec!(400),
            attorney: dec!(800),
            escrow: dec!(300),
        }
    }
}

/// Government charges: a flat recording fee and per-location transfer tax.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GovernmentFeeRates {
    /// The flat recording fee.
    pub recording_fee: Decimal,
    /// Transfer tax as a fraction of the home price, per location.
    pub transfer_tax_rates: BTreeMap<Location, Decimal>,
    /// Rate for locations missing from `transfer_tax_rates`.
    pub default_transfer_tax_rate: Decimal,
}

impl GovernmentFeeRates {
    pub fn transfer_tax_rate(&self, location: Location) -> Decimal {
        self.transfer_tax_rates
            .get(&location)
            .copied()
            .unwrap_or(self.default_transfer_tax_rate)
    }
}

impl Default for GovernmentFeeRates {
    fn default() -> Self {
        let transfer_tax_rates = BTreeMap::from([
            (Location::California, dec!(0.0011)),
            (Location::NewYork, dec!(0.004)),
            (Location::Texas, dec!(0)),
            (Location::Florida, dec!(0.007)),
            (Location::Illinois, dec!(0.001)),
        ]);

        Self {
            recording_fee: dec!(250),
            transfer_tax_rates,
            default_transfer_tax_rate: dec!(0.001),
        }
    }
}

/// Items paid in advance at closing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrepaidPolicy {
    /// Days of interest collected between closing and the first payment.
    pub interest_days: u32,
    /// Day count used to turn the annual rate into a daily one.
    pub days_per_year: u32,
    /// The months of property tax paid ahead.
    pub property_tax_months: u32,
    /// The months of insurance paid ahead.
    pub insurance_months: u32,
}

impl Default for PrepaidPolicy {
    fn default() -> Self {
        Self {
            interest_days: 15,
            days_per_year: 365,
            property_tax_months: 6,
            insurance_months: 12,
        }
    }
}

/// Reserves deposited into the lender's escrow account at closing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EscrowPolicy {
    /// The months of property tax held in reserve.
    pub property_tax_months: u32,
    /// The months of insurance held in reserve.
    pub insurance_months: u32,
}

impl Default for EscrowPolicy {
    fn default() -> Self {
        Self {
            property_tax_months: 3,
            insurance_months: 3,
        }
    }
}

/// Every rate and flat fee the engine reads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeeSchedule {
    /// The PMI rate and down payment threshold.
    pub mortgage_insurance: MortgageInsurancePolicy,
    /// The lender's rate and fees.
    pub lender: LenderFeeRates,
    /// The third-party rate and fees.
    pub third_party: ThirdPartyFeeRates,
    /// The recording fee and transfer tax table.
    pub government: GovernmentFeeRates,
    /// The prepaid interest days and prepaid months.
    pub prepaid: PrepaidPolicy,
    /// The escrow reserve months.
    pub escrow: EscrowPolicy,
}

impl FeeSchedule {
    /// Parses a schedule from JSON. Missing sections keep their defaults.
    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json).context("Failed to parse fee schedule JSON")
    }

    pub fn from_path(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read fee schedule {}", path.display()))?;
        let schedule = Self::from_json_str(&content)
            .with_context(|| format!("Invalid fee schedule in {}", path.display()))?;
        tracing::debug!("Loaded fee schedule from {}", path.display());
        Ok(schedule)
    }

    pub fn to_json_pretty(&self) -> anyhow::Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize fee schedule")
    }
}

/// Portion of an annual amount covering the given number of months.
pub(crate) fn months_of(annual: Decimal, months: u32) -> Decimal {
    annual * Decimal::from(months) / dec!(12)
}
