//! Proposal input structures: capital allocation, lending terms and market-rate assumptions
//!
//! Rates and fees are expressed in percent (4.5 means 4.5%). Monetary fields are assumed
//! non-negative; callers validate raw user input before it reaches the engine.

use serde::{Deserialize, Serialize};

use crate::projection::level_monthly_payment;
use crate::rates::RateQuote;

/// Which reference rate the bank loan floats over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterestBasis {
    /// HIBOR-style interbank reference rate
    #[default]
    Hibor,
    /// Bank's cost of funds
    CostOfFunds,
}

/// Terms of a mortgage refinance used to unlock the client's capital
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MortgageTerms {
    /// Cash released by the refinance (mortgage principal)
    pub unlocked_cash: f64,

    /// Effective annual mortgage rate (%)
    pub mortgage_rate: f64,

    /// Monthly level payment quoted to the client
    pub monthly_payment: f64,

    /// Mortgage tenor in years
    pub tenor_years: u32,
}

impl MortgageTerms {
    /// Create terms with the monthly payment filled from the level-payment formula
    pub fn new(unlocked_cash: f64, mortgage_rate: f64, tenor_years: u32) -> Self {
        Self {
            unlocked_cash,
            mortgage_rate,
            monthly_payment: level_monthly_payment(unlocked_cash, mortgage_rate, tenor_years),
            tenor_years,
        }
    }
}

/// Where the client's capital comes from
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FundingSource {
    /// Client funds the proposal from cash on hand
    #[default]
    Cash,
    /// Client refinances property to unlock the budget
    Mortgage(MortgageTerms),
}

/// One premium-financing proposal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationInput {
    /// Total client capital committed to the proposal
    pub total_budget: f64,

    /// Portion held back as cash
    pub cash_reserve: f64,

    /// Portion placed in the bond fund
    pub bond_allocation: f64,

    /// Bond fund yield (% p.a., simple)
    pub bond_yield: f64,

    /// HIBOR-style reference rate (%)
    pub hibor_rate: f64,

    /// Bank cost-of-funds rate (%)
    pub cost_of_funds_rate: f64,

    /// Which reference rate the loan uses
    #[serde(default)]
    pub interest_basis: InterestBasis,

    /// Lending spread over the reference rate (%)
    pub spread: f64,

    /// Contractual interest-rate ceiling (%)
    pub cap_rate: f64,

    /// One-off bond fund handling fee (%)
    pub handling_fee: f64,

    /// Loan-to-value the bank advances against day-1 cash value (%)
    pub leverage_ltv: f64,

    #[serde(default)]
    pub funding_source: FundingSource,
}

impl Default for SimulationInput {
    fn default() -> Self {
        Self {
            total_budget: 1_000_000.0,
            cash_reserve: 200_000.0,
            bond_allocation: 300_000.0,
            bond_yield: 4.5,
            hibor_rate: 4.15,
            cost_of_funds_rate: 4.80,
            interest_basis: InterestBasis::Hibor,
            spread: 1.30,
            cap_rate: 9.00,
            handling_fee: 1.0,
            leverage_ltv: 90.0,
            funding_source: FundingSource::Cash,
        }
    }
}

impl SimulationInput {
    /// Reference rate selected by the interest basis
    pub fn base_rate(&self) -> f64 {
        match self.interest_basis {
            InterestBasis::Hibor => self.hibor_rate,
            InterestBasis::CostOfFunds => self.cost_of_funds_rate,
        }
    }

    /// Lending rate: reference rate plus spread, capped
    pub fn effective_rate(&self) -> f64 {
        capped_rate(self.base_rate(), self.spread, self.cap_rate)
    }

    /// Capital left for the policy after the cash and bond sleeves (may be negative)
    pub fn policy_equity(&self) -> f64 {
        self.total_budget - self.cash_reserve - self.bond_allocation
    }

    /// Handling fee deducted once from the bond sleeve
    pub fn one_off_bond_fee(&self) -> f64 {
        self.bond_allocation * self.handling_fee / 100.0
    }

    /// Bond principal after the handling fee
    pub fn net_bond_principal(&self) -> f64 {
        self.bond_allocation - self.one_off_bond_fee()
    }

    pub fn mortgage(&self) -> Option<&MortgageTerms> {
        match &self.funding_source {
            FundingSource::Cash => None,
            FundingSource::Mortgage(terms) => Some(terms),
        }
    }

    pub fn is_mortgage_funded(&self) -> bool {
        self.mortgage().is_some()
    }

    /// Substitute a rate feed quote as the HIBOR reference rate
    pub fn with_hibor_quote(mut self, quote: &RateQuote) -> Self {
        self.hibor_rate = quote.rate;
        self
    }
}

/// `min(base + spread, cap)`
pub fn capped_rate(base_rate: f64, spread: f64, cap_rate: f64) -> f64 {
    (base_rate + spread).min(cap_rate)
}
