//! Ledger output structures for the baseline projection

use serde::{Deserialize, Serialize};

/// A single row of the projection ledger for one policy year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionRow {
    pub year: u32,

    // Assets
    pub surrender_value: f64,
    pub net_bond_principal: f64,
    pub cumulative_bond_interest: f64,
    pub bond_fund_value: f64,
    pub cash_value: f64,
    pub total_assets: f64,

    // Liabilities
    pub loan: f64,
    pub cumulative_loan_interest: f64,
    pub mortgage_balance: f64,
    pub net_equity: f64,

    // Annual movements (this year's cumulative minus last year's)
    pub annual_bond_income: f64,
    pub annual_loan_interest: f64,
    pub annual_policy_growth: f64,
    pub annual_mortgage_payment: f64,
    pub annual_net_gain: f64,
    /// Annual net gain over capital employed (%)
    pub annual_return_on_capital: f64,

    // Running totals
    pub cumulative_policy_growth: f64,
    pub cumulative_net_gain: f64,
    pub cumulative_mortgage_interest: f64,
    pub cumulative_mortgage_payments: f64,

    // Display
    pub formatted_net_equity: String,
    pub formatted_loan: String,
}

impl ProjectionRow {
    /// Create a row with all amounts zeroed
    pub fn new(year: u32) -> Self {
        Self {
            year,
            surrender_value: 0.0,
            net_bond_principal: 0.0,
            cumulative_bond_interest: 0.0,
            bond_fund_value: 0.0,
            cash_value: 0.0,
            total_assets: 0.0,
            loan: 0.0,
            cumulative_loan_interest: 0.0,
            mortgage_balance: 0.0,
            net_equity: 0.0,
            annual_bond_income: 0.0,
            annual_loan_interest: 0.0,
            annual_policy_growth: 0.0,
            annual_mortgage_payment: 0.0,
            annual_net_gain: 0.0,
            annual_return_on_capital: 0.0,
            cumulative_policy_growth: 0.0,
            cumulative_net_gain: 0.0,
            cumulative_mortgage_interest: 0.0,
            cumulative_mortgage_payments: 0.0,
            formatted_net_equity: String::new(),
            formatted_loan: String::new(),
        }
    }
}

/// Summary figures for a projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionSummary {
    /// Net equity at the end of the horizon
    pub final_net_equity: f64,
    /// Cumulative net gain at the horizon over budget (%); non-finite when budget is 0
    pub roi: f64,
    pub monthly_bond_income: f64,
    pub monthly_loan_interest: f64,
    pub monthly_mortgage_payment: f64,
    pub monthly_net_cashflow: f64,
    pub one_off_bond_fee: f64,
    pub net_bond_principal: f64,
}

/// Complete baseline projection result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationOutput {
    // Day-1 structure
    pub policy_equity: f64,
    pub total_premium: f64,
    pub bank_loan: f64,
    /// Capped lending rate (%)
    pub effective_rate: f64,

    /// Ledger rows for years 0..=30
    pub rows: Vec<ProjectionRow>,

    pub summary: ProjectionSummary,
}

impl SimulationOutput {
    /// Row for a policy year (years beyond the horizon return the last row)
    pub fn row(&self, year: u32) -> Option<&ProjectionRow> {
        self.rows.get(year as usize).or_else(|| self.rows.last())
    }

    /// Lowest net equity reached across the horizon
    pub fn lowest_net_equity(&self) -> f64 {
        self.rows
            .iter()
            .map(|r| r.net_equity)
            .fold(f64::INFINITY, f64::min)
    }
}
