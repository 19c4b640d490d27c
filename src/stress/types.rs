//! Input and output structures for stress testing

use serde::{Deserialize, Serialize};

use crate::factors::FactorCurve;
use crate::projection::SimulationOutput;
use crate::proposal::SimulationInput;
use super::sensitivity::{SensitivityConfig, SensitivityGrid};

/// Shocks applied on top of a baseline projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StressScenario {
    /// Reference rate the bank loan is re-priced at (%)
    pub simulated_hibor: f64,

    /// Haircut on the net bond principal (%)
    pub bond_price_drop: f64,

    /// Cash value curve; `Guaranteed` models worst-case policy performance
    #[serde(default)]
    pub factor_curve: FactorCurve,

    #[serde(default)]
    pub sensitivity: SensitivityConfig,
}

impl Default for StressScenario {
    fn default() -> Self {
        Self {
            simulated_hibor: 6.0,
            bond_price_drop: 10.0,
            factor_curve: FactorCurve::Total,
            sensitivity: SensitivityConfig::default(),
        }
    }
}

/// Baseline figures the stress test holds fixed
///
/// The mortgage schedule is taken from the baseline as-is; stressing the loan rate
/// does not re-amortize the mortgage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineReference {
    pub total_premium: f64,
    pub bank_loan: f64,
    pub net_bond_principal: f64,

    /// Year-1 policy growth on the total curve
    pub policy_growth_year1: f64,

    /// Year-1 mortgage payments (0 when cash-funded)
    pub mortgage_payment_year1: f64,

    /// Mortgage balance by year 0..=30
    pub mortgage_balances: Vec<f64>,

    /// Baseline net equity by year 0..=30
    pub net_equity: Vec<f64>,
}

impl BaselineReference {
    /// Mortgage balance at a year (years past the schedule read its last entry)
    pub fn mortgage_balance(&self, year: u32) -> f64 {
        lookup(&self.mortgage_balances, year)
    }

    pub fn net_equity_at(&self, year: u32) -> f64 {
        lookup(&self.net_equity, year)
    }
}

fn lookup(series: &[f64], year: u32) -> f64 {
    series
        .get(year as usize)
        .or_else(|| series.last())
        .copied()
        .unwrap_or(0.0)
}

impl From<&SimulationOutput> for BaselineReference {
    fn from(output: &SimulationOutput) -> Self {
        let year1 = output.rows.get(1);
        Self {
            total_premium: output.total_premium,
            bank_loan: output.bank_loan,
            net_bond_principal: output.summary.net_bond_principal,
            policy_growth_year1: year1.map_or(0.0, |r| r.annual_policy_growth),
            mortgage_payment_year1: year1.map_or(0.0, |r| r.annual_mortgage_payment),
            mortgage_balances: output.rows.iter().map(|r| r.mortgage_balance).collect(),
            net_equity: output.rows.iter().map(|r| r.net_equity).collect(),
        }
    }
}

/// Everything a stress test needs: the proposal, its baseline and the shocks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StressTestInput {
    pub proposal: SimulationInput,
    pub baseline: BaselineReference,
    pub scenario: StressScenario,
}

impl StressTestInput {
    pub fn new(proposal: &SimulationInput, baseline: &SimulationOutput, scenario: StressScenario) -> Self {
        Self {
            proposal: proposal.clone(),
            baseline: BaselineReference::from(baseline),
            scenario,
        }
    }
}

/// One year of the stressed projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StressRow {
    pub year: u32,
    pub net_equity: f64,
    pub baseline_net_equity: f64,
    /// Bank loan over policy plus bond value (%)
    pub ltv: f64,
    /// Reported from year 1 onwards
    pub surrender_value: Option<f64>,
    /// Reported from year 1 onwards
    pub bond_value: Option<f64>,
}

/// Headline stress statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StressStatistics {
    /// Reference rate at which year-1 income covers year-1 financing cost (%)
    pub break_even_hibor: f64,
    /// Minimum net equity over years 0..=30
    pub lowest_equity: f64,
    /// Capped lending rate under stress (%)
    pub stressed_rate: f64,
    /// Net bond principal after the haircut
    pub stressed_bond_principal: f64,
}

/// Complete stress test result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StressTestOutput {
    pub rows: Vec<StressRow>,
    pub statistics: StressStatistics,
    pub sensitivity: SensitivityGrid,
}
