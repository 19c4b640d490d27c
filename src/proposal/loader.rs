//! Load proposals from a CSV file (one proposal per row)
//!
//! A quoted `monthly_mortgage_payment` replaces the level payment on the loaded
//! terms. It feeds only the summary's monthly cashflow; the ledger's mortgage
//! schedule is always amortized from principal, rate and tenor.

use log::warn;
use std::path::Path;

use super::{FundingSource, InterestBasis, MortgageTerms, SimulationInput};
use crate::error::{EngineError, Result};

/// Default location of the sample proposal batch
pub const DEFAULT_PROPOSALS_PATH: &str = "data/proposals.csv";

/// Raw CSV row matching proposals.csv columns
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    proposal_id: String,
    total_budget: f64,
    cash_reserve: f64,
    bond_allocation: f64,
    bond_yield: f64,
    hibor_rate: f64,
    cost_of_funds_rate: f64,
    interest_basis: String,
    spread: f64,
    cap_rate: f64,
    handling_fee: f64,
    leverage_ltv: f64,
    funding_source: String,
    // Mortgage columns, read only for mortgage-funded rows
    unlocked_cash: Option<f64>,
    mortgage_rate: Option<f64>,
    mortgage_tenor_years: Option<u32>,
    monthly_mortgage_payment: Option<f64>,
}

impl CsvRow {
    fn into_proposal(self) -> Result<(String, SimulationInput)> {
        let interest_basis = match self.interest_basis.trim().to_ascii_lowercase().as_str() {
            "hibor" => InterestBasis::Hibor,
            "cof" | "cost_of_funds" => InterestBasis::CostOfFunds,
            _ => {
                return Err(EngineError::UnknownValue {
                    field: "interest_basis",
                    value: self.interest_basis,
                })
            }
        };

        let funding_source = match self.funding_source.trim().to_ascii_lowercase().as_str() {
            "cash" => FundingSource::Cash,
            "mortgage" => {
                let mut terms = MortgageTerms::new(
                    self.unlocked_cash.unwrap_or(0.0),
                    self.mortgage_rate.unwrap_or(0.0),
                    self.mortgage_tenor_years.unwrap_or(0),
                );
                if let Some(quoted) = self.monthly_mortgage_payment {
                    if (quoted - terms.monthly_payment).abs() > 0.01 {
                        warn!(
                            "Proposal {}: quoted mortgage payment {:.2} differs from level payment {:.2}; \
                             ledger amortizes at the level payment",
                            self.proposal_id, quoted, terms.monthly_payment
                        );
                    }
                    terms.monthly_payment = quoted;
                }
                FundingSource::Mortgage(terms)
            }
            _ => {
                return Err(EngineError::UnknownValue {
                    field: "funding_source",
                    value: self.funding_source,
                })
            }
        };

        let input = SimulationInput {
            total_budget: self.total_budget,
            cash_reserve: self.cash_reserve,
            bond_allocation: self.bond_allocation,
            bond_yield: self.bond_yield,
            hibor_rate: self.hibor_rate,
            cost_of_funds_rate: self.cost_of_funds_rate,
            interest_basis,
            spread: self.spread,
            cap_rate: self.cap_rate,
            handling_fee: self.handling_fee,
            leverage_ltv: self.leverage_ltv,
            funding_source,
        };

        Ok((self.proposal_id, input))
    }
}

/// Load proposals from a CSV file
/// Returns (proposal id, input) pairs in file order
pub fn load_proposals(path: &Path) -> Result<Vec<(String, SimulationInput)>> {
    let mut reader = csv::Reader::from_path(path)?;

    let mut proposals = Vec::new();
    for result in reader.deserialize() {
        let row: CsvRow = result?;
        proposals.push(row.into_proposal()?);
    }

    Ok(proposals)
}
