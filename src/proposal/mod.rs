//! Proposal inputs and CSV loading

mod data;
mod loader;

pub use data::{capped_rate, FundingSource, InterestBasis, MortgageTerms, SimulationInput};
pub use loader::{load_proposals, DEFAULT_PROPOSALS_PATH};
