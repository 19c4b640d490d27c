//! Premium Finance - projection engine for leveraged insurance premium-financing proposals
//!
//! This library provides:
//! - Day-1 structuring (policy premium, bank loan, capped lending rate)
//! - 30-year annual ledgers of assets, liabilities, interest accrual and net equity
//! - Mortgage amortization for refinance-funded proposals
//! - Stress testing with break-even rate and rate × yield sensitivity grids
//! - Parallel batch runs over many proposals or scenarios

pub mod error;
pub mod factors;
pub mod proposal;
pub mod projection;
pub mod rates;
pub mod scenario;
pub mod stress;

// Re-export commonly used types
pub use error::{EngineError, Result};
pub use factors::CashValueFactors;
pub use proposal::{FundingSource, InterestBasis, MortgageTerms, SimulationInput};
pub use projection::{calculate_projection, ProjectionEngine, ProjectionRow, SimulationOutput};
pub use rates::RateQuote;
pub use scenario::ScenarioRunner;
pub use stress::{calculate_stress_test, StressScenario, StressTestInput, StressTestOutput};
