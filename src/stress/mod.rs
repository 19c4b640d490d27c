//! Stress testing: shocked projection, break-even borrowing rate and sensitivity grid
//!
//! A stress test starts from a baseline projection and holds its day-1 structure
//! (premium, bank loan) and mortgage schedule fixed. Only the loan rate, the bond
//! principal and optionally the cash value curve are shocked.

mod engine;
mod sensitivity;
mod types;

pub use engine::{calculate_stress_test, StressEvaluator, NO_DEBT_BREAK_EVEN};
pub use sensitivity::{SensitivityAxis, SensitivityConfig, SensitivityGrid};
pub use types::{
    BaselineReference, StressRow, StressScenario, StressStatistics, StressTestInput, StressTestOutput,
};
