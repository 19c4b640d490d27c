//! Baseline projection: premium sizing, mortgage amortization and the annual ledger

mod engine;
mod format;
mod ledger;
mod mortgage;

pub use engine::{calculate_projection, DayOneStructure, ProjectionEngine};
pub use format::{CurrencyFormatter, UsdFormatter};
pub use ledger::{ProjectionRow, ProjectionSummary, SimulationOutput};
pub use mortgage::{amortize, level_monthly_payment, MortgageScheduleRow};

/// Projection horizon in policy years (rows cover years 0..=30)
pub const HORIZON_YEARS: u32 = 30;
