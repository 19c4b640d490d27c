//! Policy cash value factors (total and guaranteed curves)

mod table;
pub mod loader;

pub use table::{
    CashValueFactors, FactorCurve, guaranteed_factor, guaranteed_ratio, total_factor,
    MAX_POLICY_YEAR, STANDARD_TOTAL_FACTORS, TABLE_LEN,
};
pub use loader::{load_factor_table, DEFAULT_FACTOR_PATH};
