//! Cash value factor table by policy year
//!
//! The "total" curve is the illustrated surrender value per unit of premium. The
//! "guaranteed" curve is derived from it: `guaranteed[y] = total[y] * (0.85 - 0.005 * y)`.

use serde::{Deserialize, Serialize};

/// Last policy year covered by the table; later years reuse this year's factor
pub const MAX_POLICY_YEAR: u32 = 30;

/// Number of rows in a factor table (years 0..=30)
pub const TABLE_LEN: usize = MAX_POLICY_YEAR as usize + 1;

/// Illustrated total cash value factors, years 0..=30
pub const STANDARD_TOTAL_FACTORS: [f64; TABLE_LEN] = [
    0.8000, // Year 0 (day 1)
    0.8100,
    0.8300,
    0.8600,
    0.9000,
    0.9500, // Year 5
    1.0100,
    1.0600,
    1.1200,
    1.1800,
    1.2450, // Year 10
    1.3100,
    1.3800,
    1.4550,
    1.5350,
    1.6200, // Year 15
    1.7100,
    1.8050,
    1.9050,
    2.0100,
    2.1200, // Year 20
    2.2350,
    2.3600,
    2.4900,
    2.6250,
    2.7700, // Year 25
    2.9200,
    3.0800,
    3.2500,
    3.4300,
    3.6222, // Year 30
];

/// Which factor curve a projection reads surrender values from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorCurve {
    /// Illustrated (non-guaranteed plus guaranteed) values
    #[default]
    Total,
    /// Guaranteed values only
    Guaranteed,
}

/// Ratio of guaranteed to total cash value at a policy year
pub fn guaranteed_ratio(year: u32) -> f64 {
    0.85 - 0.005 * year as f64
}

/// Clamp a policy year into the table's range
fn table_index(year: u32) -> usize {
    year.min(MAX_POLICY_YEAR) as usize
}

/// Total and guaranteed cash value factors for policy years 0..=30
#[derive(Debug, Clone, PartialEq)]
pub struct CashValueFactors {
    total: [f64; TABLE_LEN],
    guaranteed: [f64; TABLE_LEN],
}

impl CashValueFactors {
    /// Build from a total curve, deriving the guaranteed curve
    pub fn from_total(total: [f64; TABLE_LEN]) -> Self {
        let mut guaranteed = [0.0; TABLE_LEN];
        for (year, (g, t)) in guaranteed.iter_mut().zip(total.iter()).enumerate() {
            *g = t * guaranteed_ratio(year as u32);
        }
        Self { total, guaranteed }
    }

    /// The illustrated table shipped with the engine
    pub fn standard() -> Self {
        Self::from_total(STANDARD_TOTAL_FACTORS)
    }

    /// Total factor for a policy year (years beyond 30 reuse year 30)
    pub fn total(&self, year: u32) -> f64 {
        self.total[table_index(year)]
    }

    /// Guaranteed factor for a policy year (years beyond 30 reuse year 30)
    pub fn guaranteed(&self, year: u32) -> f64 {
        self.guaranteed[table_index(year)]
    }

    /// Factor for a policy year from the selected curve
    pub fn factor(&self, curve: FactorCurve, year: u32) -> f64 {
        match curve {
            FactorCurve::Total => self.total(year),
            FactorCurve::Guaranteed => self.guaranteed(year),
        }
    }
}

impl Default for CashValueFactors {
    fn default() -> Self {
        Self::standard()
    }
}

/// Total factor from the standard table
pub fn total_factor(year: u32) -> f64 {
    STANDARD_TOTAL_FACTORS[table_index(year)]
}

/// Guaranteed factor from the standard table
pub fn guaranteed_factor(year: u32) -> f64 {
    let idx = table_index(year);
    STANDARD_TOTAL_FACTORS[idx] * guaranteed_ratio(idx as u32)
}
