//! Mortgage amortization schedule in annual steps
//!
//! The level payment comes from the monthly annuity formula, but interest accrues and the
//! balance steps down once per year. Once the balance reaches zero it stays there; the
//! overpayment in the final year is neither carried forward nor refunded.

use serde::{Deserialize, Serialize};

use super::HORIZON_YEARS;

/// One year of the mortgage schedule
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MortgageScheduleRow {
    pub year: u32,
    /// Balance outstanding at the end of the year
    pub balance: f64,
    /// Payments made during the year
    pub annual_payment: f64,
    /// Interest accrued during the year
    pub annual_interest: f64,
    /// Interest accrued from year 1 through this year
    pub cumulative_interest: f64,
}

/// Level monthly payment: `P·r·(1+r)^n / ((1+r)^n − 1)` with `r` the monthly rate
/// and `n` the number of months. Zero rate pays the principal off evenly; a zero tenor
/// pays nothing. Evaluated as `P·r / (1 − (1+r)^−n)`, which tends to interest-only
/// as the tenor grows.
pub fn level_monthly_payment(principal: f64, annual_rate_pct: f64, tenor_years: u32) -> f64 {
    if tenor_years == 0 {
        return 0.0;
    }
    let months = f64::from(tenor_years) * 12.0;
    let r = annual_rate_pct / 100.0 / 12.0;
    if r == 0.0 {
        return principal / months;
    }
    principal * r / (1.0 - (1.0 + r).powf(-months))
}

/// Build the schedule for years 0..=30
pub fn amortize(principal: f64, annual_rate_pct: f64, tenor_years: u32) -> Vec<MortgageScheduleRow> {
    let annual_payment = level_monthly_payment(principal, annual_rate_pct, tenor_years) * 12.0;

    let mut schedule = Vec::with_capacity(HORIZON_YEARS as usize + 1);
    schedule.push(MortgageScheduleRow {
        year: 0,
        balance: principal,
        ..Default::default()
    });

    let mut balance = principal;
    let mut cumulative_interest = 0.0;

    for year in 1..=HORIZON_YEARS {
        let row = if year <= tenor_years {
            let interest = balance * annual_rate_pct / 100.0;
            balance = (balance - (annual_payment - interest)).max(0.0);
            cumulative_interest += interest;
            MortgageScheduleRow {
                year,
                balance,
                annual_payment,
                annual_interest: interest,
                cumulative_interest,
            }
        } else {
            balance = 0.0;
            MortgageScheduleRow {
                year,
                balance,
                annual_payment: 0.0,
                annual_interest: 0.0,
                cumulative_interest,
            }
        };
        schedule.push(row);
    }

    schedule
}
