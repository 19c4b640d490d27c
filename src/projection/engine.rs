//! Baseline projection engine: day-1 structure and the 31-row annual ledger

use log::{debug, warn};

use crate::factors::CashValueFactors;
use crate::proposal::SimulationInput;
use super::format::{CurrencyFormatter, UsdFormatter};
use super::ledger::{ProjectionRow, ProjectionSummary, SimulationOutput};
use super::mortgage::{amortize, MortgageScheduleRow};
use super::HORIZON_YEARS;

/// Day-1 capital structure of a proposal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayOneStructure {
    pub policy_equity: f64,
    pub total_premium: f64,
    pub bank_loan: f64,
    pub effective_rate: f64,
    pub one_off_bond_fee: f64,
    pub net_bond_principal: f64,
}

/// Main baseline projection engine
#[derive(Debug, Clone)]
pub struct ProjectionEngine<F = UsdFormatter> {
    factors: CashValueFactors,
    formatter: F,
}

impl ProjectionEngine<UsdFormatter> {
    /// Create an engine over the given factor table with USD display formatting
    pub fn new(factors: CashValueFactors) -> Self {
        Self::with_formatter(factors, UsdFormatter)
    }
}

impl Default for ProjectionEngine<UsdFormatter> {
    fn default() -> Self {
        Self::new(CashValueFactors::standard())
    }
}

impl<F: CurrencyFormatter> ProjectionEngine<F> {
    /// Create an engine with a custom display formatter
    pub fn with_formatter(factors: CashValueFactors, formatter: F) -> Self {
        Self { factors, formatter }
    }

    pub fn factors(&self) -> &CashValueFactors {
        &self.factors
    }

    pub fn formatter(&self) -> &F {
        &self.formatter
    }

    /// Size the policy premium and bank loan for a proposal
    ///
    /// The premium is chosen so that, after borrowing `leverage_ltv` of its day-1 cash
    /// value, the client funds exactly `policy_equity`. A non-positive sizing denominator
    /// or non-positive policy equity gives an empty structure (no policy, no loan).
    pub fn day_one(&self, input: &SimulationInput) -> DayOneStructure {
        let policy_equity = input.policy_equity();
        let denominator = 1.0 - (input.leverage_ltv / 100.0) * self.factors.total(0);

        let (total_premium, bank_loan) = if denominator <= 0.0 {
            warn!(
                "Premium sizing denominator is {:.6} at LTV {}%; no policy is written",
                denominator, input.leverage_ltv
            );
            (0.0, 0.0)
        } else if policy_equity <= 0.0 {
            warn!(
                "Policy equity is {:.2} after cash and bond allocations; no policy is written",
                policy_equity
            );
            (0.0, 0.0)
        } else {
            let premium = policy_equity / denominator;
            (premium, (premium - policy_equity).max(0.0))
        };

        DayOneStructure {
            policy_equity,
            total_premium,
            bank_loan,
            effective_rate: input.effective_rate(),
            one_off_bond_fee: input.one_off_bond_fee(),
            net_bond_principal: input.net_bond_principal(),
        }
    }

    /// Run the baseline projection for a proposal
    pub fn calculate_projection(&self, input: &SimulationInput) -> SimulationOutput {
        let day_one = self.day_one(input);
        debug!(
            "Day 1: premium={:.2} loan={:.2} rate={:.4}% net_bond={:.2}",
            day_one.total_premium, day_one.bank_loan, day_one.effective_rate, day_one.net_bond_principal
        );

        let schedule = input
            .mortgage()
            .map(|m| amortize(m.unlocked_cash, m.mortgage_rate, m.tenor_years));

        let mut rows: Vec<ProjectionRow> = Vec::with_capacity(HORIZON_YEARS as usize + 1);
        for year in 0..=HORIZON_YEARS {
            let mortgage = schedule.as_ref().map(|s| &s[year as usize]);
            let row = self.calculate_year(input, &day_one, mortgage, rows.last(), rows.first(), year);
            rows.push(row);
        }

        let summary = self.summarize(input, &day_one, &rows);

        SimulationOutput {
            policy_equity: day_one.policy_equity,
            total_premium: day_one.total_premium,
            bank_loan: day_one.bank_loan,
            effective_rate: day_one.effective_rate,
            rows,
            summary,
        }
    }

    /// Calculate one ledger row
    fn calculate_year(
        &self,
        input: &SimulationInput,
        day_one: &DayOneStructure,
        mortgage: Option<&MortgageScheduleRow>,
        prior: Option<&ProjectionRow>,
        opening: Option<&ProjectionRow>,
        year: u32,
    ) -> ProjectionRow {
        let mut row = ProjectionRow::new(year);
        let years = year as f64;

        // Assets: policy cash value, bond sleeve (simple interest on net principal), cash
        row.surrender_value = day_one.total_premium * self.factors.total(year);
        row.net_bond_principal = day_one.net_bond_principal;
        row.cumulative_bond_interest = day_one.net_bond_principal * input.bond_yield / 100.0 * years;
        row.bond_fund_value = row.net_bond_principal + row.cumulative_bond_interest;
        row.cash_value = input.cash_reserve;
        row.total_assets = row.surrender_value + row.bond_fund_value + row.cash_value;

        // Liabilities: interest-only bullet loan, simple interest, plus mortgage balance
        row.loan = day_one.bank_loan;
        row.cumulative_loan_interest = day_one.bank_loan * day_one.effective_rate / 100.0 * years;
        row.mortgage_balance = mortgage.map_or(0.0, |m| m.balance);
        row.net_equity = row.total_assets - row.loan - row.cumulative_loan_interest - row.mortgage_balance;

        row.cumulative_policy_growth = match opening {
            Some(first) => row.surrender_value - first.surrender_value,
            None => 0.0,
        };
        row.cumulative_mortgage_interest = mortgage.map_or(0.0, |m| m.cumulative_interest);
        row.annual_mortgage_payment = mortgage.map_or(0.0, |m| m.annual_payment);
        row.cumulative_mortgage_payments =
            prior.map_or(0.0, |p| p.cumulative_mortgage_payments) + row.annual_mortgage_payment;

        if let Some(prior) = prior {
            row.annual_bond_income = row.cumulative_bond_interest - prior.cumulative_bond_interest;
            row.annual_loan_interest = row.cumulative_loan_interest - prior.cumulative_loan_interest;
            row.annual_policy_growth = row.cumulative_policy_growth - prior.cumulative_policy_growth;
            row.annual_net_gain = row.annual_bond_income + row.annual_policy_growth
                - row.annual_loan_interest
                - row.annual_mortgage_payment;

            // Mortgage-funded proposals start near zero equity, so measure against budget
            let capital = if input.is_mortgage_funded() {
                input.total_budget
            } else {
                prior.net_equity
            };
            row.annual_return_on_capital = if capital <= 0.0 {
                0.0
            } else {
                row.annual_net_gain / capital * 100.0
            };
        }

        // Mortgage payments are paid in from outside the balance sheet
        let opening_equity = opening.map_or(row.net_equity, |first| first.net_equity);
        row.cumulative_net_gain = row.net_equity - opening_equity - row.cumulative_mortgage_payments;

        row.formatted_net_equity = self.formatter.format(row.net_equity);
        row.formatted_loan = self.formatter.format(row.loan);

        row
    }

    /// Calculate summary figures from the finished ledger
    fn summarize(
        &self,
        input: &SimulationInput,
        day_one: &DayOneStructure,
        rows: &[ProjectionRow],
    ) -> ProjectionSummary {
        let final_row = &rows[rows.len() - 1];
        let first_year = &rows[1];

        // Unguarded: a zero budget yields a non-finite ROI
        let roi = final_row.cumulative_net_gain / input.total_budget * 100.0;
        if !roi.is_finite() {
            warn!("ROI is {} because total budget is {}", roi, input.total_budget);
        }

        let monthly_bond_income = first_year.annual_bond_income / 12.0;
        let monthly_loan_interest = first_year.annual_loan_interest / 12.0;
        let monthly_mortgage_payment = input.mortgage().map_or(0.0, |m| m.monthly_payment);

        ProjectionSummary {
            final_net_equity: final_row.net_equity,
            roi,
            monthly_bond_income,
            monthly_loan_interest,
            monthly_mortgage_payment,
            monthly_net_cashflow: monthly_bond_income - monthly_loan_interest - monthly_mortgage_payment,
            one_off_bond_fee: day_one.one_off_bond_fee,
            net_bond_principal: day_one.net_bond_principal,
        }
    }
}

/// Run the baseline projection with the standard factor table
pub fn calculate_projection(input: &SimulationInput) -> SimulationOutput {
    ProjectionEngine::new(CashValueFactors::standard()).calculate_projection(input)
}
