//! Stress evaluator: shocked projection, break-even rate and sensitivity grid

use log::debug;

use crate::factors::{CashValueFactors, FactorCurve};
use crate::projection::HORIZON_YEARS;
use crate::proposal::capped_rate;
use super::sensitivity::SensitivityGrid;
use super::types::{StressRow, StressStatistics, StressTestInput, StressTestOutput};

/// Break-even rate reported when there is no bank loan to break even on
pub const NO_DEBT_BREAK_EVEN: f64 = 100.0;

/// Balance-sheet position at one year under a given rate and yield
#[derive(Debug, Clone, Copy)]
struct Position {
    surrender_value: f64,
    bond_value: f64,
    net_equity: f64,
}

/// Re-runs a proposal's projection under shocked assumptions
#[derive(Debug, Clone)]
pub struct StressEvaluator {
    factors: CashValueFactors,
}

impl StressEvaluator {
    pub fn new(factors: CashValueFactors) -> Self {
        Self { factors }
    }

    pub fn factors(&self) -> &CashValueFactors {
        &self.factors
    }

    /// Run the stress test
    pub fn calculate_stress_test(&self, input: &StressTestInput) -> StressTestOutput {
        let proposal = &input.proposal;
        let baseline = &input.baseline;
        let scenario = &input.scenario;

        let stressed_bond_principal = baseline.net_bond_principal * (1.0 - scenario.bond_price_drop / 100.0);
        let stressed_rate = capped_rate(scenario.simulated_hibor, proposal.spread, proposal.cap_rate);

        let rows: Vec<StressRow> = (0..=HORIZON_YEARS)
            .map(|year| {
                let position = self.position(
                    input,
                    scenario.factor_curve,
                    stressed_bond_principal,
                    stressed_rate,
                    proposal.bond_yield,
                    year,
                );
                let pledged = position.surrender_value + position.bond_value;
                StressRow {
                    year,
                    net_equity: position.net_equity,
                    baseline_net_equity: baseline.net_equity_at(year),
                    ltv: if pledged <= 0.0 {
                        0.0
                    } else {
                        baseline.bank_loan / pledged * 100.0
                    },
                    surrender_value: (year >= 1).then_some(position.surrender_value),
                    bond_value: (year >= 1).then_some(position.bond_value),
                }
            })
            .collect();

        let lowest_equity = rows.iter().map(|r| r.net_equity).fold(f64::INFINITY, f64::min);
        let break_even_hibor = self.break_even_hibor(input, stressed_bond_principal);

        let sensitivity = self.sensitivity_grid(input, stressed_bond_principal);

        debug!(
            "Stress: rate={:.4}% bond_principal={:.2} lowest_equity={:.2} break_even={:.4}%",
            stressed_rate, stressed_bond_principal, lowest_equity, break_even_hibor
        );

        StressTestOutput {
            rows,
            statistics: StressStatistics {
                break_even_hibor,
                lowest_equity,
                stressed_rate,
                stressed_bond_principal,
            },
            sensitivity,
        }
    }

    /// Net position at a year: policy value + bond sleeve + cash, less loan,
    /// accrued interest and the baseline's mortgage balance
    fn position(
        &self,
        input: &StressTestInput,
        curve: FactorCurve,
        bond_principal: f64,
        rate_pct: f64,
        bond_yield_pct: f64,
        year: u32,
    ) -> Position {
        let baseline = &input.baseline;
        let years = year as f64;

        let surrender_value = baseline.total_premium * self.factors.factor(curve, year);
        let bond_value = bond_principal + bond_principal * bond_yield_pct / 100.0 * years;
        let accrued_interest = baseline.bank_loan * rate_pct / 100.0 * years;

        let net_equity = surrender_value + bond_value + input.proposal.cash_reserve
            - baseline.bank_loan
            - accrued_interest
            - baseline.mortgage_balance(year);

        Position {
            surrender_value,
            bond_value,
            net_equity,
        }
    }

    /// Reference rate at which year-1 income (stressed bond income plus unstressed
    /// policy growth, less mortgage payments) equals year-1 loan interest
    fn break_even_hibor(&self, input: &StressTestInput, stressed_bond_principal: f64) -> f64 {
        let baseline = &input.baseline;
        if baseline.bank_loan <= 0.0 {
            return NO_DEBT_BREAK_EVEN;
        }

        let bond_income = stressed_bond_principal * input.proposal.bond_yield / 100.0;
        let total_income = bond_income + baseline.policy_growth_year1;

        (total_income - baseline.mortgage_payment_year1) / baseline.bank_loan * 100.0 - input.proposal.spread
    }

    /// Profit at the analysis year over the rate × yield sweep, with premium and loan
    /// held at their baseline values
    fn sensitivity_grid(&self, input: &StressTestInput, stressed_bond_principal: f64) -> SensitivityGrid {
        let proposal = &input.proposal;
        let config = &input.scenario.sensitivity;
        let year = config.year();

        // Mortgage-funded proposals open with near-zero equity, so profit is measured from zero
        let capital_offset = if proposal.is_mortgage_funded() {
            0.0
        } else {
            proposal.total_budget
        };

        SensitivityGrid::evaluate(config, |hibor, bond_yield| {
            let rate = capped_rate(hibor, proposal.spread, proposal.cap_rate);
            let position = self.position(
                input,
                input.scenario.factor_curve,
                stressed_bond_principal,
                rate,
                bond_yield,
                year,
            );
            position.net_equity - capital_offset
        })
    }
}

impl Default for StressEvaluator {
    fn default() -> Self {
        Self::new(CashValueFactors::standard())
    }
}

/// Run a stress test with the standard factor table
pub fn calculate_stress_test(input: &StressTestInput) -> StressTestOutput {
    StressEvaluator::default().calculate_stress_test(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factors::{guaranteed_factor, total_factor};
    use crate::projection::{calculate_projection, SimulationOutput};
    use crate::proposal::{FundingSource, MortgageTerms, SimulationInput};
    use crate::stress::{SensitivityConfig, StressScenario};
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn stress_input(proposal: &SimulationInput, scenario: StressScenario) -> (SimulationOutput, StressTestInput) {
        let baseline = calculate_projection(proposal);
        let input = StressTestInput::new(proposal, &baseline, scenario);
        (baseline, input)
    }

    fn no_shock(proposal: &SimulationInput) -> StressScenario {
        StressScenario {
            simulated_hibor: proposal.hibor_rate,
            bond_price_drop: 0.0,
            factor_curve: FactorCurve::Total,
            sensitivity: SensitivityConfig::default(),
        }
    }

    #[test]
    fn test_unshocked_stress_matches_baseline() {
        let proposal = SimulationInput::default();
        let (baseline, input) = stress_input(&proposal, no_shock(&proposal));
        let output = calculate_stress_test(&input);

        assert_eq!(output.rows.len(), 31);
        for (stressed, base) in output.rows.iter().zip(&baseline.rows) {
            assert_abs_diff_eq!(stressed.net_equity, base.net_equity, epsilon = 1e-6);
            assert_eq!(stressed.baseline_net_equity, base.net_equity);
        }
        assert_abs_diff_eq!(
            output.statistics.lowest_equity,
            baseline.lowest_net_equity(),
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_shocks_applied() {
        let proposal = SimulationInput::default();
        let scenario = StressScenario {
            simulated_hibor: 7.0,
            bond_price_drop: 20.0,
            ..Default::default()
        };
        let (baseline, input) = stress_input(&proposal, scenario);
        let output = calculate_stress_test(&input);
        let stats = &output.statistics;

        assert_relative_eq!(stats.stressed_rate, 8.3, epsilon = 1e-12);
        assert_relative_eq!(stats.stressed_bond_principal, 297_000.0 * 0.8, epsilon = 1e-6);

        let row = &output.rows[5];
        assert_relative_eq!(
            row.bond_value.unwrap(),
            237_600.0 * (1.0 + 0.045 * 5.0),
            epsilon = 1e-6
        );
        assert!(row.net_equity < baseline.rows[5].net_equity);
    }

    #[test]
    fn test_stressed_rate_capped() {
        let proposal = SimulationInput::default();
        let scenario = StressScenario {
            simulated_hibor: 12.0,
            ..Default::default()
        };
        let (_, input) = stress_input(&proposal, scenario);
        assert_eq!(calculate_stress_test(&input).statistics.stressed_rate, 9.0);
    }

    #[test]
    fn test_guaranteed_curve_lowers_surrender_values() {
        let proposal = SimulationInput::default();
        let scenario = StressScenario {
            factor_curve: FactorCurve::Guaranteed,
            ..no_shock(&proposal)
        };
        let (baseline, input) = stress_input(&proposal, scenario);
        let output = calculate_stress_test(&input);

        let row = &output.rows[30];
        assert_relative_eq!(
            row.surrender_value.unwrap(),
            baseline.total_premium * guaranteed_factor(30),
            epsilon = 1e-6
        );
        assert!(row.net_equity < baseline.rows[30].net_equity);
    }

    #[test]
    fn test_year_zero_omits_asset_values() {
        let proposal = SimulationInput::default();
        let (_, input) = stress_input(&proposal, StressScenario::default());
        let output = calculate_stress_test(&input);

        assert!(output.rows[0].surrender_value.is_none());
        assert!(output.rows[0].bond_value.is_none());
        assert!(output.rows[1..].iter().all(|r| r.surrender_value.is_some() && r.bond_value.is_some()));
    }

    #[test]
    fn test_lowest_equity_is_minimum_over_horizon() {
        let proposal = SimulationInput::default();
        let scenario = StressScenario {
            simulated_hibor: 7.7,
            bond_price_drop: 30.0,
            factor_curve: FactorCurve::Guaranteed,
            ..Default::default()
        };
        let (_, input) = stress_input(&proposal, scenario);
        let output = calculate_stress_test(&input);

        let min = output.rows.iter().map(|r| r.net_equity).fold(f64::INFINITY, f64::min);
        assert_eq!(output.statistics.lowest_equity, min);
        assert!(output.rows.iter().all(|r| r.net_equity >= output.statistics.lowest_equity));
    }

    #[test]
    fn test_ltv() {
        let proposal = SimulationInput::default();
        let (baseline, input) = stress_input(&proposal, StressScenario::default());
        let output = calculate_stress_test(&input);

        let row = &output.rows[3];
        assert_relative_eq!(
            row.ltv,
            baseline.bank_loan / (row.surrender_value.unwrap() + row.bond_value.unwrap()) * 100.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_break_even_closed_form() {
        let proposal = SimulationInput::default();
        let scenario = StressScenario {
            bond_price_drop: 10.0,
            ..Default::default()
        };
        let (baseline, input) = stress_input(&proposal, scenario);
        let output = calculate_stress_test(&input);

        let bond_income = 297_000.0 * 0.9 * 0.045;
        let growth = baseline.total_premium * (total_factor(1) - total_factor(0));
        let expected = (bond_income + growth) / baseline.bank_loan * 100.0 - 1.30;
        assert_relative_eq!(output.statistics.break_even_hibor, expected, epsilon = 1e-9);

        // At the break-even rate, year-1 income equals year-1 interest
        let rate = output.statistics.break_even_hibor + proposal.spread;
        assert_relative_eq!(baseline.bank_loan * rate / 100.0, bond_income + growth, epsilon = 1e-6);
    }

    #[test]
    fn test_break_even_uses_unstressed_policy_growth() {
        let proposal = SimulationInput::default();
        let total = calculate_stress_test(&stress_input(&proposal, no_shock(&proposal)).1);
        let guaranteed = calculate_stress_test(
            &stress_input(
                &proposal,
                StressScenario {
                    factor_curve: FactorCurve::Guaranteed,
                    ..no_shock(&proposal)
                },
            )
            .1,
        );
        assert_eq!(total.statistics.break_even_hibor, guaranteed.statistics.break_even_hibor);
    }

    #[test]
    fn test_break_even_sentinel_without_debt() {
        let proposal = SimulationInput {
            total_budget: 0.0,
            cash_reserve: 0.0,
            bond_allocation: 0.0,
            ..Default::default()
        };
        let (baseline, input) = stress_input(&proposal, StressScenario::default());
        assert_eq!(baseline.bank_loan, 0.0);

        let output = calculate_stress_test(&input);
        assert_eq!(output.statistics.break_even_hibor, NO_DEBT_BREAK_EVEN);
        assert!(output.statistics.break_even_hibor.is_finite());
        assert!(output.rows.iter().all(|r| r.ltv == 0.0));
    }

    #[test]
    fn test_mortgage_schedule_not_restressed() {
        let proposal = SimulationInput {
            cash_reserve: 100_000.0,
            bond_allocation: 200_000.0,
            funding_source: FundingSource::Mortgage(MortgageTerms::new(1_000_000.0, 3.5, 25)),
            ..Default::default()
        };
        let scenario = StressScenario {
            simulated_hibor: 8.0,
            ..no_shock(&proposal)
        };
        let (baseline, input) = stress_input(&proposal, scenario);
        let output = calculate_stress_test(&input);

        // Only the loan interest differs from the baseline
        let row = &output.rows[10];
        let extra_interest = baseline.bank_loan * (9.0 - 5.45) / 100.0 * 10.0;
        assert_relative_eq!(
            row.net_equity,
            baseline.rows[10].net_equity - extra_interest,
            epsilon = 1e-6
        );

        let mortgage_payment = baseline.rows[1].annual_mortgage_payment;
        let expected = (200_000.0 * 0.99 * 0.045 + baseline.rows[1].annual_policy_growth - mortgage_payment)
            / baseline.bank_loan
            * 100.0
            - 1.30;
        assert_relative_eq!(output.statistics.break_even_hibor, expected, epsilon = 1e-9);
    }

    #[test]
    fn test_sensitivity_grid_shape() {
        let proposal = SimulationInput::default();
        let (_, input) = stress_input(&proposal, StressScenario::default());
        let grid = calculate_stress_test(&input).sensitivity;

        assert_eq!(grid.data.len(), grid.y_labels().len());
        for row in &grid.data {
            assert_eq!(row.len(), grid.x_labels().len());
        }
    }

    #[test]
    fn test_sensitivity_monotone_in_bond_drop() {
        let proposal = SimulationInput::default();
        let calm = calculate_stress_test(&stress_input(&proposal, no_shock(&proposal)).1).sensitivity;
        let shocked = calculate_stress_test(
            &stress_input(
                &proposal,
                StressScenario {
                    bond_price_drop: 15.0,
                    ..no_shock(&proposal)
                },
            )
            .1,
        )
        .sensitivity;

        for (calm_row, shocked_row) in calm.data.iter().zip(&shocked.data) {
            for (c, s) in calm_row.iter().zip(shocked_row) {
                assert!(s < c);
            }
        }
    }

    #[test]
    fn test_sensitivity_cell_value() {
        let proposal = SimulationInput::default();
        let scenario = StressScenario {
            bond_price_drop: 0.0,
            sensitivity: SensitivityConfig {
                analysis_year: 10,
                rate_axis: vec![3.0],
                yield_axis: vec![5.0],
            },
            ..Default::default()
        };
        let (baseline, input) = stress_input(&proposal, scenario);
        let grid = calculate_stress_test(&input).sensitivity;

        let expected = baseline.total_premium * total_factor(10)
            + 297_000.0 * (1.0 + 0.05 * 10.0)
            + 200_000.0
            - baseline.bank_loan
            - baseline.bank_loan * 0.043 * 10.0
            - 1_000_000.0;
        assert_relative_eq!(grid.cell(0, 0).unwrap(), expected, epsilon = 1e-6);
    }

    #[test]
    fn test_sensitivity_profit_higher_for_lower_rate() {
        let proposal = SimulationInput::default();
        let (_, input) = stress_input(&proposal, StressScenario::default());
        let grid = calculate_stress_test(&input).sensitivity;

        for row in &grid.data {
            for pair in row.windows(2) {
                assert!(pair[1] <= pair[0]);
            }
        }
    }
}
