//! Scenario runner for batch projections and stress tests
//!
//! Holds one factor table and reuses it across many proposals or many stress
//! scenarios. Batches run in parallel; every run is an independent computation.

use rayon::prelude::*;
use serde::Serialize;
use std::path::Path;

use crate::error::Result;
use crate::factors::CashValueFactors;
use crate::projection::{ProjectionEngine, SimulationOutput};
use crate::proposal::SimulationInput;
use crate::stress::{StressEvaluator, StressScenario, StressTestInput, StressTestOutput};

/// Baseline and stressed results for one proposal
#[derive(Debug, Clone, Serialize)]
pub struct ProposalEvaluation {
    pub proposal_id: String,
    pub baseline: SimulationOutput,
    pub stress: StressTestOutput,
}

/// Pre-loaded runner for batch projections
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new();
/// let baseline = runner.run(&proposal);
///
/// let scenarios: Vec<_> = [5.0, 6.0, 7.0]
///     .iter()
///     .map(|&hibor| StressScenario { simulated_hibor: hibor, ..Default::default() })
///     .collect();
/// let stressed = runner.run_stress_scenarios(&proposal, &scenarios);
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    projection: ProjectionEngine,
    stress: StressEvaluator,
}

impl ScenarioRunner {
    /// Create runner with the standard factor table
    pub fn new() -> Self {
        Self::with_factors(CashValueFactors::standard())
    }

    /// Create runner with a pre-built factor table
    pub fn with_factors(factors: CashValueFactors) -> Self {
        Self {
            projection: ProjectionEngine::new(factors.clone()),
            stress: StressEvaluator::new(factors),
        }
    }

    /// Create runner by loading the factor table from a CSV file
    pub fn from_csv_path(path: &Path) -> Result<Self> {
        Ok(Self::with_factors(CashValueFactors::from_csv_path(path)?))
    }

    /// Run the baseline projection for one proposal
    pub fn run(&self, proposal: &SimulationInput) -> SimulationOutput {
        self.projection.calculate_projection(proposal)
    }

    /// Run the baseline projection and one stress scenario for a proposal
    pub fn evaluate(&self, proposal_id: &str, proposal: &SimulationInput, scenario: &StressScenario) -> ProposalEvaluation {
        let baseline = self.run(proposal);
        let input = StressTestInput::new(proposal, &baseline, scenario.clone());
        let stress = self.stress.calculate_stress_test(&input);
        ProposalEvaluation {
            proposal_id: proposal_id.to_string(),
            baseline,
            stress,
        }
    }

    /// Run baseline projections for many proposals
    pub fn run_batch(&self, proposals: &[SimulationInput]) -> Vec<SimulationOutput> {
        proposals.par_iter().map(|p| self.run(p)).collect()
    }

    /// Run the same stress scenario across many proposals
    pub fn evaluate_batch(
        &self,
        proposals: &[(String, SimulationInput)],
        scenario: &StressScenario,
    ) -> Vec<ProposalEvaluation> {
        proposals
            .par_iter()
            .map(|(id, proposal)| self.evaluate(id, proposal, scenario))
            .collect()
    }

    /// Run multiple stress scenarios against one proposal's baseline
    pub fn run_stress_scenarios(
        &self,
        proposal: &SimulationInput,
        scenarios: &[StressScenario],
    ) -> Vec<StressTestOutput> {
        let baseline = self.run(proposal);
        scenarios
            .par_iter()
            .map(|scenario| {
                let input = StressTestInput::new(proposal, &baseline, scenario.clone());
                self.stress.calculate_stress_test(&input)
            })
            .collect()
    }

    pub fn factors(&self) -> &CashValueFactors {
        self.projection.factors()
    }
}

impl Default for ScenarioRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::calculate_projection;

    #[test]
    fn test_batch_matches_sequential_runs() {
        let runner = ScenarioRunner::new();
        let proposals: Vec<SimulationInput> = [3.5, 4.5, 5.5]
            .iter()
            .map(|&bond_yield| SimulationInput {
                bond_yield,
                ..Default::default()
            })
            .collect();

        let results = runner.run_batch(&proposals);
        assert_eq!(results.len(), 3);
        for (proposal, result) in proposals.iter().zip(&results) {
            assert_eq!(result, &calculate_projection(proposal));
        }

        // Higher bond yield should result in higher final equity
        assert!(results[2].summary.final_net_equity > results[0].summary.final_net_equity);
    }

    #[test]
    fn test_stress_scenarios_ordered_by_severity() {
        let runner = ScenarioRunner::new();
        let scenarios: Vec<StressScenario> = [5.0, 6.0, 7.0]
            .iter()
            .map(|&hibor| StressScenario {
                simulated_hibor: hibor,
                ..Default::default()
            })
            .collect();

        let results = runner.run_stress_scenarios(&SimulationInput::default(), &scenarios);
        assert_eq!(results.len(), 3);
        assert!(results[2].statistics.lowest_equity <= results[0].statistics.lowest_equity);
        assert!(results[2].rows[30].net_equity < results[0].rows[30].net_equity);
    }

    #[test]
    fn test_evaluate_batch_keeps_ids_in_order() {
        let runner = ScenarioRunner::default();
        let proposals = vec![
            ("A".to_string(), SimulationInput::default()),
            (
                "B".to_string(),
                SimulationInput {
                    leverage_ltv: 80.0,
                    ..Default::default()
                },
            ),
        ];

        let results = runner.evaluate_batch(&proposals, &StressScenario::default());
        let ids: Vec<&str> = results.iter().map(|r| r.proposal_id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B"]);
        assert!(results[1].baseline.bank_loan < results[0].baseline.bank_loan);
    }
}
