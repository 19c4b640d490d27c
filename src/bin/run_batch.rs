//! Run baseline and stress projections for every proposal in a CSV file
//!
//! Outputs one summary row per proposal

use anyhow::Context;
use clap::Parser;
use log::info;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;

use premium_finance::factors::DEFAULT_FACTOR_PATH;
use premium_finance::proposal::{load_proposals, DEFAULT_PROPOSALS_PATH};
use premium_finance::{ScenarioRunner, StressScenario};

#[derive(Parser, Debug)]
#[command(name = "run_batch", about = "Project and stress-test a batch of proposals")]
struct Args {
    /// Proposals CSV
    #[arg(long, default_value = DEFAULT_PROPOSALS_PATH)]
    proposals: PathBuf,

    /// Cash value factor CSV
    #[arg(long, default_value = DEFAULT_FACTOR_PATH)]
    factors: PathBuf,

    /// Stress scenario JSON (defaults to the standard scenario)
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Summary output CSV
    #[arg(long, default_value = "batch_summary.csv")]
    output: PathBuf,
}

/// Summary of one proposal's baseline and stressed results
#[derive(Debug, Serialize)]
struct SummaryRow {
    proposal_id: String,
    total_premium: f64,
    bank_loan: f64,
    effective_rate: f64,
    final_net_equity: f64,
    roi: f64,
    monthly_net_cashflow: f64,
    stressed_rate: f64,
    stressed_final_net_equity: f64,
    lowest_equity: f64,
    break_even_hibor: f64,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let start = Instant::now();
    let proposals = load_proposals(&args.proposals)
        .with_context(|| format!("loading proposals from {}", args.proposals.display()))?;
    info!("Loaded {} proposals in {:?}", proposals.len(), start.elapsed());

    let runner = ScenarioRunner::from_csv_path(&args.factors)
        .with_context(|| format!("loading factor table from {}", args.factors.display()))?;

    let scenario: StressScenario = match &args.scenario {
        Some(path) => {
            let file = std::fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
            serde_json::from_reader(file).with_context(|| format!("parsing {}", path.display()))?
        }
        None => StressScenario::default(),
    };

    let proj_start = Instant::now();
    let evaluations = runner.evaluate_batch(&proposals, &scenario);
    info!("Projections complete in {:?}", proj_start.elapsed());

    let mut writer = csv::Writer::from_path(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;

    for eval in &evaluations {
        let baseline = &eval.baseline;
        let stats = &eval.stress.statistics;
        writer.serialize(SummaryRow {
            proposal_id: eval.proposal_id.clone(),
            total_premium: baseline.total_premium,
            bank_loan: baseline.bank_loan,
            effective_rate: baseline.effective_rate,
            final_net_equity: baseline.summary.final_net_equity,
            roi: baseline.summary.roi,
            monthly_net_cashflow: baseline.summary.monthly_net_cashflow,
            stressed_rate: stats.stressed_rate,
            stressed_final_net_equity: eval.stress.rows.last().map_or(0.0, |r| r.net_equity),
            lowest_equity: stats.lowest_equity,
            break_even_hibor: stats.break_even_hibor,
        })?;
    }
    writer.flush()?;

    println!("Output written to {}", args.output.display());
    println!("\nBatch Summary:");
    for eval in &evaluations {
        println!("  {:<8} Final=${:>14.0}  ROI={:>7.2}%  Lowest(stress)=${:>14.0}  Break-even={:>6.2}%",
            eval.proposal_id,
            eval.baseline.summary.final_net_equity,
            eval.baseline.summary.roi,
            eval.stress.statistics.lowest_equity,
            eval.stress.statistics.break_even_hibor,
        );
    }

    println!("\nTotal time: {:?}", start.elapsed());
    Ok(())
}
