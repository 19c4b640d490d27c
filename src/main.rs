//! Premium Finance CLI
//!
//! Runs one proposal through the baseline projection and a stress test

use anyhow::Context;
use clap::Parser;
use log::info;
use std::fs::File;
use std::path::PathBuf;

use premium_finance::factors::FactorCurve;
use premium_finance::stress::{SensitivityAxis, SensitivityConfig};
use premium_finance::{
    calculate_projection, calculate_stress_test, RateQuote, SimulationInput, StressScenario, StressTestInput,
};

#[derive(Parser, Debug)]
#[command(name = "premium_finance", version, about = "Project and stress-test a premium-financing proposal")]
struct Cli {
    /// Proposal JSON file (defaults to the reference proposal)
    #[arg(long)]
    proposal: Option<PathBuf>,

    /// Rate feed quote JSON ({"rate": .., "date": ".."}) used as the HIBOR rate
    #[arg(long)]
    hibor_quote: Option<PathBuf>,

    /// Reference rate for the stress test (%)
    #[arg(long, default_value_t = 6.0)]
    stress_hibor: f64,

    /// Bond price drop for the stress test (%)
    #[arg(long, default_value_t = 10.0)]
    bond_drop: f64,

    /// Use guaranteed cash values in the stress test
    #[arg(long)]
    guaranteed: bool,

    /// Policy year the sensitivity grid measures profit at
    #[arg(long, default_value_t = 10)]
    sensitivity_year: u32,

    /// Sensitivity grid HIBOR sweep as min:max:step (%)
    #[arg(long, default_value = "2:8:1")]
    rate_axis: String,

    /// Sensitivity grid bond yield sweep as min:max:step (%)
    #[arg(long, default_value = "3:6:0.5")]
    yield_axis: String,

    /// Write the baseline ledger to this CSV file
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Print baseline and stress output as JSON instead of tables
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut proposal = match &cli.proposal {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("opening proposal {}", path.display()))?;
            serde_json::from_reader::<_, SimulationInput>(file)
                .with_context(|| format!("parsing proposal {}", path.display()))?
        }
        None => SimulationInput::default(),
    };

    if let Some(path) = &cli.hibor_quote {
        let quote = RateQuote::from_json_path(path)
            .with_context(|| format!("reading rate quote {}", path.display()))?;
        info!("Using HIBOR {:.4}% fixed on {}", quote.rate, quote.date);
        proposal = proposal.with_hibor_quote(&quote);
    }

    let rate_axis = SensitivityAxis::parse("hibor", &cli.rate_axis)?;
    let yield_axis = SensitivityAxis::parse("bond_yield", &cli.yield_axis)?;
    let sensitivity = SensitivityConfig::from_axes(cli.sensitivity_year, &rate_axis, &yield_axis)
        .context("building sensitivity grid axes")?;

    let scenario = StressScenario {
        simulated_hibor: cli.stress_hibor,
        bond_price_drop: cli.bond_drop,
        factor_curve: if cli.guaranteed {
            FactorCurve::Guaranteed
        } else {
            FactorCurve::Total
        },
        sensitivity,
    };

    let baseline = calculate_projection(&proposal);
    let stress = calculate_stress_test(&StressTestInput::new(&proposal, &baseline, scenario));

    if let Some(path) = &cli.csv {
        let mut writer = csv::Writer::from_path(path)
            .with_context(|| format!("creating {}", path.display()))?;
        for row in &baseline.rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
        info!("Ledger written to {}", path.display());
    }

    if cli.json {
        let combined = serde_json::json!({
            "proposal": proposal,
            "baseline": baseline,
            "stress": stress,
        });
        println!("{}", serde_json::to_string_pretty(&combined)?);
        return Ok(());
    }

    println!("Premium Finance v{}", env!("CARGO_PKG_VERSION"));
    println!("=====================\n");

    println!("Day 1 Structure:");
    println!("  Policy Equity:   ${:.2}", baseline.policy_equity);
    println!("  Total Premium:   ${:.2}", baseline.total_premium);
    println!("  Bank Loan:       ${:.2}", baseline.bank_loan);
    println!("  Effective Rate:  {:.2}%", baseline.effective_rate);
    println!("  Bond Fee:        ${:.2}", baseline.summary.one_off_bond_fee);
    println!("  Net Bond:        ${:.2}", baseline.summary.net_bond_principal);
    println!();

    println!("{:>4} {:>14} {:>14} {:>14} {:>14} {:>14} {:>12} {:>8}",
        "Year", "Surrender", "Bond Fund", "Loan Int", "Mortgage", "Net Equity", "Net Gain", "RoC %");
    println!("{}", "-".repeat(102));
    for row in &baseline.rows {
        println!("{:>4} {:>14.0} {:>14.0} {:>14.0} {:>14.0} {:>14} {:>12.0} {:>8.2}",
            row.year,
            row.surrender_value,
            row.bond_fund_value,
            row.cumulative_loan_interest,
            row.mortgage_balance,
            row.formatted_net_equity,
            row.annual_net_gain,
            row.annual_return_on_capital,
        );
    }

    let summary = &baseline.summary;
    let grid = &stress.sensitivity;
    println!("\nSummary:");
    println!("  Final Net Equity:      ${:.2}", summary.final_net_equity);
    println!("  ROI:                   {:.2}%", summary.roi);
    println!("  Monthly Bond Income:   ${:.2}", summary.monthly_bond_income);
    println!("  Monthly Loan Interest: ${:.2}", summary.monthly_loan_interest);
    if summary.monthly_mortgage_payment > 0.0 {
        println!("  Monthly Mortgage:      ${:.2}", summary.monthly_mortgage_payment);
    }
    println!("  Monthly Net Cashflow:  ${:.2}", summary.monthly_net_cashflow);
    println!("  Lowest Net Equity:     ${:.2}", baseline.lowest_net_equity());
    if let Some(row) = baseline.row(grid.analysis_year) {
        println!("  Year {} Net Equity:    ${:.2}", row.year, row.net_equity);
    }

    let stats = &stress.statistics;
    println!("\nStress Test:");
    println!("  Stressed Rate:         {:.2}%", stats.stressed_rate);
    println!("  Stressed Bond:         ${:.2}", stats.stressed_bond_principal);
    println!("  Lowest Net Equity:     ${:.2}", stats.lowest_equity);
    println!("  Break-even HIBOR:      {:.2}%", stats.break_even_hibor);

    println!("\nYear {} profit (rows: bond yield, columns: HIBOR):", grid.analysis_year);
    print!("{:>8}", "");
    for label in grid.x_labels() {
        print!(" {:>12}", label);
    }
    println!();
    for (label, row) in grid.y_labels().iter().zip(&grid.data) {
        print!("{:>8}", label);
        for value in row {
            print!(" {:>12.0}", value);
        }
        println!();
    }

    Ok(())
}
