use lockpay_client::cli::Dependencies;
use lockpay_client::workflow::{lockpay_scenario, StepState};
use lockpay_client::Config;
use log::info;
use std::process::exit;

async fn run() -> anyhow::Result<()> {
    let deps = Dependencies::connect(Config::from_env()?);
    info!("connected to {} as program {}", deps.ledger.url(), deps.config.program_id);

    let report = lockpay_scenario(&deps)?.run().await;
    let verdict = report.verdict();

    println!("\nWorkflow finished: {verdict}");
    for step in &report.steps {
        let state = match &step.state {
            StepState::Pending => "not run".to_string(),
            StepState::Running => "interrupted".to_string(),
            StepState::Succeeded => "ok".to_string(),
            StepState::ExpectedFailure(reason) => format!("ok, expected error: {reason}"),
            StepState::UnexpectedSuccess => "WARNING: succeeded, an error was expected".to_string(),
            StepState::Failed(reason) => format!("FAILED: {reason}"),
        };
        println!("  {}: {state}", step.label);
    }

    report.into_result()?;
    Ok(())
}

#[tokio::main]
async fn main() {
    solana_logger::setup_with_default("info");

    if let Err(e) = run().await {
        eprintln!("Workflow failed: {e:#}");
        exit(1);
    }
}
