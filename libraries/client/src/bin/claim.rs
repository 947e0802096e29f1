use lockpay_client::cli::{render_receipt, run_claim, Dependencies};
use lockpay_client::Config;
use log::info;
use std::process::exit;

async fn run(args: Vec<String>) -> anyhow::Result<()> {
    let deps = Dependencies::connect(Config::from_env()?);
    info!("connected to {} as program {}", deps.ledger.url(), deps.config.program_id);

    let receipt = run_claim(&args, &deps).await?;
    println!("{}", render_receipt("Claim success", &receipt, &deps.config));
    Ok(())
}

#[tokio::main]
async fn main() {
    solana_logger::setup_with_default("info");

    if let Err(e) = run(std::env::args().skip(1).collect()).await {
        eprintln!("Oops, something went wrong: {e:#}");
        exit(1);
    }
}
