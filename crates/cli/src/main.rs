use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use simrs_cli::{CliConfig, commands};
use simrs_core::{Money, PatientId};
use simrs_insurance::InsuranceClient;

#[derive(Parser, Debug)]
#[command(name = "simrs-billing", about = "Hospital billing totals, change and insurance checks.")]
struct Args {
    /// Currency symbol for display amounts (overrides SIMRS_CURRENCY_SYMBOL).
    #[arg(long, global = true)]
    currency_symbol: Option<String>,

    /// Insurance verification timeout in milliseconds (overrides SIMRS_BPJS_TIMEOUT_MS).
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute row totals and the patient's responsibility for a billing form.
    Summary {
        /// Billing form JSON: {"items": [...], "insurance_covered": ...}.
        #[arg(short, long)]
        input: PathBuf,

        /// Print the summary as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Compute the change owed for a payment.
    Change {
        #[arg(long)]
        due: Money,

        #[arg(long)]
        paid: Money,
    },
    /// Verify an insurance card with the simulated BPJS service.
    Verify {
        #[arg(long)]
        patient: PatientId,

        #[arg(long)]
        card: String,

        /// Billing form to apply the verified coverage to.
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    simrs_observability::init();

    let args = Args::parse();
    let config = CliConfig::from_env().with_overrides(args.currency_symbol, args.timeout_ms);

    let output = match args.command {
        Command::Summary { input, json } => {
            let form = commands::load_form(&input)?;
            if json {
                commands::summary_json(&form.summary())?
            } else {
                commands::render_summary(&form, &config.currency)
            }
        }
        Command::Change { due, paid } => commands::render_change(due, paid, &config.currency),
        Command::Verify { patient, card, input } => {
            let form = input.as_deref().map(commands::load_form).transpose()?;
            let client = InsuranceClient::simulated(&config.verifier);
            commands::verify(&client, patient, &card, form.as_ref(), &config.currency)
                .await
                .context("verify command failed")?
        }
    };

    println!("{output}");
    Ok(())
}
