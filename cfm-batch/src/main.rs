use cfm_batch::report::Reporter;
use cfm_batch::storage;
use cfm_batch::{BatchClient, BatchRequest, ClientConfig};
use cfm_core::{DEFAULT_BASE_URL, DEFAULT_INPUT_FILE, DEFAULT_OUTPUT_FILE, DEFAULT_PROB_THRESH};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;
use url::Url;

/// Upload a molecule list to the CFM-ID batch prediction service and save the results.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Molecule list to upload (one `ID SMILES` or `SMILES` per line)
    #[arg(default_value = DEFAULT_INPUT_FILE)]
    input_file: PathBuf,

    /// Where to save the returned spreadsheet
    #[arg(default_value = DEFAULT_OUTPUT_FILE)]
    output_file: PathBuf,

    /// Probability threshold, forwarded to the service as is
    #[arg(default_value = DEFAULT_PROB_THRESH, allow_hyphen_values = true)]
    prob_thresh: String,

    /// Base URL of the prediction service
    #[arg(long, env = "CFM_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: Url,

    /// Upper bound for the whole request, e.g. `300s` or `5m`
    #[arg(
        long,
        env = "CFM_TIMEOUT",
        default_value = "300s",
        value_parser = humantime::parse_duration
    )]
    timeout: Duration,

    /// Probe /healthz before uploading
    #[arg(long)]
    check_health: bool,

    /// Predict a single molecule and print its spectrum instead of uploading a file
    #[arg(long)]
    smiles: Option<String>,

    /// Print a JSON outcome on stdout (progress moves to stderr)
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let config = ClientConfig::new(args.base_url)
        .with_timeout(args.timeout)
        .with_health_check(args.check_health);
    let client = BatchClient::new(config)?;
    let reporter = Reporter::new(args.json);

    if let Some(smiles) = args.smiles {
        info!(smiles = %smiles, "single molecule mode");
        return match client.predict_smiles(&smiles, &args.prob_thresh).await {
            Ok(spectrum) => {
                reporter.spectrum(&smiles, &spectrum);
                Ok(ExitCode::SUCCESS)
            }
            Err(e) => {
                reporter.failure(&e);
                Ok(ExitCode::FAILURE)
            }
        };
    }

    let request = BatchRequest::new(args.input_file, args.output_file, args.prob_thresh);
    reporter.banner();
    if let Err(e) = storage::ensure_input(&request.input_file).await {
        reporter.failure(&e);
        return Ok(ExitCode::FAILURE);
    }
    reporter.upload_started(&request, &client.config().base_url);

    match client.run(&request).await {
        Ok(result) => {
            reporter.success(&result);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            reporter.failure(&e);
            Ok(ExitCode::FAILURE)
        }
    }
}
