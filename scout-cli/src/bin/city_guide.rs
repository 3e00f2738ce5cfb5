//! City guide for the capital of a country.

use std::process::ExitCode;

use clap::Parser;
use scout_cli::config::{CommonArgs, Settings};
use scout_cli::logging::init_logging;
use scout_cli::{Result, guide, render};

/// Print a short city guide for the capital of a country
#[derive(Debug, Parser)]
#[command(name = "city-guide")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Country whose capital to describe
    #[arg(default_value = guide::DEFAULT_COUNTRY)]
    country: String,

    #[command(flatten)]
    common: CommonArgs,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.common.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let settings = Settings::from_args(&cli.common)?;
    let provider = settings.build_provider()?;
    let agent = settings.apply(guide::agent(provider));

    let city = guide::run(&agent, &cli.country).await?;
    render::city_guide(&mut std::io::stdout().lock(), &city)?;
    Ok(())
}
