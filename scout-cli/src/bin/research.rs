//! One-shot research assistant.

use std::process::ExitCode;

use clap::Parser;
use scout_cli::config::{CommonArgs, Settings};
use scout_cli::logging::init_logging;
use scout_cli::{Result, render, research};

/// Answer a question with a topic and a short summary
#[derive(Debug, Parser)]
#[command(name = "research")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Question to research
    #[arg(default_value = research::DEFAULT_QUESTION)]
    question: String,

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
    let agent = settings.apply(research::agent(provider));

    let answer = research::run(&agent, &cli.question).await?;
    render::research(&mut std::io::stdout().lock(), &answer)?;
    Ok(())
}
