use clap::Parser;
use harvest_app::cli::Cli;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    harvest_app::init_tracing();

    if let Err(e) = harvest_app::run(Cli::parse()).await {
        eprintln!("Error: {e:#}");
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}
