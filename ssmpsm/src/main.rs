use std::process::ExitCode;

use clap::Parser;
use dotenvy::dotenv;
use tracing_subscriber::EnvFilter;

use ssmpsm::{app, cli::Args, output::Output};

fn setup_logging(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)); // RUST_LOG wins

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .try_init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let _ = dotenv();

    let args = Args::parse();
    setup_logging(args.log_level());

    let output = Output::detect(args.no_color, args.output_format());

    match app::run(args, &output).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!(kind = err.kind(), "Invocation failed");
            output.print_error(&err);
            err.exit_code()
        }
    }
}
