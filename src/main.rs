use std::process;
use textchain::{
    cli::{Cli, CliHandler},
    error::ChainError,
};
use tracing_subscriber::EnvFilter;

fn init_logging(default_filter: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() {
    // Parse command line arguments
    let cli = match Cli::parse_args() {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("Argument parsing failed: {}", e);
            process::exit(2);
        }
    };

    init_logging(cli.log_filter());

    let handler = CliHandler::new(cli);

    let exit_code = match handler.run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Analysis failed: {}", e);
            match e {
                ChainError::InvalidArguments(_) | ChainError::NoInput => 2,
                ChainError::LlmClientError(_) => 5,
                _ => 1,
            }
        }
    };

    process::exit(exit_code);
}
