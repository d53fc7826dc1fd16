pub mod args;
pub mod reporter;

pub use args::{Cli, OutputFormat};
pub use reporter::ReportFormatter;

use crate::analyzer::ChainOrchestrator;
use crate::error::ChainError;
use std::io::{self, Read};
use tracing::{debug, info};

pub struct CliHandler {
    cli: Cli,
}

impl CliHandler {
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    pub async fn run(&self) -> Result<i32, ChainError> {
        // Step 1: Read the text from the argument or stdin
        let text = match self.cli.text {
            Some(ref text) => text.clone(),
            None => self.read_stdin()?,
        };
        if text.trim().is_empty() {
            return Err(ChainError::NoInput);
        }
        debug!(bytes = text.len(), "read input text");

        // Step 2: Build the completion client and orchestrator
        let config = self.cli.build_llm_config();
        let orchestrator = ChainOrchestrator::new(config, self.cli.max_concurrent)?;
        info!("{}", orchestrator.get_model_info());

        // Step 3: Run the chain
        let request = self.cli.build_request(text);
        let run = orchestrator.analyze_with_diagnostics(&request).await;

        // Step 4: Display the result
        let formatter = ReportFormatter::new(&self.cli);
        println!("{}", formatter.format_run(&run)?);

        Ok(0)
    }

    fn read_stdin(&self) -> Result<String, ChainError> {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    }
}
