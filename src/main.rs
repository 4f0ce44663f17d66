use std::process::ExitCode;

use clap::Parser;

use spark_notify::cli::{self, Cli, Commands};
use spark_notify::config::ConfigLoader;
use spark_notify::logger::init_logger;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // The logger is not up yet, so early failures go to stderr. A `run`
    // still exits 0: notification problems never fail the pipeline.
    let settings = match ConfigLoader::new(cli.config.as_deref()).load() {
        Ok(settings) => settings,
        Err(error) => {
            eprintln!("configuration error: {error}");
            return early_exit(&cli);
        }
    };

    let mut logger_config = settings.logger.clone();
    if let Some(level) = cli.log_level_override() {
        logger_config.level = level.to_string();
    }
    if let Err(error) = init_logger(&logger_config) {
        eprintln!("logger initialization error: {error}");
        return early_exit(&cli);
    }

    cli::execute_command(&cli, settings).await
}

fn early_exit(cli: &Cli) -> ExitCode {
    match cli.command {
        Commands::Run { .. } => ExitCode::SUCCESS,
        Commands::Check => ExitCode::FAILURE,
    }
}
