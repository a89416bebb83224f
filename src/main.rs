use boefje::{cli, errors};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();

    // Initialize logging
    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if cli.json_logs {
        subscriber.json().init();
    } else {
        subscriber.with_ansi(!cli.no_color).init();
    }

    info!(
        version = env!("CARGO_PKG_VERSION"),
        git_hash = option_env!("GIT_HASH").unwrap_or("dev"),
        built = option_env!("BUILD_TIMESTAMP").unwrap_or("unknown"),
        "boefje starting"
    );

    let result = match cli.command {
        cli::Commands::Run(args) => cli::run::handle_run(args).await,
        cli::Commands::Inspect(args) => cli::inspect::handle_inspect(args).await,
        cli::Commands::Validate(args) => cli::validate::handle_validate(args).await,
    };

    if let Err(e) = result {
        let class: errors::ErrorClassification = e.classify();
        eprintln!("Error: {}", e);
        tracing::debug!(error_type = class.error_type, stage = %class.stage, "Exiting with error");
        std::process::exit(e.exit_code());
    }
}
