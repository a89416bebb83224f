use clap::{Parser, Subcommand, Args};

#[derive(Parser)]
#[command(name = "boefje", version, about = "Run an external scanner for a boefje task and relay its output")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch a task, run the scanner and report the result
    Run(RunArgs),
    /// Show the target and scanner command for a task without running it
    Inspect(InspectArgs),
    /// Validate a configuration file
    Validate(ValidateArgs),
}

#[derive(Args, Clone, Debug, Default)]
pub struct ScannerArgs {
    /// YAML configuration file
    #[arg(short, long, env = "BOEFJE_CONFIG")]
    pub config: Option<String>,

    /// Scanner profile: nikto, template
    #[arg(long)]
    pub scanner: Option<String>,

    /// Scanner executable
    #[arg(long)]
    pub program: Option<String>,

    /// Directory for the scanner output file
    #[arg(long)]
    pub work_dir: Option<String>,
}

#[derive(Args, Clone, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub scanner: ScannerArgs,

    /// Report here when the task itself cannot be fetched
    #[arg(long)]
    pub output_url: Option<String>,

    /// Keep the scanner output file after reporting
    #[arg(long)]
    pub keep_output: bool,

    /// Kill the scanner after this many seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Task input URL
    pub input_url: String,
}

#[derive(Args, Clone, Debug)]
pub struct InspectArgs {
    #[command(flatten)]
    pub scanner: ScannerArgs,

    /// Task input URL
    pub input_url: String,
}

#[derive(Args, Clone, Debug)]
pub struct ValidateArgs {
    /// Config file to validate
    pub config: String,
}
