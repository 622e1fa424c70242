use crate::report::{run_worklist_report, WorklistReportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use scan_triage::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Scan Triage Dashboard",
    about = "Serve and inspect the AI-assisted imaging triage worklist",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Print the prioritized worklist built from the configured seed files
    Worklist(WorklistReportArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Worklist(args) => run_worklist_report(args),
    }
}
