use crate::demo::{run_demo, run_maturity_report, DemoArgs, MaturityReportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use maturix::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Maturix",
    about = "Demonstrate and run the digital maturity assessment service from the command line",
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
    /// Work with maturity scorecards outside the HTTP surface
    Maturity {
        #[command(subcommand)]
        command: MaturityCommand,
    },
    /// Run an end-to-end CLI demo covering the evaluation workflow
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum MaturityCommand {
    /// Compute a scorecard from a responses export without persisting anything
    Report(MaturityReportArgs),
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
        Command::Maturity {
            command: MaturityCommand::Report(args),
        } => run_maturity_report(args),
        Command::Demo(args) => run_demo(args),
    }
}
