//! groupcensus - Member-count report for mail-enabled groups
//!
//! Lists Distribution Lists and/or Microsoft 365 groups from Microsoft Entra
//! ID, counts each group's transitive members, and writes a CSV report with
//! a size-band summary.

use clap::Parser;

mod commands;
mod error;
mod logging;
mod output;

use error::CliResult;

/// groupcensus - Mail-enabled group size report
#[derive(Parser, Debug)]
#[command(name = "groupcensus")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    report: commands::report::ReportArgs,

    /// Increase log detail (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let result = run(cli).await;

    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            tracing::debug!(exit_code = e.exit_code(), "Run failed");
            e.print();
            std::process::exit(e.exit_code());
        }
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    commands::report::execute(cli.report).await
}
