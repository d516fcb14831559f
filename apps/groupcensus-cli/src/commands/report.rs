//! Report command - Count members of mail-enabled groups and write the CSV report

use crate::error::{CliError, CliResult};
use crate::output::{print_header, print_info, print_success, print_summary, print_warning};
use clap::{ArgGroup, Args};
use groupcensus_core::{
    render_summary, run_census, FetchStrategy, ProcessingCap, ReportMode, RunOptions, RunOutcome,
    DEFAULT_TOP_N,
};
use groupcensus_entra::{EntraConfig, EntraDirectory};
use std::path::PathBuf;

/// Arguments for the report command
#[derive(Args, Debug)]
#[command(group(ArgGroup::new("mode").args(["dl", "m365", "all"]).multiple(false)))]
pub struct ReportArgs {
    /// Report Distribution Lists (default)
    #[arg(long)]
    pub dl: bool,

    /// Report Microsoft 365 groups
    #[arg(long)]
    pub m365: bool,

    /// Report both group types
    #[arg(long)]
    pub all: bool,

    /// Process at most N groups (0 = unlimited)
    #[arg(long, value_name = "N", default_value_t = 0)]
    pub test_limit: usize,

    /// Directory the CSV report is written to
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Number of largest groups listed in the summary
    #[arg(long, value_name = "N", default_value_t = DEFAULT_TOP_N)]
    pub top: usize,

    /// Member-count lookups in flight at once
    #[arg(
        long,
        value_name = "N",
        default_value_t = 1,
        value_parser = clap::value_parser!(u8).range(1..=10)
    )]
    pub concurrency: u8,

    /// Filter by group type in the directory query instead of locally
    #[arg(long)]
    pub server_filter: bool,

    /// Over-fetch factor for capped single-type runs without --server-filter
    #[arg(
        long,
        value_name = "N",
        default_value_t = 3,
        value_parser = clap::value_parser!(u16).range(1..)
    )]
    pub over_fetch_multiplier: u16,
}

impl ReportArgs {
    /// Validates the arguments and builds the run options.
    pub fn run_options(&self) -> CliResult<RunOptions> {
        let mode = ReportMode::from_flags(self.dl, self.m365, self.all)?;

        if !self.output_dir.is_dir() {
            return Err(CliError::InvalidArguments(format!(
                "output directory '{}' does not exist",
                self.output_dir.display()
            )));
        }

        let strategy = if self.server_filter {
            FetchStrategy::ServerSide
        } else {
            FetchStrategy::ClientSide {
                multiplier: usize::from(self.over_fetch_multiplier),
            }
        };

        Ok(RunOptions {
            mode,
            cap: ProcessingCap::new(self.test_limit),
            strategy,
            concurrency: usize::from(self.concurrency),
            top_n: self.top,
            output_dir: self.output_dir.clone(),
        })
    }
}

/// Execute the report command
pub async fn execute(args: ReportArgs) -> CliResult<()> {
    let options = args.run_options()?;
    let (config, credentials) = EntraConfig::from_env()?;
    let directory = EntraDirectory::new(&config, credentials)
        .map_err(|e| CliError::Config(format!("failed to create Graph client: {e}")))?;

    print_header(&format!("Group Member Report: {}", options.mode));
    match options.cap.limit() {
        Some(limit) => print_info(&format!("Processing at most {limit} groups")),
        None => print_info("Processing all matching groups"),
    }

    match run_census(&directory, &options).await? {
        RunOutcome::NothingToProcess => {
            print_warning("No groups matched the selection; no report written.");
        }
        RunOutcome::Completed(report) => {
            println!();
            print_summary(&render_summary(&report.summary, options.mode));
            println!();
            print_success(&format!(
                "Report written to {}",
                report.artifact_path.display()
            ));
        }
    }

    Ok(())
}
