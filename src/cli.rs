use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::commands;
use crate::config::DEFAULT_TIME_COLUMN;

#[derive(Debug, Parser)]
#[command(
    name = "traffic-report",
    version,
    about = "Reconcile overlapping traffic-counter CSV snapshots and render a report"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Merge CSV fragments into one canonical series and write it as CSV.
    Reconcile {
        /// CSV fragment files, one per snapshot.
        #[arg(required = true)]
        csv_paths: Vec<String>,
        /// Write the merged CSV here instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,
        /// Header field carrying the per-row timestamp.
        #[arg(long, default_value = DEFAULT_TIME_COLUMN)]
        time_column: String,
    },
    /// Reconcile fragments and render the Markdown (and HTML) report.
    Report {
        /// CSV fragment files, one per snapshot.
        #[arg(required = true)]
        csv_paths: Vec<String>,
        /// Report output directory (default: <YYYY-MM-DD>_report).
        #[arg(long)]
        output_dir: Option<String>,
        /// Static assets copied beside the report.
        #[arg(long)]
        resources_dir: Option<String>,
        /// Pandoc binary name or path.
        #[arg(long)]
        pandoc_bin: Option<String>,
        /// Report title.
        #[arg(long)]
        title: Option<String>,
        /// Header field carrying the per-row timestamp.
        #[arg(long)]
        time_column: Option<String>,
        /// Write only the Markdown report, skipping the pandoc invocation.
        #[arg(long)]
        skip_html: bool,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Reconcile {
            csv_paths,
            out,
            time_column,
        } => commands::reconcile::run(&commands::reconcile::ReconcileOptions {
            csv_paths,
            out,
            time_column,
        }),
        Command::Report {
            csv_paths,
            output_dir,
            resources_dir,
            pandoc_bin,
            title,
            time_column,
            skip_html,
        } => commands::report::run(&commands::report::ReportOptions {
            csv_paths,
            output_dir,
            resources_dir,
            pandoc_bin,
            title,
            time_column,
            skip_html,
        }),
    }
}
