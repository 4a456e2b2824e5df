mod error_presentation;
mod logging;
mod progress;

use std::{fs, path::PathBuf, process::ExitCode};

use clap::{ArgAction, Parser};
use dumpconv_core::{
    ConvertConfig, DEFAULT_INPUT_PATH, DEFAULT_OUTPUT_PATH, ImportStats, InsertErrorMode,
    Orchestrator,
};
use dumpconv_dialect_mysql::MysqlDialect;
use dumpconv_dialect_sqlite::SqliteDialect;
use error_presentation::{CliError, CliResult, exit_code, render_runtime_error};
use indicatif::ProgressBar;
use tracing::debug;

/// Convert a mysqldump file into a fresh SQLite database.
#[derive(Debug, Parser)]
#[command(name = "dumpconv", version)]
struct Cli {
    /// mysqldump file to read.
    #[arg(value_name = "INPUT", default_value = DEFAULT_INPUT_PATH)]
    input: PathBuf,

    /// SQLite database to create; an existing file at this path is replaced.
    #[arg(short, long, value_name = "PATH", default_value = DEFAULT_OUTPUT_PATH)]
    output: PathBuf,

    /// Report failed inserts and drops instead of only counting them.
    #[arg(long)]
    strict_inserts: bool,

    /// Skip input lines starting with PREFIX. Replaces the built-in mysqldump
    /// list; repeat for several prefixes.
    #[arg(long = "deny-prefix", value_name = "PREFIX", action = ArgAction::Append)]
    deny_prefixes: Vec<String>,

    /// Do not draw a progress bar.
    #[arg(long)]
    no_progress: bool,

    /// Log more detail (-v info, -vv debug, -vvv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn convert_config(&self) -> CliResult<ConvertConfig> {
        let insert_errors = if self.strict_inserts {
            InsertErrorMode::Report
        } else {
            InsertErrorMode::Lenient
        };
        let config =
            ConvertConfig::new(&self.input, &self.output).with_insert_errors(insert_errors);

        if self.deny_prefixes.is_empty() {
            return Ok(config);
        }
        if self
            .deny_prefixes
            .iter()
            .any(|prefix| prefix.trim().is_empty())
        {
            return Err(CliError::EmptyDenyPrefix);
        }
        Ok(config.with_denylist_prefixes(self.deny_prefixes.clone()))
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let input_len = fs::metadata(&cli.input)
        .map(|metadata| metadata.len())
        .ok();
    let progress = progress::byte_progress(input_len, !cli.no_progress);
    logging::init(cli.verbose, progress.clone());

    match run(&cli, &progress) {
        Ok(stats) => {
            progress.finish_and_clear();
            print_summary(&cli, &stats);
            ExitCode::SUCCESS
        }
        Err(error) => {
            progress.abandon();
            let code = exit_code(&error);
            eprintln!("{}", render_runtime_error(error));
            ExitCode::from(code)
        }
    }
}

fn run(cli: &Cli, progress: &ProgressBar) -> CliResult<ImportStats> {
    let config = cli.convert_config()?;
    debug!(?config, "resolved configuration");

    let stats = Orchestrator::new(&MysqlDialect, &SqliteDialect)
        .run_with_progress(&config, |bytes| progress.set_position(bytes))?;
    Ok(stats)
}

fn print_summary(cli: &Cli, stats: &ImportStats) {
    println!(
        "converted `{}` into `{}`",
        cli.input.display(),
        cli.output.display()
    );
    println!("{stats}");

    let suppressed = stats.suppressed_failures();
    if suppressed > 0 {
        println!(
            "{suppressed} failed statement(s) were discarded without being reported; \
             their rows are missing from the output. Rerun with --strict-inserts to see them."
        );
    }
}
