use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use diffcover::{diff, filter, profile, report};

/// diffcover — gate builds on test coverage of the lines a patch added.
///
/// Filters a Go coverage profile down to the blocks that touch lines added
/// in a unified diff, writes the filtered profile, and fails when the
/// covered-statement percentage falls below the threshold.
#[derive(Parser)]
#[command(name = "diffcover", version, about)]
struct Cli {
    /// Path to a unified diff (e.g. `git diff main...HEAD`).
    diff: PathBuf,

    /// Path to a Go coverage profile (`go test -coverprofile=...`).
    coverage: PathBuf,

    /// Output path for the filtered coverage profile.
    output: PathBuf,

    /// Minimum diff coverage percentage required to pass, e.g. 80.
    threshold: f64,

    /// Emit the summary as JSON instead of the text report line.
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    match run(&Cli::parse()) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<bool> {
    let changed = diff::parse_file(&cli.diff).context("Failed to read diff")?;
    let blocks = profile::parse_file(&cli.coverage).context("Failed to read coverage profile")?;

    let kept = filter::filter_blocks(blocks, &changed);
    let summary = filter::summarize(&kept);

    profile::write_file(&cli.output, &kept).context("Failed to write filtered profile")?;

    if cli.json {
        let rendered =
            report::json(&summary, cli.threshold).context("Failed to render JSON report")?;
        println!("{rendered}");
    } else {
        println!("{}", report::text(&summary));
    }

    let passed = summary.passes(cli.threshold);
    if !passed {
        eprintln!("{}", report::failure(&summary, cli.threshold));
    }
    Ok(passed)
}
