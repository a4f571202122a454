//! Replays an existing access log into a target file at roughly one line per
//! second, so `hitwatch watch` has something live to follow.

use anyhow::{Context, Result, bail};
use clap::Args;
use rand::Rng;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

#[derive(Args, Debug, Clone)]
pub struct EmitArgs {
    /// Log file to read lines from
    #[arg(long, default_value = "source.log")]
    pub source: PathBuf,

    /// Log file to append lines to
    #[arg(long, default_value = "target.log")]
    pub target: PathBuf,

    /// Shortest pause between lines
    #[arg(long, default_value_t = 500)]
    pub min_delay_ms: u64,

    /// Longest pause between lines
    #[arg(long, default_value_t = 1500)]
    pub max_delay_ms: u64,
}

pub fn run(args: EmitArgs) -> Result<()> {
    if args.min_delay_ms > args.max_delay_ms {
        bail!(
            "--min-delay-ms ({}) must not exceed --max-delay-ms ({})",
            args.min_delay_ms,
            args.max_delay_ms
        );
    }

    let lines = read_lines(&args.source)?;
    let mut target = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&args.target)
        .with_context(|| format!("failed to open {}", args.target.display()))?;

    tracing::info!(
        source = %args.source.display(),
        target = %args.target.display(),
        lines = lines.len(),
        "replaying log"
    );

    let mut rng = rand::rng();
    for line in &lines {
        writeln!(target, "{line}")?;
        target.flush()?;
        // Push the write to disk so file watchers see it straight away.
        target.sync_all()?;
        println!("{line}");

        let delay = rng.random_range(args.min_delay_ms..=args.max_delay_ms);
        thread::sleep(Duration::from_millis(delay));
    }

    Ok(())
}

fn read_lines(path: &Path) -> Result<Vec<String>> {
    let src = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    Ok(src.lines().map(str::trim_end).map(str::to_string).collect())
}
