use crate::cli::watch::args::WatchArgs;
use crate::cli::watch::constants::REPORT_SEPARATOR;
use crate::cli::watch::render::{ReportFormat, render_json, render_report};
use crate::conf::types::{ReportConfig, TailConfig};
use crate::conf::{ConfigError, HitwatchConfig, load_config};
use crate::ingest::{LineProcessor, LogTailer, TailOptions, follow_reader};
use crate::monitor::Monitor;
use crate::stats::{AlertParams, StatsAggregator, TimestampSource};
use anyhow::{Context, Result, anyhow};
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;
use std::thread;
use tokio::runtime::Builder;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

/// Resolves config from `args` and runs the monitor until Ctrl-C or end of input.
pub fn run(args: WatchArgs) -> Result<()> {
    let cfg = load_config(args.config.as_deref(), args.overrides())?;
    run_watch(cfg, args.format())
}

pub fn run_watch(cfg: HitwatchConfig, format: ReportFormat) -> Result<()> {
    let rt = Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("failed to build Tokio runtime")?;

    rt.block_on(watch_log(cfg, format))
}

async fn watch_log(cfg: HitwatchConfig, format: ReportFormat) -> Result<()> {
    let log_file = cfg.log_file.clone().ok_or(ConfigError::MissingLogFile)?;
    let threshold = cfg.alert.threshold;

    let mut monitor = Monitor::start(AlertParams {
        threshold,
        window_secs: cfg.alert.window_secs,
        timestamp_source: if cfg.alert.use_current_timestamps {
            TimestampSource::Ingestion
        } else {
            TimestampSource::Record
        },
    });

    tracing::info!(
        log_file = %log_file.display(),
        threshold,
        window_secs = cfg.alert.window_secs,
        "watching access log"
    );

    let mut ingest = spawn_ingest(
        &log_file,
        &cfg.tail,
        monitor.processor(),
        monitor.shutdown_signal(),
    )?;
    let reporter = spawn_reporter(
        monitor.aggregator(),
        cfg.report.clone(),
        threshold,
        format,
        monitor.shutdown_signal(),
    );

    let mut ingest_done = false;
    tokio::select! {
        res = tokio::signal::ctrl_c() => {
            res.context("failed to listen for Ctrl-C")?;
            tracing::info!("shutdown requested");
        }
        res = &mut ingest.done => {
            ingest_done = true;
            match res {
                Ok(Ok(())) => tracing::info!("input closed"),
                Ok(Err(e)) => tracing::error!(error = %e, "log ingestion failed"),
                Err(e) => tracing::error!(error = %e, "log ingestion task panicked"),
            }
        }
        res = monitor.evaluator_exited() => {
            return Err(anyhow!("alert evaluator stopped unexpectedly: {res:?}"));
        }
    }

    let aggregator = monitor.aggregator();
    monitor.shutdown().await;

    if !ingest_done && ingest.joinable {
        let _ = ingest.done.await;
    }
    let _ = reporter.await;

    // Final report so a short-lived run still shows its numbers.
    emit_report(&aggregator, &cfg.report, threshold, format);

    Ok(())
}

/// The running ingestion worker.
struct Ingest {
    done: JoinHandle<Result<()>>,
    // A worker blocked on stdin cannot observe shutdown, so it is never joined.
    joinable: bool,
}

fn spawn_ingest(
    log_file: &Path,
    tail: &TailConfig,
    processor: LineProcessor,
    shutdown: watch::Receiver<bool>,
) -> Result<Ingest> {
    if log_file == Path::new("-") {
        let (tx, rx) = oneshot::channel();
        thread::Builder::new()
            .name("hitwatch-stdin".into())
            .spawn(move || {
                let res = follow_reader(io::stdin().lock(), &processor, shutdown)
                    .context("failed to read stdin");
                let _ = tx.send(res);
            })
            .context("failed to spawn stdin reader")?;

        return Ok(Ingest {
            done: tokio::spawn(stdin_result(rx)),
            joinable: false,
        });
    }

    let tailer = LogTailer::open(
        log_file,
        &TailOptions {
            from_start: tail.from_start,
            poll_interval: tail.poll_interval(),
        },
    )?;

    Ok(Ingest {
        done: tokio::task::spawn_blocking(move || {
            tailer.run(&processor, shutdown)?;
            Ok(())
        }),
        joinable: true,
    })
}

/// The stdin reader's outcome. A dropped sender means the thread panicked.
pub(super) async fn stdin_result(rx: oneshot::Receiver<Result<()>>) -> Result<()> {
    rx.await
        .map_err(|_| anyhow!("stdin reader exited without a result"))?
}

fn spawn_reporter(
    aggregator: Arc<StatsAggregator>,
    report: ReportConfig,
    threshold: usize,
    format: ReportFormat,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let period = report.interval();
        let mut ticker = time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => emit_report(&aggregator, &report, threshold, format),
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
    })
}

fn emit_report(
    aggregator: &StatsAggregator,
    report: &ReportConfig,
    threshold: usize,
    format: ReportFormat,
) {
    let snapshot = aggregator.snapshot(report.top_sections);

    let out = match format {
        ReportFormat::Pretty { color } => {
            format!("{}{REPORT_SEPARATOR}", render_report(&snapshot, threshold, color))
        }
        ReportFormat::Json => match render_json(&snapshot) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!(error = %e, "failed to serialize report");
                return;
            }
        },
    };

    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{out}");
    let _ = stdout.flush();
}
