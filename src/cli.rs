//! CLI definition and dispatch.

use chrono::Utc;
use clap::{ArgAction, Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;
use tracing::info;

use crate::adapters::binance_adapter::{BinanceAdapter, BinanceSettings};
use crate::adapters::console;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::yahoo_adapter::{YahooAdapter, YahooSettings};
use crate::domain::band_scan::{run_cycle, BandScanConfig, ScanEvent};
use crate::domain::classify::WhaleThresholds;
use crate::domain::config_validation::{validate_band_config, validate_whale_config};
use crate::domain::error::ScanError;
use crate::domain::frame::BandParams;
use crate::domain::scheduler::Scheduler;
use crate::domain::signal::ScoringParams;
use crate::domain::universe::parse_symbols;
use crate::domain::whale_scan::{run_scan, save_report, WhaleEvent, WhaleScanConfig};
use crate::ports::config_port::ConfigPort;

const DEFAULT_REPORT_PATH: &str = "reports/whale_scan_report.csv";

#[derive(Parser, Debug)]
#[command(name = "bandscan", version, about = "Bollinger band and RSI market scanners")]
pub struct Cli {
    /// INI configuration file; built-in defaults are used without one
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// More log output (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Poll Binance and print band-model buy signals
    Bands {
        /// Run a single cycle and exit
        #[arg(long, conflicts_with = "cycles")]
        once: bool,
        /// Stop after this many cycles
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        cycles: Option<u64>,
        /// Seconds between cycles
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        interval: Option<u64>,
    },
    /// Classify the watch-list by RSI and volume, saving accumulation matches
    Whale {
        /// CSV report destination
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Wait for ENTER before exiting
        #[arg(long)]
        pause: bool,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Bands {
            once,
            cycles,
            interval,
        } => run_bands(cli.config.as_deref(), once, cycles, interval),
        Command::Whale { output, pause } => {
            run_whale(cli.config.as_deref(), output.as_deref(), pause)
        }
    }
}

pub fn open_config(path: Option<&Path>) -> Result<FileConfigAdapter, ScanError> {
    match path {
        None => Ok(FileConfigAdapter::empty()),
        Some(path) => {
            FileConfigAdapter::from_file(path).map_err(|e| ScanError::ConfigParse {
                file: path.display().to_string(),
                reason: e.to_string(),
            })
        }
    }
}

pub fn load_config(path: Option<&Path>) -> Result<FileConfigAdapter, ExitCode> {
    open_config(path).map_err(|err| {
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

fn symbol_list(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<Option<Vec<String>>, ScanError> {
    config
        .get_string(section, key)
        .map(|list| {
            parse_symbols(&list).map_err(|e| ScanError::ConfigInvalid {
                section: section.into(),
                key: key.into(),
                reason: e.to_string(),
            })
        })
        .transpose()
}

pub fn build_band_config(config: &dyn ConfigPort) -> Result<BandScanConfig, ScanError> {
    validate_band_config(config)?;
    let defaults = BandScanConfig::default();

    Ok(BandScanConfig {
        params: BandParams {
            period: config.get_int("bands", "period", defaults.params.period as i64) as usize,
            stddev_mult_x100: (config.get_double("bands", "stddev_mult", 2.0) * 100.0).round()
                as u32,
            rsi_period: config.get_int("bands", "rsi_period", defaults.params.rsi_period as i64)
                as usize,
        },
        scoring: ScoringParams {
            min_hits: config.get_int("scoring", "min_hits", defaults.scoring.min_hits as i64)
                as usize,
            weight: config.get_int("scoring", "weight", defaults.scoring.weight as i64) as u32,
        },
        min_bars: config.get_int("bands", "min_bars", defaults.min_bars as i64) as usize,
        fallback_symbols: symbol_list(config, "binance", "fallback_symbols")?
            .unwrap_or(defaults.fallback_symbols),
    })
}

/// Command-line flags take precedence over `[bands]`.
pub fn build_scheduler(
    config: &dyn ConfigPort,
    once: bool,
    cycles: Option<u64>,
    interval: Option<u64>,
) -> Scheduler {
    let interval =
        interval.unwrap_or_else(|| config.get_int("bands", "poll_interval_secs", 30) as u64);
    Scheduler {
        interval: Duration::from_secs(interval),
        error_pause: Duration::from_secs(config.get_int("bands", "error_pause_secs", 10) as u64),
        max_cycles: if once { Some(1) } else { cycles },
    }
}

pub fn build_whale_config(config: &dyn ConfigPort) -> Result<WhaleScanConfig, ScanError> {
    validate_whale_config(config)?;
    let defaults = WhaleScanConfig::default();
    let thresholds = WhaleThresholds::default();

    Ok(WhaleScanConfig {
        watch_list: symbol_list(config, "whale", "watch_list")?.unwrap_or(defaults.watch_list),
        rsi_period: config.get_int("whale", "rsi_period", defaults.rsi_period as i64) as usize,
        min_bars: config.get_int("whale", "min_bars", defaults.min_bars as i64) as usize,
        thresholds: WhaleThresholds {
            oversold: config.get_double("whale", "oversold", thresholds.oversold),
            accumulation_max: config.get_double(
                "whale",
                "accumulation_max",
                thresholds.accumulation_max,
            ),
            overbought: config.get_double("whale", "overbought", thresholds.overbought),
            volume_factor: config.get_double("whale", "volume_factor", thresholds.volume_factor),
        },
        pacing: Duration::from_millis(config.get_int("whale", "pacing_ms", 800) as u64),
    })
}

pub fn resolve_report_path(config: &dyn ConfigPort, output: Option<&Path>) -> PathBuf {
    match output {
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(
            config
                .get_nonempty("whale", "report_path")
                .unwrap_or_else(|| DEFAULT_REPORT_PATH.to_string()),
        ),
    }
}

fn run_bands(
    config_path: Option<&Path>,
    once: bool,
    cycles: Option<u64>,
    interval: Option<u64>,
) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let scan_config = match build_band_config(&adapter) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let scheduler = build_scheduler(&adapter, once, cycles, interval);

    let binance = match BinanceAdapter::new(BinanceSettings::from_config(&adapter)) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    info!(
        base_url = %binance.settings().base_url,
        interval = %binance.settings().interval,
        "band scanner started"
    );

    let result = scheduler.run(
        |cycle| {
            info!(cycle, "starting cycle");
            let report = run_cycle(&binance, &binance, &scan_config, &mut |event| match event {
                ScanEvent::Universe { symbols, fallback } => {
                    println!("{}", console::scanning_banner(symbols.len(), fallback));
                }
                ScanEvent::Hit(hit) => println!("{}", console::hit_row(hit)),
                ScanEvent::Skipped { .. } => {}
                ScanEvent::Failed { symbol, error } => {
                    println!("{}", console::symbol_failure_row(symbol, error));
                }
            });

            if report.signals_found() == 0 {
                println!("{}", console::waiting_row(Utc::now()));
            }
            println!("{}", console::rule());

            match report.into_cycle_error() {
                Some(e) => {
                    println!("{}", console::cycle_failure_row(&e));
                    Err(e)
                }
                None => Ok(()),
            }
        },
        std::thread::sleep,
    );

    match result {
        Ok(stats) => {
            info!(cycles = stats.cycles, failures = stats.failures, "band scanner stopped");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_whale(config_path: Option<&Path>, output: Option<&Path>, pause: bool) -> ExitCode {
    let result = whale_pipeline(config_path, output);

    let code = match &result {
        Ok(()) => {
            println!("\n{}", console::whale_footer());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            e.into()
        }
    };

    if pause {
        wait_for_enter(if result.is_ok() {
            "Press ENTER to close the terminal..."
        } else {
            "Press ENTER to exit..."
        });
    }
    code
}

fn whale_pipeline(config_path: Option<&Path>, output: Option<&Path>) -> Result<(), ScanError> {
    let adapter = open_config(config_path)?;
    let scan_config = build_whale_config(&adapter)?;
    let report_path = resolve_report_path(&adapter, output);
    let yahoo = YahooAdapter::new(YahooSettings::from_config(&adapter))?;

    println!("{}", console::whale_header(Utc::now()));

    let report = run_scan(
        &yahoo,
        &scan_config,
        &mut |event| match event {
            WhaleEvent::Reading(reading) => println!("{}", console::whale_row(reading)),
            WhaleEvent::Skipped { .. } => {}
            WhaleEvent::Failed { ticker, error } => {
                println!("{}", console::whale_failure_row(ticker, error));
            }
        },
        &mut |pause| std::thread::sleep(pause),
    );
    info!(
        readings = report.readings.len(),
        matches = report.matches.len(),
        skipped = report.skipped.len(),
        failures = report.failures.len(),
        "watch-list scan finished"
    );

    match save_report(&CsvReportAdapter, &report.matches, &report_path) {
        Ok(outcome) => {
            println!("\n{}", console::save_outcome_line(&outcome));
            Ok(())
        }
        Err(e) => {
            println!("\n{}", console::save_error_line(&e));
            Err(e)
        }
    }
}

fn wait_for_enter(prompt: &str) {
    println!("{prompt}");
    let _ = io::stdout().flush();
    let mut line = String::new();
    let _ = io::stdin().lock().read_line(&mut line);
}
