//! Console row formatting.
//!
//! Every function returns a finished line; callers decide where to print
//! it. Colour comes from [`paint`], which is stateless, so nothing needs
//! initialising before the first row.

use crate::domain::band_scan::SignalHit;
use crate::domain::classify::Status;
use crate::domain::error::ScanError;
use crate::domain::whale_scan::{AssetReading, SaveOutcome};
use chrono::{DateTime, Local, Utc};
use colored::Colorize;

const RULE_WIDTH: usize = 100;
const BANNER_WIDTH: usize = 75;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Info,
    Success,
    Warning,
    Error,
    Rule,
    Plain,
    Emphasis,
}

pub fn paint(tone: Tone, text: &str) -> String {
    match tone {
        Tone::Info => text.cyan().to_string(),
        Tone::Success => text.green().to_string(),
        Tone::Warning => text.yellow().to_string(),
        Tone::Error => text.red().to_string(),
        Tone::Rule => text.blue().to_string(),
        Tone::Plain => text.white().to_string(),
        Tone::Emphasis => text.bold().to_string(),
    }
}

pub fn status_tone(status: Status) -> Tone {
    match status {
        Status::Oversold => Tone::Error,
        Status::WhaleIn => Tone::Success,
        Status::Overbought => Tone::Warning,
        Status::Neutral => Tone::Plain,
    }
}

fn clock(time: DateTime<Utc>) -> String {
    time.with_timezone(&Local).format("%H:%M:%S").to_string()
}

pub fn scanning_banner(count: usize, fallback: bool) -> String {
    let source = if fallback { "fallback list" } else { "by 24h volume" };
    paint(Tone::Info, &format!("Scanning {count} symbols ({source})..."))
}

pub fn hit_row(hit: &SignalHit) -> String {
    paint(
        Tone::Success,
        &format!(
            "{:<12} | {:<12} | {:<10} | {:<6} | ${:.4} | BUY SIGNAL",
            clock(hit.time),
            hit.symbol,
            hit.model.code(),
            hit.score,
            hit.price
        ),
    )
}

pub fn waiting_row(now: DateTime<Utc>) -> String {
    paint(
        Tone::Warning,
        &format!("{:<12} | {:<12} | {:<44}", clock(now), "SCANNING", "WAITING FOR SIGNAL..."),
    )
}

pub fn symbol_failure_row(symbol: &str, error: &ScanError) -> String {
    paint(Tone::Error, &format!("{symbol} processing error: {error}"))
}

pub fn cycle_failure_row(error: &ScanError) -> String {
    paint(Tone::Error, &format!("Loop error: {error}"))
}

pub fn rule() -> String {
    paint(Tone::Rule, &"─".repeat(RULE_WIDTH))
}

pub fn whale_header(now: DateTime<Utc>) -> String {
    let bar = "=".repeat(BANNER_WIDTH);
    let title = format!("[{}] QUANT PULSE DATA: DEEP MARKET ANALYSIS", clock(now));
    format!(
        "{}\n{}\n{}\n",
        paint(Tone::Info, &bar),
        paint(Tone::Info, &paint(Tone::Emphasis, &title)),
        paint(Tone::Info, &bar)
    )
}

pub fn whale_row(reading: &AssetReading) -> String {
    let status = format!("{:35}", reading.status.to_string());
    format!(
        "{} | {} | RSI: {:4.1} | {}",
        paint(Tone::Emphasis, &format!("{:10}", reading.ticker)),
        paint(status_tone(reading.status), &status),
        reading.rsi,
        reading.status.note()
    )
}

pub fn whale_failure_row(ticker: &str, error: &ScanError) -> String {
    paint(Tone::Error, &format!("[ERROR] {ticker}: {error}"))
}

pub fn save_outcome_line(outcome: &SaveOutcome) -> String {
    match outcome {
        SaveOutcome::Saved(path) => format!(
            "{} Report saved to: {}",
            paint(Tone::Success, &paint(Tone::Emphasis, "[SUCCESS]")),
            path.display()
        ),
        SaveOutcome::NothingToSave => paint(
            Tone::Warning,
            "[INFO] Scan complete. No whale activity detected.",
        ),
    }
}

pub fn save_error_line(error: &ScanError) -> String {
    match error {
        ScanError::ReportLocked { .. } => {
            paint(Tone::Error, "[ERROR] Close the CSV file before running!")
        }
        other => paint(Tone::Error, &format!("[ERROR] {other}")),
    }
}

pub fn whale_footer() -> String {
    let bar = "=".repeat(BANNER_WIDTH);
    format!(
        "{}\n{}\n{}",
        paint(Tone::Info, &bar),
        paint(Tone::Emphasis, "PROCESS COMPLETE. DATA SECURED."),
        paint(Tone::Info, &bar)
    )
}
