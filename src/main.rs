// =============================================================================
// Stock Verdict — Main Entry Point
// =============================================================================
//
// Reads `<SYMBOL>.json` daily-bar files from a directory, pushes every load
// through the shared fetch queue, and prints one JSON report per symbol:
// detected splits, the full analysis, and the display signals.
//
// Usage: stock-verdict [BARS_DIR]   (falls back to $VERDICT_BARS_DIR, then ".")
// =============================================================================

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use parking_lot::Mutex;
use serde::Serialize;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use stock_verdict::{
    analyze_with, detect_and_adjust, detect_signals_with, validate_bars, AnalysisConfig,
    DailyBar, FetchQueue, Signal, SplitEvent, StockAnalysis,
};

#[derive(Debug, Serialize)]
struct SymbolReport {
    symbol: String,
    bars: usize,
    splits: Vec<SplitEvent>,
    analysis: Option<StockAnalysis>,
    signals: Vec<Signal>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config_path =
        std::env::var("VERDICT_CONFIG").unwrap_or_else(|_| "verdict_config.json".to_string());
    let mut config = AnalysisConfig::load(&config_path).unwrap_or_else(|e| {
        warn!(error = %e, path = %config_path, "Failed to load config, using defaults");
        AnalysisConfig::default()
    });

    // Local files need no upstream spacing; allow overriding it from env.
    if let Ok(raw) = std::env::var("VERDICT_FETCH_INTERVAL_MS") {
        match raw.trim().parse::<u64>() {
            Ok(ms) => config.fetch_interval_ms = ms,
            Err(e) => warn!(error = %e, value = %raw, "Ignoring invalid VERDICT_FETCH_INTERVAL_MS"),
        }
    }
    let config = Arc::new(config);

    let bars_dir = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("VERDICT_BARS_DIR").ok())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));

    // ── 2. Discover symbol files ─────────────────────────────────────────
    let files = symbol_files(&bars_dir)?;
    if files.is_empty() {
        warn!(dir = %bars_dir.display(), "No <SYMBOL>.json files found");
        return Ok(());
    }
    info!(dir = %bars_dir.display(), symbols = files.len(), "Analysing symbols");

    // ── 3. Load through the fetch queue, analyse concurrently ────────────
    let queue = Arc::new(FetchQueue::from_millis(config.fetch_interval_ms));
    let reports: Arc<Mutex<Vec<SymbolReport>>> = Arc::new(Mutex::new(Vec::new()));

    let mut handles = Vec::with_capacity(files.len());
    for (symbol, path) in files {
        let queue = queue.clone();
        let config = config.clone();
        let reports = reports.clone();
        handles.push(tokio::spawn(async move {
            let loaded = queue.run(|| load_bars(path)).await;
            match loaded.and_then(|bars| build_report(&symbol, &bars, &config)) {
                Ok(report) => reports.lock().push(report),
                Err(e) => error!(symbol = %symbol, error = %e, "Skipping symbol"),
            }
        }));
    }
    for handle in handles {
        if let Err(e) = handle.await {
            error!(error = %e, "Analysis task panicked");
        }
    }

    // ── 4. Emit ──────────────────────────────────────────────────────────
    let mut reports = std::mem::take(&mut *reports.lock());
    reports.sort_by(|a, b| a.symbol.cmp(&b.symbol));
    for report in &reports {
        println!("{}", serde_json::to_string_pretty(report)?);
    }

    let stats = queue.snapshot();
    info!(
        reported = reports.len(),
        fetched = stats.completed,
        waited_ms = stats.total_wait_ms,
        "Done"
    );
    Ok(())
}

fn symbol_files(dir: &Path) -> anyhow::Result<Vec<(String, PathBuf)>> {
    let mut files = Vec::new();
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read bars directory {}", dir.display()))?;
    for entry in entries {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            files.push((stem.to_uppercase(), path));
        }
    }
    files.sort();
    Ok(files)
}

async fn load_bars(path: PathBuf) -> anyhow::Result<Vec<DailyBar>> {
    let raw = tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse {}", path.display()))
}

fn build_report(
    symbol: &str,
    bars: &[DailyBar],
    config: &AnalysisConfig,
) -> anyhow::Result<SymbolReport> {
    validate_bars(bars).with_context(|| format!("{symbol}: invalid bar series"))?;

    let adjusted = detect_and_adjust(bars, &config.splits);
    Ok(SymbolReport {
        symbol: symbol.to_string(),
        bars: adjusted.bars.len(),
        analysis: analyze_with(&adjusted.bars, config),
        signals: detect_signals_with(&adjusted.bars, config),
        splits: adjusted.events,
    })
}
