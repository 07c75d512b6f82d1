//! Scan loop: analyze each symbol in turn and print the ones above threshold.

use crate::report;
use spread_core::Symbol;
use spread_engine::SymbolAnalyzer;
use std::io::{self, Write};
use tracing::{info, warn};

/// Outcome counters for one scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub scanned: usize,
    pub invalid: usize,
    pub without_data: usize,
    pub reported: usize,
}

impl RunSummary {
    pub fn found_any(&self) -> bool {
        self.reported > 0
    }
}

/// Command-line symbols, or the configured defaults when none were given.
pub fn resolve_symbols(args: Vec<String>, defaults: &[String]) -> Vec<String> {
    if args.is_empty() {
        defaults.to_vec()
    } else {
        args
    }
}

pub struct Driver<A> {
    analyzer: A,
    threshold: f64,
}

impl<A: SymbolAnalyzer> Driver<A> {
    /// `threshold_pct` is in percent; 1.0 reports spreads of 1% and above.
    pub fn new(analyzer: A, threshold_pct: f64) -> Self {
        Self {
            analyzer,
            threshold: threshold_pct / 100.0,
        }
    }

    /// Threshold as a fraction.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Scan `symbols` sequentially, writing notices and reports to `out`.
    pub async fn run<W: Write>(&self, symbols: &[String], out: &mut W) -> io::Result<RunSummary> {
        let mut summary = RunSummary::default();
        info!(
            "Scanning {} symbols, threshold {:.4}",
            symbols.len(),
            self.threshold
        );

        for raw in symbols {
            let symbol = match Symbol::parse(raw) {
                Ok(symbol) => symbol,
                Err(e) => {
                    warn!("Skipping {:?}: {}", raw, e);
                    writeln!(out, "Invalid symbol {}: expected BASE/QUOTE", raw)?;
                    summary.invalid += 1;
                    continue;
                }
            };
            summary.scanned += 1;

            let Some(analysis) = self.analyzer.analyze(&symbol).await else {
                writeln!(out, "No price data available for {}", symbol)?;
                summary.without_data += 1;
                continue;
            };

            if analysis.meets(self.threshold) {
                report::write_report(out, &symbol, &analysis)?;
                summary.reported += 1;
            } else {
                info!(
                    "{}: {:.2}% spread below threshold",
                    symbol,
                    analysis.spread_pct()
                );
            }
        }

        if !summary.found_any() {
            writeln!(out, "No opportunities above threshold")?;
        }
        out.flush()?;

        info!(
            "Scan complete: {} scanned, {} reported, {} without data, {} invalid",
            summary.scanned, summary.reported, summary.without_data, summary.invalid
        );
        Ok(summary)
    }
}
