//! Text rendering of a spread analysis.

use spread_core::{SpreadAnalysis, Symbol};
use std::io::{self, Write};

/// Shortest round-trip form of a price, with a signed exponent of at least two
/// digits: `60000.0`, `0.1234`, `1.234e-05`, `1.5e+20`.
pub fn shortest(value: f64) -> String {
    let repr = format!("{:?}", value);
    match repr.split_once('e') {
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exp),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => repr,
    }
}

/// Write one symbol's analysis as the console block printed by the scanner.
///
/// Best buy/sell prices are fixed at 8 decimals; the listings use
/// [`shortest`].
pub fn write_report<W: Write>(
    out: &mut W,
    symbol: &Symbol,
    analysis: &SpreadAnalysis,
) -> io::Result<()> {
    writeln!(out, "{}: {:.2}% spread", symbol, analysis.spread_pct())?;
    writeln!(
        out,
        "  Best buy: {} at {:.8}",
        analysis.buy_venue, analysis.buy_price
    )?;
    writeln!(
        out,
        "  Best sell: {} at {:.8}",
        analysis.sell_venue, analysis.sell_price
    )?;

    writeln!(out, "  All prices:")?;
    for (venue, price) in analysis.prices_ascending() {
        writeln!(out, "    {:10} {}", venue, shortest(price))?;
    }

    if analysis.futures.is_empty() {
        return Ok(());
    }

    writeln!(out, "  Futures prices and funding rates:")?;
    for (venue, quote) in &analysis.futures {
        let funding = match quote.funding_rate {
            Some(rate) => format!("{:.6}", rate),
            None => "n/a".to_string(),
        };
        writeln!(
            out,
            "    {:10} {} (funding {})",
            venue.as_str(),
            shortest(quote.price),
            funding
        )?;
    }
    Ok(())
}
