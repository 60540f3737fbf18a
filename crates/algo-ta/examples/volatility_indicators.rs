//! Volatility Indicator Examples
//!
//! ATR in each of its units, a moving-average envelope and the Chandelier
//! exit stops built on ATR.
//!
//! Run with: `cargo run --example volatility_indicators`

use algo_ta::indicators::{Atr, AtrUnit, Chandelier, Envelope};
use algo_ta::series::{Bar, Series};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Hourly bars: a rally that rolls over
    let closes = [
        100.0, 101.2, 102.5, 103.1, 104.8, 105.2, 106.9, 107.4, 108.0, 107.1, 105.6, 104.2, 103.0,
        101.8, 100.9, 99.5, 98.7, 99.4, 100.2, 99.0,
    ];
    let mut prev = closes[0];
    let series = Series::from_bars(closes.iter().enumerate().map(|(i, &close)| {
        let bar = Bar::new(
            i as i64 * 3_600,
            prev,
            f64::max(prev, close) + 0.6,
            f64::min(prev, close) - 0.6,
            close,
            5_000.0,
        );
        prev = close;
        bar
    }))?;

    let units = [
        AtrUnit::Regular,
        AtrUnit::Percentage,
        AtrUnit::Ticks { tick_size: 0.25 },
        AtrUnit::Currency {
            point_value: 50.0,
            position_size: 2.0,
        },
    ];
    println!("ATR(5) on the last bar:");
    for unit in units {
        let values = Atr::new().length(5).unit(unit).compute(&series)?;
        println!("  {:>10}: {:.4}", unit.as_str(), values[values.len() - 1]);
    }
    println!();

    let envelope = Envelope::new().length(5).percent(2.5).compute(&series)?;
    let last = series.len() - 1;
    println!(
        "Envelope(5, 2.5%): basis {:.4}, upper {:.4}, lower {:.4}",
        envelope.basis[last], envelope.upper[last], envelope.lower[last]
    );
    println!();

    let stops = Chandelier::new().length(5).multiplier(1.5).compute(&series)?;
    println!(
        "  {:>5} {:>8} {:>10} {:>10} {:>5} {:>4} {:>4}",
        "Index", "Close", "LongStop", "ShortStop", "Dir", "Buy", "Sell"
    );
    for i in 0..series.len() {
        println!(
            "  {:>5} {:>8.2} {:>10.4} {:>10.4} {:>5} {:>4} {:>4}",
            i,
            series.close()[i],
            stops.long_stop[i],
            stops.short_stop[i],
            stops.direction[i],
            stops.buy[i],
            stops.sell[i]
        );
    }

    Ok(())
}
