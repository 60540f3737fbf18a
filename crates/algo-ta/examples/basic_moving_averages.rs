//! Basic Moving Average Examples
//!
//! This example runs every smoothing formula over the same closes and shows
//! how the warm-up differs between them.
//!
//! Run with: `cargo run --example basic_moving_averages`

use algo_ta::indicators::{ema, hma, sma, smooth, Smoothing};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Sample price data (e.g., daily closing prices)
    let prices: Vec<f64> = vec![
        44.34, 44.09, 43.61, 44.33, 44.83, 45.10, 45.42, 45.84, 46.08, 45.89, 46.03, 45.61, 46.28,
        46.28, 46.00, 46.03, 46.41, 46.22, 45.64,
    ];
    let volume: Vec<f64> = (0..prices.len()).map(|i| 1_000.0 + (i % 4) as f64 * 250.0).collect();

    println!("Price data: {} elements", prices.len());
    println!();

    // EMA seeds on the first sample, SMA needs a full window
    let sma_5 = sma(&prices, 5)?;
    let ema_5 = ema(&prices, 5)?;
    let hma_9 = hma(&prices, 9)?;
    println!(
        "  {:>5} {:>10} {:>10} {:>10} {:>10}",
        "Index", "Price", "SMA(5)", "EMA(5)", "HMA(9)"
    );
    for i in 0..prices.len() {
        println!(
            "  {:>5} {:>10.4} {:>10.4} {:>10.4} {:>10.4}",
            i, prices[i], sma_5[i], ema_5[i], hma_9[i]
        );
    }
    println!();

    println!("Last value of each formula (length 5):");
    for kind in Smoothing::ALL {
        let values = smooth(kind, &prices, 5, Some(volume.as_slice()))?;
        let defined = values.iter().filter(|v| !v.is_nan()).count();
        println!(
            "  {:>5}: {:>10.4} ({defined} defined, lookback {})",
            kind.as_str(),
            values[values.len() - 1],
            kind.lookback(5)
        );
    }

    Ok(())
}
