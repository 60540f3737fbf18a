//! Error Handling Examples
//!
//! Smoothing primitives are strict about the history length, composite
//! indicators treat a short history as a cold start, and configuration
//! errors surface before any computation.
//!
//! Run with: `cargo run --example error_handling`

use algo_ta::indicators::{sma, sma_min_len, Atr, AtrUnit, Zlsma};
use algo_ta::series::{Bar, Series};
use algo_ta::Error;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Error Handling Examples ===");
    println!();

    // Example 1: Empty input
    println!("1. Empty Input:");
    let empty: Vec<f64> = vec![];
    match sma(&empty, 5) {
        Err(Error::EmptyInput) => println!("   Caught EmptyInput error (expected)"),
        other => println!("   Unexpected result: {other:?}"),
    }
    println!();

    // Example 2: A primitive with too little data
    println!("2. Insufficient Data:");
    let short_data = vec![1.0, 2.0, 3.0];
    match sma(&short_data, 10) {
        Err(Error::InsufficientData {
            required,
            actual,
            indicator,
        }) => {
            println!("   {indicator} requires {required} elements, got {actual}");
            println!("   Fix: check sma_min_len({}) = {} first", 10, sma_min_len(10));
        }
        other => println!("   Unexpected result: {other:?}"),
    }
    println!();

    // Example 3: A composite indicator with too little data
    println!("3. Cold Start:");
    let series = Series::from_bars((0..15).map(|i| {
        let close = 100.0 + f64::from(i);
        Bar::new(i64::from(i) * 60, close, close + 1.0, close - 1.0, close, 10.0)
    }))?;
    let zlsma = Zlsma::new().length(32).compute(&series)?;
    let undefined = zlsma.zlsma.iter().filter(|v| v.is_nan()).count();
    println!("   ZLSMA(32) over 15 bars: {undefined} of 15 values undefined");
    println!();

    // Example 4: Invalid configuration
    println!("4. Invalid Parameter:");
    let atr = Atr::new().unit(AtrUnit::Ticks { tick_size: 0.0 });
    match atr.validate() {
        Err(Error::InvalidParameter { name, reason }) => {
            println!("   '{name}' rejected: {reason}");
        }
        other => println!("   Unexpected result: {other:?}"),
    }
    println!();

    // Example 5: Out-of-order bars
    println!("5. Non-monotonic Timestamps:");
    let bars = [0, 60, 60].map(|ts| Bar::new(ts, 1.0, 1.0, 1.0, 1.0, 1.0));
    match Series::from_bars(bars) {
        Err(err @ Error::NonMonotonicTimestamp { .. }) => println!("   {err}"),
        other => println!("   Unexpected result: {other:?}"),
    }

    println!();
    println!("=== All error examples completed ===");
    Ok(())
}
