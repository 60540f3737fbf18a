//! Indicator Engine Example
//!
//! Loads a set of named indicators from TOML, runs them over one series and
//! prints the last value of every channel.
//!
//! Run with: `cargo run --example engine_run_file`

use algo_ta::engine::IndicatorEngine;
use algo_ta::series::{Bar, Series};

const RUN_FILE: &str = r#"
[[indicator]]
name = "trend"
indicator = "t3_roc"
length = 8

[[indicator]]
name = "risk"
indicator = "atr"
length = 10
unit = { kind = "percentage" }

[[indicator]]
name = "flow"
indicator = "admf"
norm_period = 30

[[indicator]]
name = "fast"
indicator = "zlsma"
length = 12
"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let series = Series::from_bars((0..120).map(|i| {
        let x = f64::from(i);
        let close = 50.0 + (x * 0.15).sin() * 4.0 + x * 0.02;
        Bar::new(i64::from(i) * 900, close - 0.2, close + 0.5, close - 0.5, close, 800.0 + x)
    }))?;

    let engine: IndicatorEngine = toml::from_str(RUN_FILE)?;
    for output in engine.run(&series)? {
        println!("{} (first defined bar {}):", output.indicator(), output.first_defined());
        for (channel, values) in output.channels() {
            println!("  {channel:>12}: {:.4}", values[values.len() - 1]);
        }
    }

    Ok(())
}
