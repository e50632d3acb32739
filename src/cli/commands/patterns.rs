//! List patterns command.

use anyhow::Result;
use candlescan_indicators::CandlePattern;

pub async fn run() -> Result<()> {
    println!("Candlestick Patterns");
    println!("═══════════════════════════════════════════════════════════");
    println!();
    println!("  {:<22} {:<22} {}", "Pattern", "Function", "Candles");
    println!("  ───────────────────────────────────────────────────────");

    for pattern in CandlePattern::ALL {
        println!(
            "  {:<22} {:<22} {}",
            pattern.name(),
            pattern.function_name(),
            pattern.candles()
        );
    }

    println!();
    println!("Codes: +100 bullish, -100 bearish, 0 absent.");

    Ok(())
}
