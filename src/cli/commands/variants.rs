//! List signal variants command.

use anyhow::Result;
use candlescan_signals::VariantRegistry;

pub async fn run() -> Result<()> {
    let registry = VariantRegistry::new();

    println!("Signal Variants");
    println!("═══════════════════════════════════════════════════════════");
    println!();

    for info in registry.list() {
        println!("  {} ({})", info.name, info.variant);
        println!("  ───────────────────────────────────────────────────────");
        println!("  {}", info.description);
        println!();
        println!("  Default configuration:");
        let config = serde_json::to_string_pretty(&info.default_config)?;
        for line in config.lines() {
            println!("    {}", line);
        }
        println!();
    }

    println!("Variant names: {}", registry.names().join(", "));

    Ok(())
}
