//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `unitsys_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

use unitsys_core::{
    Dimension, ReferenceUnit, SizeConfig, UnitConfig, UnitContext, UnitManager,
};

fn main() {
    println!("unitsys_core ping={}", unitsys_core::ping());
    println!("unitsys_core version={}", unitsys_core::core_version());

    let mut manager = UnitManager::new();
    let config = UnitConfig::Size(SizeConfig::new(
        "probe.width",
        Dimension::Width,
        ReferenceUnit::ParentPercent,
        50.0,
    ));
    if let Err(err) = manager.create_unit(config) {
        eprintln!("unitsys_core probe failed: {err}");
        std::process::exit(1);
    }

    let context = UnitContext::uniform(1920.0, 1080.0).with_parent(800.0, 600.0);
    match manager.calculate("probe.width", &context) {
        Ok(result) => println!(
            "unitsys_core probe value={} strategy={}",
            result.value, result.strategy_used
        ),
        Err(err) => {
            eprintln!("unitsys_core probe failed: {err}");
            std::process::exit(1);
        }
    }
}
