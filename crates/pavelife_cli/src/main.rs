//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `pavelife_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

use pavelife_core::LifeDocument;

fn main() {
    let seed = LifeDocument::seed();
    println!("pavelife_core version={}", pavelife_core::core_version());
    println!(
        "seed birth_date={} current_age={} life_expectancy={} events={} future_paths={}",
        seed.birth_date,
        seed.current_age,
        seed.life_expectancy,
        seed.events.len(),
        seed.future_paths.len()
    );
}
