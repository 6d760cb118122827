//! Smoke test for an address form session.
//!
//! Drives one registration through the cascade against the bundled
//! in-memory hierarchy (or a JSON file) and prints each step.
//!
//! Usage:
//!   REGISTRA_HIERARCHY=path/to/hierarchy.json \
//!   REGISTRA_STRICT_FROM=countyDistrict \
//!   cargo run -p registra-session --example registration_smoke

use std::sync::Arc;
use std::time::Duration;

use registra_core::config::AddressConfig;
use registra_core::levels::{default_levels, field};
use registra_session::session::{AddressSession, SelectOptions};
use registra_suggest::memory::StaticHierarchy;

const BUNDLED_HIERARCHY: &str = include_str!("../fixtures/hierarchy.json");

#[tokio::main]
async fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let hierarchy = match std::env::var("REGISTRA_HIERARCHY") {
        Ok(path) => {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| eyre::eyre!("failed to read hierarchy at {path}: {e}"))?;
            StaticHierarchy::from_json(&contents)?
        }
        Err(_) => StaticHierarchy::from_json(BUNDLED_HIERARCHY)?,
    };
    let strict_from =
        std::env::var("REGISTRA_STRICT_FROM").unwrap_or_else(|_| field::COUNTY_DISTRICT.to_string());

    let config = AddressConfig::default().with_strict_from(strict_from);
    let debounce = config.debounce();
    let mut session = AddressSession::start(Arc::new(hierarchy), config, default_levels()).await?;

    println!("Levels:");
    for level in session.levels() {
        println!(
            "  {:<16} strict={:<5} read_only={}",
            level.field_key,
            session.strictness().is_strict(&level.field_key),
            session.is_read_only(&level.field_key)?
        );
    }
    println!();

    // Type a district one keystroke at a time, faster than the debounce window.
    for query in ["P", "Pu", "Pun"] {
        session.input(field::COUNTY_DISTRICT, query)?;
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    tokio::time::sleep(debounce + Duration::from_millis(50)).await;

    let districts = session.suggestions(field::COUNTY_DISTRICT);
    println!("District suggestions for \"Pun\":");
    for entry in districts.iter() {
        println!("  {} ({})", entry.name, entry.stable_id.as_deref().unwrap_or("-"));
    }
    println!();

    let Some(pune) = districts.first() else {
        return Err(eyre::eyre!("hierarchy returned no districts for \"Pun\""));
    };
    session.select(field::COUNTY_DISTRICT, pune, SelectOptions::default())?;
    session.input(field::CITY_VILLAGE, "Hadapsar")?;
    session.input(field::POSTAL_CODE, "411028")?;

    println!("Address after selection:");
    println!("{}", serde_json::to_string_pretty(&session.snapshot())?);
    println!();

    let errors = session.validate_all();
    if errors.is_empty() {
        println!("Address is valid.");
    } else {
        for error in &errors {
            println!("  {}: {}", error.field_key, error);
        }
    }

    session.reset_all();
    println!("Session reset; {} values remain.", session.values().len());

    Ok(())
}
