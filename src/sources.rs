use anyhow::Result;

use crate::config::{self, Config};

/// `habi sources`: show what a run would use and whether each input is
/// healthy, without touching the network.
pub fn list_sources(config: &Config) -> Result<()> {
    println!("{:<14} {:<40} {}", "INPUT", "LOCATION", "STATUS");

    let cities = match config::load_cities(&config.ingest.cities) {
        Ok(cities) => format!("OK ({} cities)", cities.len()),
        Err(err) => format!("ERROR ({err:#})"),
    };
    println!(
        "{:<14} {:<40} {}",
        "cities",
        config.ingest.cities.display().to_string(),
        cities
    );

    let categories = match config::load_categories(&config.ingest.categories) {
        Ok(categories) => {
            let queries: usize = categories.iter().map(|c| c.queries.len()).sum();
            format!("OK ({} categories, {} queries)", categories.len(), queries)
        }
        Err(err) => format!("ERROR ({err:#})"),
    };
    println!(
        "{:<14} {:<40} {}",
        "categories",
        config.ingest.categories.display().to_string(),
        categories
    );

    let key = if std::env::var(&config.api.key_env).is_ok() {
        "OK"
    } else {
        "NOT SET"
    };
    println!("{:<14} {:<40} {}", "api key", config.api.key_env, key);

    for (name, dest) in &config.destinations {
        let status = if dest.path.exists() {
            "OK"
        } else {
            "NOT INITIALIZED (run `habi init`)"
        };
        println!(
            "{:<14} {:<40} {}",
            format!("dest:{name}"),
            dest.path.display().to_string(),
            status
        );
    }

    Ok(())
}
