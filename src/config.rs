use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::models::{Category, City};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    pub ingest: IngestConfig,
    pub destinations: BTreeMap<String, DestinationConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    /// Environment variable the API key is read from when `--api-key` is
    /// not given.
    #[serde(default = "default_key_env")]
    pub key_env: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Pause before requesting a continuation page. Upstream tokens are not
    /// valid immediately, so this is required for correctness, not politeness.
    #[serde(default = "default_page_delay_secs")]
    pub page_delay_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            key_env: default_key_env(),
            timeout_secs: default_timeout_secs(),
            page_delay_secs: default_page_delay_secs(),
        }
    }
}

fn default_key_env() -> String {
    "GOOGLE_PLACES_API_KEY".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_page_delay_secs() -> u64 {
    2
}

#[derive(Debug, Deserialize, Clone)]
pub struct IngestConfig {
    /// JSON file listing the cities to search.
    pub cities: PathBuf,
    /// JSON file listing the categories and their query terms.
    pub categories: PathBuf,
    #[serde(default = "default_radius_m")]
    pub radius_m: u32,
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
}

fn default_radius_m() -> u32 {
    50_000
}
fn default_max_pages() -> u32 {
    1
}

#[derive(Debug, Deserialize, Clone)]
pub struct DestinationConfig {
    pub path: PathBuf,
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    if config.destinations.is_empty() {
        anyhow::bail!("At least one [destinations.<name>] entry is required");
    }
    if config.ingest.radius_m == 0 {
        anyhow::bail!("ingest.radius_m must be > 0");
    }
    if config.ingest.max_pages == 0 {
        anyhow::bail!("ingest.max_pages must be >= 1");
    }

    Ok(config)
}

pub fn load_cities(path: &Path) -> Result<Vec<City>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read cities file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse cities file: {}", path.display()))
}

pub fn load_categories(path: &Path) -> Result<Vec<Category>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read categories file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse categories file: {}", path.display()))
}

/// Resolve the API key: command-line flag first, then the configured
/// environment variable. Missing credentials are fatal before any
/// processing is attempted.
pub fn resolve_api_key(flag: Option<String>, config: &Config) -> Result<String> {
    if let Some(key) = flag.filter(|k| !k.is_empty()) {
        return Ok(key);
    }
    std::env::var(&config.api.key_env).map_err(|_| {
        anyhow::anyhow!(
            "Missing API key. Set {} or pass --api-key.",
            config.api.key_env
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    const MINIMAL: &str = r#"
[ingest]
cities = "config/cities.json"
categories = "config/categories.json"

[destinations.primary]
path = "data/places.sqlite"
"#;

    #[test]
    fn minimal_config_gets_defaults() {
        let file = write_config(MINIMAL);
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.api.key_env, "GOOGLE_PLACES_API_KEY");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.api.page_delay_secs, 2);
        assert_eq!(config.ingest.radius_m, 50_000);
        assert_eq!(config.ingest.max_pages, 1);
        assert_eq!(config.destinations.len(), 1);
    }

    #[test]
    fn overrides_are_honored() {
        let file = write_config(
            r#"
[api]
timeout_secs = 10
page_delay_secs = 0

[ingest]
cities = "c.json"
categories = "q.json"
radius_m = 25000
max_pages = 3

[destinations.primary]
path = "a.sqlite"

[destinations.replica]
path = "b.sqlite"
"#,
        );
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.api.timeout_secs, 10);
        assert_eq!(config.ingest.radius_m, 25_000);
        assert_eq!(config.ingest.max_pages, 3);
        let names: Vec<_> = config.destinations.keys().cloned().collect();
        assert_eq!(names, vec!["primary", "replica"]);
    }

    #[test]
    fn missing_destinations_is_rejected() {
        let file = write_config(
            r#"
[ingest]
cities = "c.json"
categories = "q.json"
"#,
        );
        let err = format!("{:#}", load_config(file.path()).unwrap_err());
        assert!(err.contains("destinations"), "{err}");
    }

    #[test]
    fn zero_max_pages_is_rejected() {
        let file = write_config(
            r#"
[ingest]
cities = "c.json"
categories = "q.json"
max_pages = 0

[destinations.primary]
path = "a.sqlite"
"#,
        );
        assert!(load_config(file.path()).is_err());
    }

    #[test]
    fn city_and_category_files_parse() {
        let cities = write_config(
            r#"[
  {"city": "Stockholm", "country": "Sweden", "country_code": "SE",
   "city_id": "stockholm-se", "lat": 59.33, "lon": 18.07},
  {"city": "Addis Ababa", "region": "Addis Ababa", "country": "Ethiopia",
   "country_code": "ET", "city_id": "addis-et"}
]"#,
        );
        let parsed = load_cities(cities.path()).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].lat, Some(59.33));
        assert!(parsed[1].lat.is_none());
        assert_eq!(parsed[1].region.as_deref(), Some("Addis Ababa"));

        let categories = write_config(
            r#"[
  {"id": "restaurants", "queries": ["ethiopian restaurant", "eritrean restaurant"]},
  {"id": "groceries", "queries": ["teff flour"]}
]"#,
        );
        let parsed = load_categories(categories.path()).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].queries.len(), 2);
    }

    #[test]
    fn api_key_flag_wins_over_environment() {
        let file = write_config(MINIMAL);
        let config = load_config(file.path()).unwrap();
        let key = resolve_api_key(Some("flag-key".to_string()), &config).unwrap();
        assert_eq!(key, "flag-key");
    }
}
