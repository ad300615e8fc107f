//! The collection registry: which collections exist and how each one is
//! configured.
//!
//! Loaded once at startup from a data directory holding `collections.json`
//! plus one config file per collection, then shared read-only. Nothing
//! mutates the registry after load; reloading means building a fresh one.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use tracing::debug;

use crate::config::CollectionConfig;
use crate::error::ConfigError;
use crate::locale::Locale;

const REGISTRY_FILE: &str = "collections.json";

/// One entry of the collection listing.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionEntry {
    pub id: String,

    /// Display titles keyed by locale code
    #[serde(default)]
    pub title: BTreeMap<String, String>,

    /// Search keywords keyed by locale code
    #[serde(default)]
    pub keywords: BTreeMap<String, Vec<String>>,

    /// Cover image path or URL
    #[serde(default)]
    pub image: Option<String>,

    /// Per-collection config file, relative to the data directory
    pub config_path: String,
}

impl CollectionEntry {
    /// Display title for a locale, falling back to Italian, then to the id.
    pub fn title_for(&self, locale: Locale) -> &str {
        self.title
            .get(locale.code())
            .or_else(|| self.title.get(Locale::Italian.code()))
            .map(String::as_str)
            .unwrap_or(&self.id)
    }

    /// Keywords for a locale, falling back to Italian.
    pub fn keywords_for(&self, locale: Locale) -> &[String] {
        self.keywords
            .get(locale.code())
            .or_else(|| self.keywords.get(Locale::Italian.code()))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// All registered collections with their loaded configurations.
#[derive(Debug)]
pub struct CollectionRegistry {
    entries: Vec<CollectionEntry>,
    configs: HashMap<String, Arc<CollectionConfig>>,
}

impl CollectionRegistry {
    /// Load and validate the registry from a data directory. Fails if the
    /// listing is malformed, an id repeats, or any referenced config file
    /// is missing or invalid.
    pub fn load(data_dir: &Path) -> Result<Self, ConfigError> {
        let listing_path = data_dir.join(REGISTRY_FILE);
        let listing = std::fs::read(&listing_path).map_err(|source| ConfigError::Io {
            path: listing_path.clone(),
            source,
        })?;
        let entries: Vec<CollectionEntry> = serde_json::from_slice(&listing)?;

        let mut configs = HashMap::new();
        for entry in &entries {
            let config_path = data_dir.join(&entry.config_path);
            if !config_path.exists() {
                return Err(ConfigError::MissingResource(config_path));
            }
            let bytes = std::fs::read(&config_path).map_err(|source| ConfigError::Io {
                path: config_path.clone(),
                source,
            })?;
            let config = CollectionConfig::from_slice(&bytes)?;
            debug!(collection = %entry.id, facets = config.facets.len(), "loaded collection config");
            if configs
                .insert(entry.id.clone(), Arc::new(config))
                .is_some()
            {
                return Err(ConfigError::DuplicateCollection(entry.id.clone()));
            }
        }

        Ok(Self { entries, configs })
    }

    /// Listing entries, in registry order.
    pub fn entries(&self) -> &[CollectionEntry] {
        &self.entries
    }

    /// Configuration for a collection id, if registered.
    pub fn config(&self, id: &str) -> Option<&Arc<CollectionConfig>> {
        self.configs.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn collection_config_json() -> String {
        serde_json::json!({
            "endpoint": "https://query.example.org/sparql",
            "cardTemplate": {
                "select": "?item ?title",
                "where": "?item a <http://example.org/Artifact> .",
                "limit": 12
            },
            "facets": []
        })
        .to_string()
    }

    fn listing_json(config_file: &str) -> String {
        serde_json::json!([{
            "id": "ceramics",
            "title": { "it": "Ceramiche", "en": "Ceramics" },
            "keywords": { "it": ["vasi"], "en": ["vases"] },
            "image": "img/ceramics.jpg",
            "configPath": config_file
        }])
        .to_string()
    }

    #[test]
    fn loads_registry_and_configs() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("collections.json"), listing_json("ceramics.json")).unwrap();
        fs::write(dir.path().join("ceramics.json"), collection_config_json()).unwrap();

        let registry = CollectionRegistry::load(dir.path()).unwrap();
        assert_eq!(registry.entries().len(), 1);
        let entry = &registry.entries()[0];
        assert_eq!(entry.title_for(Locale::English), "Ceramics");
        assert_eq!(entry.keywords_for(Locale::Italian), ["vasi"]);
        let config = registry.config("ceramics").unwrap();
        assert_eq!(config.card_template.limit, 12);
        assert!(registry.config("nope").is_none());
    }

    #[test]
    fn missing_config_file_fails_the_load() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("collections.json"), listing_json("absent.json")).unwrap();

        assert!(matches!(
            CollectionRegistry::load(dir.path()),
            Err(ConfigError::MissingResource(_))
        ));
    }

    #[test]
    fn invalid_config_file_fails_the_load() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("collections.json"), listing_json("bad.json")).unwrap();
        fs::write(dir.path().join("bad.json"), "{}").unwrap();

        assert!(matches!(
            CollectionRegistry::load(dir.path()),
            Err(ConfigError::MissingField("endpoint"))
        ));
    }

    #[test]
    fn missing_listing_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            CollectionRegistry::load(dir.path()),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn title_falls_back_to_id() {
        let entry = CollectionEntry {
            id: "bronzes".into(),
            title: BTreeMap::new(),
            keywords: BTreeMap::new(),
            image: None,
            config_path: "bronzes.json".into(),
        };
        assert_eq!(entry.title_for(Locale::English), "bronzes");
    }
}
