//! Media type registry.
//!
//! Loads the registry of media type definitions from data files, reusing a
//! versioned cache when one is configured and still valid.
//!
//! # Architecture
//!
//! * [`registry`]: [`TypeRecord`] and the [`Container`] they are stored in
//! * [`loader`]: JSON and legacy v1 data file loaders
//! * [`cache`]: Versioned binary snapshots of a container
//! * [`config`]: Resolution of the data directory and cache file

pub mod config;

pub use config::Config;
pub use mimedb_cache::{self as cache, CacheLoad, CacheMiss, RegistryCache, SaveOutcome};
pub use mimedb_loader::{self as loader, LoadError, Loader, ParseError};
pub use mimedb_registry::{self as registry, Container, DATA_VERSION, Encoding, InsertPolicy, TypeRecord};
use tracing::{debug, warn};

/// Loads the default registry described by `config`.
///
/// A cache written for [`DATA_VERSION`] is returned as is. Otherwise the JSON
/// data files are loaded and the result is written back to the cache. Failing
/// to write the cache is logged and does not fail the load.
pub fn load_registry(config: &Config) -> Result<Container, LoadError> {
	let cache = RegistryCache::new(config.cache_file.clone());

	match cache.load(DATA_VERSION) {
		CacheLoad::Hit(container) => return Ok(container),
		CacheLoad::Miss(miss) => debug!(domain = "registry", reason = %miss, "registry cache unused"),
	}

	let container = Loader::new(&config.data_dir).load()?;
	if let Err(error) = cache.save(&container, DATA_VERSION) {
		warn!(domain = "registry", error = %error, "could not save registry cache");
	}
	Ok(container)
}

#[cfg(test)]
mod tests {
	use std::path::PathBuf;

	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn bundled_data_loads() {
		let config = Config::resolve_with(None, None, |_| None);
		let registry = load_registry(&config).expect("bundled data should load");

		assert_eq!(registry.get("text/plain")[0].encoding, Some(Encoding::QuotedPrintable));
		assert_eq!(registry.get("application/x-msdos-program").len(), 2);
		assert_eq!(registry.get("image/x-bmp")[0].use_instead, vec!["image/bmp"]);
		assert!(registry.get("audio/unknown").is_empty());
	}

	#[test]
	fn first_load_writes_cache_and_second_load_reuses_it() {
		let dir = tempfile::tempdir().expect("must create tempdir");
		let data_dir = dir.path().join("data");
		std::fs::create_dir_all(&data_dir).unwrap();
		std::fs::write(data_dir.join("text.json"), r#"[{"content-type": "text/plain", "extensions": ["txt"]}]"#).unwrap();
		let cache_file = dir.path().join("registry.cache");

		let config = Config::resolve_with(Some(data_dir.clone()), Some(cache_file.clone()), |_| None);
		let first = load_registry(&config).unwrap();
		assert!(cache_file.exists());

		// The cache wins over the data files while the version matches.
		std::fs::remove_file(data_dir.join("text.json")).unwrap();
		let second = load_registry(&config).unwrap();
		assert_eq!(first, second);
		assert_eq!(second.record_count(), 1);
	}

	#[test]
	fn stale_cache_falls_back_to_data_files() {
		let dir = tempfile::tempdir().expect("must create tempdir");
		let cache_file = dir.path().join("registry.cache");
		let stale: Container = [TypeRecord::new("stale/type").unwrap()].into_iter().collect();
		RegistryCache::at(&cache_file).save(&stale, "0.0.0-stale").unwrap();

		let config = Config::resolve_with(Some(PathBuf::from(config::DEFAULT_DATA_DIR)), Some(cache_file.clone()), |_| None);
		let registry = load_registry(&config).unwrap();

		assert!(registry.get("stale/type").is_empty());
		assert!(!registry.get("image/png").is_empty());
		assert!(RegistryCache::at(&cache_file).load(DATA_VERSION).is_hit());
	}
}
