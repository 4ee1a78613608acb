//! Location resolution for registry data and cache files.
//!
//! Paths are resolved once, here, and passed into the loader and cache as
//! plain values. Nothing else in the workspace reads the environment.

use std::ffi::OsString;
use std::path::PathBuf;

/// Environment variable overriding the registry data directory.
pub const DATA_ENV: &str = "MIMEDB_DATA";

/// Environment variable naming the registry cache file.
pub const CACHE_ENV: &str = "MIMEDB_CACHE";

/// Data directory used when neither an argument nor [`DATA_ENV`] names one.
pub const DEFAULT_DATA_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../data");

/// Resolved registry locations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
	/// Directory searched recursively for data files.
	pub data_dir: PathBuf,
	/// Cache file; `None` disables caching.
	pub cache_file: Option<PathBuf>,
}

impl Default for Config {
	fn default() -> Self {
		Self::from_env()
	}
}

impl Config {
	/// Resolves both locations from the process environment alone.
	pub fn from_env() -> Self {
		Self::resolve(None, None)
	}

	/// Resolves locations, preferring explicit arguments over the environment.
	///
	/// Order for the data directory: `data_dir`, [`DATA_ENV`],
	/// [`DEFAULT_DATA_DIR`]. Order for the cache file: `cache_file`,
	/// [`CACHE_ENV`], none.
	pub fn resolve(data_dir: Option<PathBuf>, cache_file: Option<PathBuf>) -> Self {
		Self::resolve_with(data_dir, cache_file, |key| std::env::var_os(key))
	}

	/// Like [`Config::resolve`], reading variables through `env`.
	pub fn resolve_with<F>(data_dir: Option<PathBuf>, cache_file: Option<PathBuf>, env: F) -> Self
	where
		F: Fn(&str) -> Option<OsString>,
	{
		let from_env = |key: &str| env(key).filter(|v| !v.is_empty()).map(PathBuf::from);

		Self {
			data_dir: data_dir.or_else(|| from_env(DATA_ENV)).unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
			cache_file: cache_file.or_else(|| from_env(CACHE_ENV)),
		}
	}
}
