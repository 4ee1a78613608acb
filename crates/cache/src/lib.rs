//! Versioned registry cache.
//!
//! Parsing the registry data files on every start is slow, so a fully loaded
//! [`Container`] can be snapshotted to a single file and restored later. The
//! snapshot is tagged with the registry data version and is only reused when
//! the tag matches the expected version exactly; a cache written for `2.0`
//! is never read back by `2.0.1`.
//!
//! Loading never fails. Every problem reading a cache degrades to a
//! [`CacheMiss`], and callers fall back to parsing the data files.

mod envelope;

use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub use envelope::{CacheEnvelope, EnvelopeError, MAGIC};
use mimedb_registry::Container;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors writing a cache file.
#[derive(Error, Debug)]
pub enum CacheError {
	#[error("failed to encode registry cache: {0}")]
	Encode(#[from] postcard::Error),

	#[error("failed to write registry cache {}: {source}", path.display())]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
}

/// Result of [`RegistryCache::save`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
	Written(PathBuf),
	/// No cache location is configured; nothing was written.
	NotConfigured,
}

/// Why [`RegistryCache::load`] found no usable cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheMiss {
	NotConfigured,
	NotFound,
	/// The file exists but could not be read.
	Unreadable(String),
	/// The file, or the registry inside it, failed to decode.
	Corrupt(String),
	/// The cache was written for a different registry data version.
	VersionMismatch { found: String, expected: String },
}

impl fmt::Display for CacheMiss {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::NotConfigured => f.write_str("no cache location configured"),
			Self::NotFound => f.write_str("cache file does not exist"),
			Self::Unreadable(e) => write!(f, "cache file unreadable: {e}"),
			Self::Corrupt(e) => write!(f, "cache file corrupt: {e}"),
			Self::VersionMismatch { found, expected } => write!(f, "invalid version: cache has {found}, expected {expected}"),
		}
	}
}

/// Result of [`RegistryCache::load`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheLoad {
	Hit(Container),
	Miss(CacheMiss),
}

impl CacheLoad {
	pub fn is_hit(&self) -> bool {
		matches!(self, Self::Hit(_))
	}

	pub fn into_container(self) -> Option<Container> {
		match self {
			Self::Hit(container) => Some(container),
			Self::Miss(_) => None,
		}
	}
}

/// Registry cache bound to an optional file location.
///
/// Without a location both [`save`](Self::save) and [`load`](Self::load)
/// are no-ops.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistryCache {
	path: Option<PathBuf>,
}

impl RegistryCache {
	pub fn new(path: Option<PathBuf>) -> Self {
		Self { path }
	}

	pub fn at(path: impl Into<PathBuf>) -> Self {
		Self::new(Some(path.into()))
	}

	pub fn path(&self) -> Option<&Path> {
		self.path.as_deref()
	}

	/// Writes `container` tagged with `version`, replacing any existing file.
	///
	/// The file is produced by a single write. Concurrent writers and readers
	/// of one location must be serialized by the caller.
	pub fn save(&self, container: &Container, version: &str) -> Result<SaveOutcome, CacheError> {
		let Some(path) = &self.path else {
			debug!(domain = "cache", "no cache location configured; skipping save");
			return Ok(SaveOutcome::NotConfigured);
		};

		let bytes = CacheEnvelope::seal(container, version)?.to_bytes()?;
		std::fs::write(path, &bytes).map_err(|source| CacheError::Io { path: path.clone(), source })?;

		debug!(domain = "cache", path = %path.display(), version, bytes = bytes.len(), "saved registry cache");
		Ok(SaveOutcome::Written(path.clone()))
	}

	/// Restores a container saved for `expected_version`.
	///
	/// Unreadable, corrupt and version-mismatched caches are reported through
	/// `tracing` and returned as a [`CacheMiss`]. A missing file or an
	/// unconfigured location is a quiet miss.
	pub fn load(&self, expected_version: &str) -> CacheLoad {
		let Some(path) = &self.path else {
			return CacheLoad::Miss(CacheMiss::NotConfigured);
		};

		let miss = match read_container(path, expected_version) {
			Ok(container) => {
				debug!(domain = "cache", path = %path.display(), records = container.record_count(), "loaded registry cache");
				return CacheLoad::Hit(container);
			}
			Err(miss) => miss,
		};

		match &miss {
			CacheMiss::VersionMismatch { found, expected } => {
				warn!(domain = "cache", path = %path.display(), found = %found, expected = %expected, "could not load registry cache: invalid version");
			}
			CacheMiss::Unreadable(error) | CacheMiss::Corrupt(error) => {
				warn!(domain = "cache", path = %path.display(), error = %error, "could not load registry cache");
			}
			_ => {}
		}
		CacheLoad::Miss(miss)
	}
}

fn read_container(path: &Path, expected_version: &str) -> Result<Container, CacheMiss> {
	let bytes = std::fs::read(path).map_err(|e| match e.kind() {
		ErrorKind::NotFound => CacheMiss::NotFound,
		_ => CacheMiss::Unreadable(e.to_string()),
	})?;

	let envelope = CacheEnvelope::from_bytes(&bytes).map_err(|e| CacheMiss::Corrupt(e.to_string()))?;
	if envelope.version != expected_version {
		return Err(CacheMiss::VersionMismatch {
			found: envelope.version,
			expected: expected_version.to_string(),
		});
	}

	envelope.open().map_err(|e| CacheMiss::Corrupt(e.to_string()))
}
