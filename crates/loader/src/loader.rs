//! Registry loading driver.
//!
//! A [`Loader`] walks a data directory and feeds every data file it finds into
//! one [`Container`]. Files are visited in sorted path order, so repeated keys
//! keep the same variant order across runs over the same directory.

use std::path::PathBuf;

use mimedb_registry::{Container, DuplicateWarning, InsertPolicy};
use tracing::{debug, warn};

use crate::discover::{collect_files_sorted, has_extension};
use crate::error::{LoadError, Result};
use crate::json::{insert_structured, read_json_records};
use crate::v1::load_from_v1;

const STRUCTURED_EXTENSIONS: &[&str] = &["json", "yml", "yaml"];

/// Aggregate result of a v1 load.
#[derive(Debug, Default)]
pub struct LoadReport {
	pub container: Container,
	/// Duplicate definitions found while merging files into the registry.
	pub warnings: Vec<DuplicateWarning>,
}

/// Loads a registry from the data files under one directory.
#[derive(Debug)]
pub struct Loader {
	path: PathBuf,
	container: Container,
}

impl Loader {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self::with_container(path, Container::new())
	}

	/// Creates a loader that appends to an existing container.
	pub fn with_container(path: impl Into<PathBuf>, container: Container) -> Self {
		Self { path: path.into(), container }
	}

	/// Loads every `*.json` file under the data directory.
	///
	/// Records are inserted silently; a key defined by several files keeps
	/// every definition.
	pub fn load_json(mut self) -> Result<Container> {
		for file in collect_files_sorted(&self.path, |p| has_extension(p, &["json"]))? {
			let records = read_json_records(&file)?;
			let count = insert_structured(&mut self.container, records).map_err(|source| LoadError::Record { path: file.clone(), source })?;
			debug!(domain = "json", file = %file.display(), count, "loaded media type definitions");
		}
		Ok(self.container)
	}

	/// Loads the registry in the default format. Same as [`Loader::load_json`].
	pub fn load(self) -> Result<Container> {
		self.load_json()
	}

	/// Loads every legacy v1 file under the data directory.
	///
	/// JSON and YAML files are skipped. Each file is parsed into its own
	/// container and merged into the registry with
	/// [`InsertPolicy::StrictWarn`]. The first parse error aborts the load.
	#[deprecated(note = "the v1 format is superseded by JSON data files; use `load_json`")]
	pub fn load_v1(mut self) -> Result<LoadReport> {
		warn!(domain = "v1", path = %self.path.display(), "loading deprecated v1 media type data");

		let mut warnings = Vec::new();
		for file in collect_files_sorted(&self.path, |p| !has_extension(p, STRUCTURED_EXTENSIONS))? {
			let parsed = load_from_v1(&file)?;
			debug!(domain = "v1", file = %file.display(), count = parsed.record_count(), "loaded media type definitions");
			warnings.extend(self.container.merge(parsed, InsertPolicy::StrictWarn));
		}

		Ok(LoadReport {
			container: self.container,
			warnings,
		})
	}
}
