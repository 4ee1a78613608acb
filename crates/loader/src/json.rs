//! Structured JSON registry format.
//!
//! A JSON data file is an array of objects, one per media type definition.

use std::path::Path;

use mimedb_registry::{Container, Encoding, InsertPolicy, RecordError, TypeRecord};
use serde::{Deserialize, Serialize};

use crate::error::LoadError;

/// One element of a JSON data file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct StructuredRecord {
	pub content_type: String,
	#[serde(default)]
	pub extensions: Vec<String>,
	#[serde(default)]
	pub encoding: Option<Encoding>,
	#[serde(default, alias = "platform")]
	pub system: Option<String>,
	#[serde(default)]
	pub obsolete: bool,
	#[serde(default = "registered_by_default")]
	pub registered: bool,
	#[serde(default)]
	pub use_instead: Vec<String>,
	#[serde(default)]
	pub docs: Option<String>,
	#[serde(default)]
	pub references: Vec<String>,
}

fn registered_by_default() -> bool {
	true
}

impl TryFrom<StructuredRecord> for TypeRecord {
	type Error = RecordError;

	fn try_from(value: StructuredRecord) -> Result<Self, Self::Error> {
		let mut record = TypeRecord::new(value.content_type)?;
		record.extensions = value.extensions;
		record.encoding = value.encoding;
		record.platform = value.system;
		record.obsolete = value.obsolete;
		record.registered = value.registered;
		record.use_instead = value.use_instead;
		record.documentation = value.docs;
		record.references = value.references;
		Ok(record)
	}
}

/// Converts `records` and appends them to `container` silently.
///
/// All records are validated before any is inserted, so an invalid record
/// leaves the container untouched. Returns the number of records added.
pub fn insert_structured<I>(container: &mut Container, records: I) -> Result<usize, RecordError>
where
	I: IntoIterator<Item = StructuredRecord>,
{
	let records = records.into_iter().map(TypeRecord::try_from).collect::<Result<Vec<_>, _>>()?;
	let count = records.len();
	container.add_all(records, InsertPolicy::Silent);
	Ok(count)
}

/// Decodes the records of one JSON data file.
pub fn read_json_records(path: &Path) -> Result<Vec<StructuredRecord>, LoadError> {
	let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
		path: path.to_path_buf(),
		source,
	})?;
	serde_json::from_str(&text).map_err(|source| LoadError::Json {
		path: path.to_path_buf(),
		source,
	})
}

/// Loads one JSON data file into a fresh container.
pub fn load_from_json(path: &Path) -> Result<Container, LoadError> {
	let mut container = Container::new();
	insert_structured(&mut container, read_json_records(path)?).map_err(|source| LoadError::Record {
		path: path.to_path_buf(),
		source,
	})?;
	Ok(container)
}
