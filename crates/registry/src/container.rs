//! Insertion-ordered registry container.
//!
//! # Role
//!
//! [`Container`] maps a normalized media type key to every [`TypeRecord`]
//! variant registered under it. Keys keep their first-insertion order and
//! each list keeps record insertion order, so a registry built from the same
//! files in the same order always iterates identically.
//!
//! Lookups are side-effect-free: an absent key reads as an empty slice and is
//! never materialized.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::record::{TypeRecord, normalize_key};

/// How [`Container::add`] treats a record whose definition already exists.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InsertPolicy {
	/// Always append without inspecting existing entries.
	#[default]
	Silent,
	/// Append, but report a [`DuplicateWarning`] when an existing entry under
	/// the same key defines the same media type and extension set.
	StrictWarn,
}

/// Non-fatal report of a duplicate definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateWarning {
	/// Container key both definitions live under.
	pub key: String,
	/// Media type of the incoming record.
	pub media_type: String,
	/// Position of the earlier definition in the key's list.
	pub existing_index: usize,
}

impl fmt::Display for DuplicateWarning {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "type {} is already registered as a variant of {}", self.media_type, self.key)
	}
}

/// Multimap from normalized media type to its registered variants.
///
/// Equality is order-sensitive for both keys and variants.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Container {
	types: IndexMap<String, Vec<TypeRecord>>,
}

impl Container {
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends `record` under its key.
	///
	/// The record is always stored. Under [`InsertPolicy::StrictWarn`] at most
	/// one warning is produced, naming the first existing duplicate.
	pub fn add(&mut self, record: TypeRecord, policy: InsertPolicy) -> Option<DuplicateWarning> {
		let key = record.key();
		let variants = self.types.entry(key).or_default();

		let warning = match policy {
			InsertPolicy::Silent => None,
			InsertPolicy::StrictWarn => variants
				.iter()
				.position(|existing| existing.is_duplicate_of(&record))
				.map(|existing_index| DuplicateWarning {
					key: normalize_key(&record.media_type),
					media_type: record.media_type.clone(),
					existing_index,
				}),
		};

		if let Some(w) = &warning {
			warn!(domain = "registry", key = %w.key, media_type = %w.media_type, existing_index = w.existing_index, "duplicate media type definition");
		}

		variants.push(record);
		warning
	}

	/// Appends every record in order, collecting the warnings produced.
	pub fn add_all<I>(&mut self, records: I, policy: InsertPolicy) -> Vec<DuplicateWarning>
	where
		I: IntoIterator<Item = TypeRecord>,
	{
		records.into_iter().filter_map(|record| self.add(record, policy)).collect()
	}

	/// Appends every record of `other`, in its key and list order.
	pub fn merge(&mut self, other: Container, policy: InsertPolicy) -> Vec<DuplicateWarning> {
		self.add_all(other.types.into_values().flatten(), policy)
	}

	/// Returns the variants registered for `media_type`.
	///
	/// The argument is normalized the same way record keys are. A missing key
	/// yields an empty slice.
	pub fn get(&self, media_type: &str) -> &[TypeRecord] {
		self.types.get(&normalize_key(media_type)).map(Vec::as_slice).unwrap_or(&[])
	}

	/// Returns every record that lists `extension`, in registry order.
	pub fn by_extension<'a>(&'a self, extension: &'a str) -> impl Iterator<Item = &'a TypeRecord> + 'a {
		let extension = extension.trim_start_matches('.');
		self.records()
			.filter(move |record| record.extensions.iter().any(|ext| ext.eq_ignore_ascii_case(extension)))
	}

	/// Iterates keys with their variants, in key insertion order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &[TypeRecord])> {
		self.types.iter().map(|(key, variants)| (key.as_str(), variants.as_slice()))
	}

	/// Iterates all records, grouped by key.
	pub fn records(&self) -> impl Iterator<Item = &TypeRecord> {
		self.types.values().flatten()
	}

	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.types.keys().map(String::as_str)
	}

	/// Number of distinct keys.
	pub fn len(&self) -> usize {
		self.types.len()
	}

	/// Number of records across all keys.
	pub fn record_count(&self) -> usize {
		self.types.values().map(Vec::len).sum()
	}

	pub fn is_empty(&self) -> bool {
		self.types.is_empty()
	}
}

impl PartialEq for Container {
	fn eq(&self, other: &Self) -> bool {
		self.types.len() == other.types.len() && self.types.iter().eq(other.types.iter())
	}
}

impl Eq for Container {}

impl Extend<TypeRecord> for Container {
	fn extend<I: IntoIterator<Item = TypeRecord>>(&mut self, iter: I) {
		for record in iter {
			self.add(record, InsertPolicy::Silent);
		}
	}
}

impl FromIterator<TypeRecord> for Container {
	fn from_iter<I: IntoIterator<Item = TypeRecord>>(iter: I) -> Self {
		let mut container = Self::new();
		container.extend(iter);
		container
	}
}
