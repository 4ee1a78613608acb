//! Media type definition records.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while constructing a [`TypeRecord`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
	#[error("invalid media type: {0:?} (expected 'type/subtype')")]
	InvalidMediaType(String),

	#[error("unknown encoding: {0:?}")]
	UnknownEncoding(String),
}

/// Content transfer encoding of a media type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Encoding {
	#[serde(rename = "base64")]
	Base64,
	#[serde(rename = "7bit")]
	SevenBit,
	#[serde(rename = "8bit")]
	EightBit,
	#[serde(rename = "quoted-printable")]
	QuotedPrintable,
}

impl Encoding {
	/// Wire name of the encoding as it appears in data files.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Base64 => "base64",
			Self::SevenBit => "7bit",
			Self::EightBit => "8bit",
			Self::QuotedPrintable => "quoted-printable",
		}
	}
}

impl FromStr for Encoding {
	type Err = RecordError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"base64" => Ok(Self::Base64),
			"7bit" => Ok(Self::SevenBit),
			"8bit" => Ok(Self::EightBit),
			"quoted-printable" => Ok(Self::QuotedPrintable),
			other => Err(RecordError::UnknownEncoding(other.to_string())),
		}
	}
}

impl fmt::Display for Encoding {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// One media type definition.
///
/// Records are plain data. Loaders fill the public fields after
/// [`TypeRecord::new`] has validated the media type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeRecord {
	/// The `type/subtype` string as written in the source.
	pub media_type: String,
	/// File extensions, in source order.
	pub extensions: Vec<String>,
	pub encoding: Option<Encoding>,
	/// Operating system marker for platform-specific variants.
	pub platform: Option<String>,
	pub obsolete: bool,
	pub registered: bool,
	/// Replacement media types for obsolete definitions.
	pub use_instead: Vec<String>,
	pub documentation: Option<String>,
	pub references: Vec<String>,
	pub comment: Option<String>,
}

impl TypeRecord {
	/// Creates a registered record with no optional data.
	///
	/// Fails unless `media_type` is exactly one `/` with non-empty text on
	/// both sides.
	pub fn new(media_type: impl Into<String>) -> Result<Self, RecordError> {
		let media_type = media_type.into();
		let valid = match media_type.split_once('/') {
			Some((top, sub)) => !top.is_empty() && !sub.is_empty() && !sub.contains('/'),
			None => false,
		};
		if !valid || media_type.chars().any(char::is_whitespace) {
			return Err(RecordError::InvalidMediaType(media_type));
		}

		Ok(Self {
			media_type,
			extensions: Vec::new(),
			encoding: None,
			platform: None,
			obsolete: false,
			registered: true,
			use_instead: Vec::new(),
			documentation: None,
			references: Vec::new(),
			comment: None,
		})
	}

	/// Returns the container key for this record.
	///
	/// The key is the lowercased media type. The platform never takes part in
	/// it, so platform variants share the key of their generic definition.
	pub fn key(&self) -> String {
		normalize_key(&self.media_type)
	}

	/// Returns true if `other` defines the same media type with the same set of
	/// extensions.
	pub fn is_duplicate_of(&self, other: &TypeRecord) -> bool {
		if !self.media_type.eq_ignore_ascii_case(&other.media_type) {
			return false;
		}
		let mut ours: Vec<&str> = self.extensions.iter().map(String::as_str).collect();
		let mut theirs: Vec<&str> = other.extensions.iter().map(String::as_str).collect();
		ours.sort_unstable();
		ours.dedup();
		theirs.sort_unstable();
		theirs.dedup();
		ours == theirs
	}
}

impl fmt::Display for TypeRecord {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.media_type)
	}
}

/// Normalizes a media type string into a container key.
pub(crate) fn normalize_key(media_type: &str) -> String {
	media_type.to_ascii_lowercase()
}
