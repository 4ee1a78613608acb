//! On-disk cache envelope.
//!
//! A cache file is [`MAGIC`] followed by the postcard encoding of a
//! [`CacheEnvelope`]. The envelope's `data` is itself the postcard encoding
//! of a [`Container`], so the version tag can be checked before the registry
//! payload is decoded.

use mimedb_registry::Container;
use serde::{Deserialize, Serialize};

/// Magic bytes identifying a registry cache file.
pub const MAGIC: &[u8; 8] = b"MIMEDBC\0";

/// Versioned snapshot of a registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEnvelope {
	/// Registry data version the snapshot was produced by.
	pub version: String,
	/// Encoded [`Container`].
	pub data: Vec<u8>,
}

impl CacheEnvelope {
	/// Encodes `container` into a new envelope tagged with `version`.
	pub fn seal(container: &Container, version: &str) -> Result<Self, postcard::Error> {
		Ok(Self {
			version: version.to_string(),
			data: postcard::to_stdvec(container)?,
		})
	}

	/// Decodes the registry payload.
	pub fn open(&self) -> Result<Container, postcard::Error> {
		postcard::from_bytes(&self.data)
	}

	/// Serializes the envelope with its magic header.
	pub fn to_bytes(&self) -> Result<Vec<u8>, postcard::Error> {
		let body = postcard::to_stdvec(self)?;
		let mut bytes = Vec::with_capacity(MAGIC.len() + body.len());
		bytes.extend_from_slice(MAGIC);
		bytes.extend_from_slice(&body);
		Ok(bytes)
	}

	/// Parses an envelope written by [`CacheEnvelope::to_bytes`].
	pub fn from_bytes(bytes: &[u8]) -> Result<Self, EnvelopeError> {
		let payload = validate_blob(bytes).ok_or(EnvelopeError::BadMagic)?;
		Ok(postcard::from_bytes(payload)?)
	}
}

/// Errors decoding a cache file.
#[derive(Debug, thiserror::Error)]
pub enum EnvelopeError {
	#[error("not a registry cache file")]
	BadMagic,

	#[error("malformed envelope: {0}")]
	Decode(#[from] postcard::Error),
}

/// Validates the magic header and returns the payload slice.
fn validate_blob(data: &[u8]) -> Option<&[u8]> {
	data.strip_prefix(MAGIC.as_slice())
}
