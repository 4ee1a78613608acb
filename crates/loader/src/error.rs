use std::io;
use std::path::PathBuf;

use mimedb_registry::RecordError;
use thiserror::Error;

/// Why a v1 line was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
	#[error("no media type")]
	NoMediaType,

	#[error("line does not match the v1 grammar")]
	Malformed,

	#[error("v1 grammar failed to compile: {0}")]
	Grammar(String),

	#[error(transparent)]
	Record(#[from] RecordError),
}

/// Fatal error in a legacy v1 data file.
///
/// `line` is the 0-based index of the offending line within `file`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}:{line}: parsing error in v1 media type definition ({kind})\n=> {content}", file.display())]
pub struct ParseError {
	pub file: PathBuf,
	pub line: usize,
	pub content: String,
	pub kind: ParseErrorKind,
}

/// Errors raised while loading registry data files.
#[derive(Error, Debug)]
pub enum LoadError {
	#[error("failed to walk {}: {source}", path.display())]
	Walk {
		path: PathBuf,
		#[source]
		source: walkdir::Error,
	},

	#[error("failed to read {}: {source}", path.display())]
	Io {
		path: PathBuf,
		#[source]
		source: io::Error,
	},

	#[error("failed to decode {}: {source}", path.display())]
	Json {
		path: PathBuf,
		#[source]
		source: serde_json::Error,
	},

	#[error("invalid record in {}: {source}", path.display())]
	Record {
		path: PathBuf,
		#[source]
		source: RecordError,
	},

	#[error(transparent)]
	Parse(#[from] ParseError),
}

pub type Result<T> = std::result::Result<T, LoadError>;
