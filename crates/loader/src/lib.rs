//! Media type registry loaders.
//!
//! Two independent producers fill a [`mimedb_registry::Container`]:
//!
//! * [`json`]: Structured JSON data files, the default registry format
//! * [`v1`]: The deprecated line-oriented v1 text format
//!
//! [`Loader`] discovers data files under a directory and drives either
//! producer over them in a deterministic order.

mod discover;
pub mod error;
pub mod json;
mod loader;
pub mod v1;

pub use discover::collect_files_sorted;
pub use error::{LoadError, ParseError, ParseErrorKind, Result};
pub use json::{StructuredRecord, insert_structured, load_from_json};
pub use loader::{LoadReport, Loader};
pub use v1::{load_from_v1, parse_v1_str};
