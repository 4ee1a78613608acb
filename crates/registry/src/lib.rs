//! Media type records and the registry container.
//!
//! Every loader in the workspace produces [`TypeRecord`] values and feeds them
//! into a [`Container`]. The container is an insertion-ordered multimap keyed by
//! the normalized media type, so several variants of one type (platform
//! specific definitions, definitions repeated across data files) live side by
//! side under a single key.
//!
//! # Architecture
//!
//! * [`record`]: The [`TypeRecord`] value type and its [`Encoding`] enumeration
//! * [`container`]: The [`Container`] multimap and its [`InsertPolicy`]

pub mod container;
pub mod record;

pub use container::{Container, DuplicateWarning, InsertPolicy};
pub use record::{Encoding, RecordError, TypeRecord};

/// Version tag of the registry data shape.
///
/// Cached registries are only reused when their tag equals this value exactly.
pub const DATA_VERSION: &str = env!("CARGO_PKG_VERSION");
