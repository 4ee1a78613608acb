//! Legacy v1 text format.
//!
//! Each non-blank line defines one media type:
//!
//! ```text
//! [*][!][os:]mt/st[<ws>@ext,...][<ws>:enc][<ws>'url,...][<ws>=docs][#comment]
//! ```
//!
//! * `*` marks the type unregistered, `!` marks it obsolete.
//! * `os:` names the platform of a platform-specific variant.
//! * `@` lists comma-separated extensions.
//! * `:` gives the encoding, one of `base64`, `7bit`, `8bit`, `quoted-printable`.
//! * `'` lists comma-separated reference URLs.
//! * `=` starts free-text documentation. `use-instead:<type>` markers inside it
//!   are moved to [`TypeRecord::use_instead`].
//!
//! Only the media type is required. A line holding nothing but a comment is
//! skipped. Any other line without a media type, or a line that does not match
//! the grammar as a whole, aborts the file.
//!
//! This format is deprecated in favour of the JSON registry files.

use std::path::Path;
use std::sync::LazyLock;

use mimedb_registry::{Container, Encoding, InsertPolicy, TypeRecord};
use regex::{Captures, Regex};
use tracing::warn;

use crate::error::{LoadError, ParseError, ParseErrorKind};

static V1_FORMAT: LazyLock<Result<Regex, regex::Error>> = LazyLock::new(|| {
	Regex::new(
		r"(?x)
		\A\s*
		(\*)?                                          # unregistered
		(!)?                                           # obsolete
		(?:([A-Za-z0-9_]+):)?                          # platform
		(?:([-A-Za-z0-9_.+]+)/([-A-Za-z0-9_.+]+))?     # media type, subtype
		(?:\s+@(\S+))?                                 # extensions
		(?:\s+:(base64|7bit|8bit|quoted-printable))?   # encoding
		(?:\s+'(\S+))?                                 # references
		(?:\s+=(.+))?                                  # documentation
		(?:\s*(\#.*))?                                 # comment
		\s*
		\z",
	)
});

static USE_INSTEAD: LazyLock<Result<Regex, regex::Error>> = LazyLock::new(|| Regex::new(r"use-instead:(\S+)"));

/// Outcome of matching one trimmed line against the v1 grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum V1Line<'a> {
	Blank,
	Comment(&'a str),
	Definition(V1Fields<'a>),
}

/// Raw capture groups of a definition line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct V1Fields<'a> {
	pub unregistered: bool,
	pub obsolete: bool,
	pub platform: Option<&'a str>,
	pub media_type: &'a str,
	pub subtype: &'a str,
	pub extensions: Option<&'a str>,
	pub encoding: Option<&'a str>,
	pub references: Option<&'a str>,
	pub docs: Option<&'a str>,
	pub comment: Option<&'a str>,
}

/// Matches a single line against the v1 grammar.
///
/// Surrounding whitespace is ignored. The error carries no location; callers
/// attach the file and line.
pub fn match_line(line: &str) -> Result<V1Line<'_>, ParseErrorKind> {
	let item = line.trim();
	if item.is_empty() {
		return Ok(V1Line::Blank);
	}

	let re = grammar(&V1_FORMAT)?;
	let caps = re.captures(item).ok_or(ParseErrorKind::Malformed)?;
	let group = |i: usize| caps.get(i).map(|m| m.as_str());

	let (Some(media_type), Some(subtype)) = (group(4), group(5)) else {
		return match group(10) {
			Some(comment) => Ok(V1Line::Comment(comment)),
			None => Err(ParseErrorKind::NoMediaType),
		};
	};

	Ok(V1Line::Definition(fields(&caps, media_type, subtype)))
}

fn fields<'a>(caps: &Captures<'a>, media_type: &'a str, subtype: &'a str) -> V1Fields<'a> {
	let group = |i: usize| caps.get(i).map(|m| m.as_str());
	V1Fields {
		unregistered: group(1).is_some(),
		obsolete: group(2).is_some(),
		platform: group(3),
		media_type,
		subtype,
		extensions: group(6),
		encoding: group(7),
		references: group(8),
		docs: group(9),
		comment: group(10),
	}
}

impl V1Fields<'_> {
	/// Builds the record described by these captures.
	pub fn into_record(self) -> Result<TypeRecord, ParseErrorKind> {
		let mut record = TypeRecord::new(format!("{}/{}", self.media_type, self.subtype))?;

		record.extensions = self.extensions.map(split_list).unwrap_or_default();
		record.encoding = self.encoding.map(str::parse::<Encoding>).transpose()?;
		record.platform = self.platform.map(String::from);
		record.obsolete = self.obsolete;
		record.registered = !self.unregistered;
		record.references = self.references.map(split_list).unwrap_or_default();
		record.comment = self.comment.map(|c| c.trim_start_matches('#').trim().to_string()).filter(|c| !c.is_empty());

		if let Some(docs) = self.docs {
			let use_instead = grammar(&USE_INSTEAD)?;
			record.use_instead = use_instead.captures_iter(docs).map(|c| c[1].to_string()).collect();
			let stripped = use_instead.replace_all(docs, "");
			let squeezed = stripped.split_whitespace().collect::<Vec<_>>().join(" ");
			record.documentation = Some(squeezed).filter(|d| !d.is_empty());
		}

		Ok(record)
	}
}

fn grammar(re: &'static LazyLock<Result<Regex, regex::Error>>) -> Result<&'static Regex, ParseErrorKind> {
	LazyLock::force(re).as_ref().map_err(|e| ParseErrorKind::Grammar(e.to_string()))
}

fn split_list(list: &str) -> Vec<String> {
	list.split(',').filter(|s| !s.is_empty()).map(String::from).collect()
}

/// Parses v1 text into a container.
///
/// Records are added permissively; duplicates within one file are kept
/// without warnings. `file` is only used for diagnostics. Parsing stops at the
/// first bad line.
pub fn parse_v1_str(text: &str, file: &Path) -> Result<Container, ParseError> {
	let mut container = Container::new();

	for (index, line) in text.lines().enumerate() {
		let located = |kind: ParseErrorKind| {
			warn!(domain = "v1", file = %file.display(), line = index, content = line, %kind, "parsing error in v1 media type definition");
			ParseError {
				file: file.to_path_buf(),
				line: index,
				content: line.to_string(),
				kind,
			}
		};

		let fields = match match_line(line).map_err(located)? {
			V1Line::Blank | V1Line::Comment(_) => continue,
			V1Line::Definition(fields) => fields,
		};
		let record = fields.into_record().map_err(located)?;
		container.add(record, InsertPolicy::Silent);
	}

	Ok(container)
}

/// Reads and parses one v1 data file.
///
/// Legacy files predate any encoding rule, so invalid UTF-8 is replaced
/// rather than rejected.
pub fn load_from_v1(path: &Path) -> Result<Container, LoadError> {
	let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
		path: path.to_path_buf(),
		source,
	})?;
	let text = String::from_utf8_lossy(&bytes);
	if let std::borrow::Cow::Owned(_) = text {
		warn!(domain = "v1", file = %path.display(), "replaced invalid UTF-8 in v1 data file");
	}
	Ok(parse_v1_str(&text, path)?)
}
