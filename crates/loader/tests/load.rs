//! Integration tests for directory loading in both data formats.

use std::fs;
use std::path::Path;

use mimedb_loader::{LoadError, Loader, ParseErrorKind, v1};
use mimedb_registry::{Container, Encoding, InsertPolicy, TypeRecord};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn write_file(path: &Path, content: &str) {
	if let Some(parent) = path.parent() {
		fs::create_dir_all(parent).expect("parent dir should be creatable");
	}
	fs::write(path, content).expect("file should be writable");
}

#[test]
fn json_files_load_in_sorted_order() {
	let root = tempfile::tempdir().expect("must create tempdir");
	write_file(&root.path().join("text.json"), r#"[{"content-type": "text/plain", "extensions": ["txt"], "docs": "second"}]"#);
	write_file(
		&root.path().join("application.json"),
		r#"[{"content-type": "text/plain", "extensions": ["txt"], "docs": "first"}, {"content-type": "application/json", "extensions": ["json"]}]"#,
	);
	write_file(&root.path().join("ignored.txt"), "not/json");

	let container = Loader::new(root.path()).load().expect("json data should load");

	let docs: Vec<_> = container.get("text/plain").iter().map(|r| r.documentation.as_deref()).collect();
	assert_eq!(docs, vec![Some("first"), Some("second")]);
	assert_eq!(container.keys().collect::<Vec<_>>(), vec!["text/plain", "application/json"]);
	assert_eq!(container.record_count(), 3);
}

#[test]
fn json_load_reports_the_bad_file() {
	let root = tempfile::tempdir().expect("must create tempdir");
	write_file(&root.path().join("broken.json"), "{ not json");

	match Loader::new(root.path()).load_json() {
		Err(LoadError::Json { path, .. }) => assert!(path.ends_with("broken.json")),
		other => panic!("expected a JSON error, got {other:?}"),
	}
}

#[test]
fn json_load_appends_to_an_existing_container() {
	let root = tempfile::tempdir().expect("must create tempdir");
	write_file(&root.path().join("types.json"), r#"[{"content-type": "text/css"}]"#);

	let seed: Container = [TypeRecord::new("text/html").unwrap()].into_iter().collect();
	let container = Loader::with_container(root.path(), seed).load_json().unwrap();
	assert_eq!(container.keys().collect::<Vec<_>>(), vec!["text/html", "text/css"]);
}

#[cfg(unix)]
#[test]
fn symlinked_json_file_is_loaded() {
	let root = tempfile::tempdir().expect("must create tempdir");
	let store = tempfile::tempdir().expect("must create tempdir");
	write_file(&store.path().join("real.json"), r#"[{"content-type": "text/plain"}]"#);
	std::os::unix::fs::symlink(store.path().join("real.json"), root.path().join("text.json")).expect("symlink should be creatable");

	let container = Loader::new(root.path()).load().expect("json data should load");
	assert_eq!(container.record_count(), 1);
	assert_eq!(container.get("text/plain").len(), 1);
}

#[cfg(unix)]
#[test]
fn json_load_reports_a_directory_loop() {
	let root = tempfile::tempdir().expect("must create tempdir");
	write_file(&root.path().join("types.json"), r#"[{"content-type": "text/css"}]"#);
	std::os::unix::fs::symlink(root.path(), root.path().join("again")).expect("symlink should be creatable");

	match Loader::new(root.path()).load_json() {
		Err(LoadError::Walk { path, .. }) => assert!(path.ends_with("again")),
		other => panic!("expected a walk error, got {other:?}"),
	}
}

#[test]
fn missing_data_dir_loads_empty() {
	let root = tempfile::tempdir().expect("must create tempdir");
	let container = Loader::new(root.path().join("absent")).load().unwrap();
	assert!(container.is_empty());
}

#[test]
#[allow(deprecated)]
fn v1_merges_files_and_warns_on_cross_file_duplicates() {
	let root = tempfile::tempdir().expect("must create tempdir");
	write_file(&root.path().join("a/types"), "# text types\ntext/plain @txt :8bit\ntext/plain @txt\n");
	write_file(&root.path().join("b/types"), "text/plain @txt\n\nimage/png @png :base64\n");
	write_file(&root.path().join("b/skip.json"), "[]");
	write_file(&root.path().join("b/skip.yml"), "- garbage");

	let report = Loader::new(root.path()).load_v1().expect("v1 data should load");

	assert_eq!(report.container.get("text/plain").len(), 3);
	assert_eq!(report.container.get("image/png")[0].encoding, Some(Encoding::Base64));
	// Parsing a single file is permissive; repeats surface once the file is
	// merged into the registry.
	assert_eq!(report.warnings.len(), 2);
	assert!(report.warnings.iter().all(|w| w.key == "text/plain"));
}

#[test]
#[allow(deprecated)]
fn v1_aborts_on_first_bad_line() {
	let root = tempfile::tempdir().expect("must create tempdir");
	write_file(&root.path().join("types"), "text/plain @txt\n!\ntext/html @html\n");

	match Loader::new(root.path()).load_v1() {
		Err(LoadError::Parse(err)) => {
			assert!(err.file.ends_with("types"));
			assert_eq!(err.line, 1);
			assert_eq!(err.kind, ParseErrorKind::NoMediaType);
		}
		other => panic!("expected a parse error, got {other:?}"),
	}
}

#[test]
fn v1_file_with_only_comments_is_empty() {
	let root = tempfile::tempdir().expect("must create tempdir");
	let file = root.path().join("comments");
	write_file(&file, "# one\n\n   # two\n");

	let container = v1::load_from_v1(&file).unwrap();
	assert!(container.is_empty());
}

#[test]
fn v1_missing_file_is_io_error() {
	let root = tempfile::tempdir().expect("must create tempdir");
	assert!(matches!(v1::load_from_v1(&root.path().join("absent")), Err(LoadError::Io { .. })));
}

fn token() -> impl Strategy<Value = String> {
	"[a-z0-9][a-z0-9.+-]{0,8}"
}

proptest! {
	#[test]
	fn v1_line_decomposes_into_its_fields(
		unregistered in any::<bool>(),
		obsolete in any::<bool>(),
		platform in proptest::option::of("[a-z]{1,6}"),
		top in token(),
		sub in token(),
		extensions in proptest::collection::vec("[a-z0-9]{1,5}", 0..4),
		encoding in proptest::option::of(prop_oneof![
			Just(Encoding::Base64),
			Just(Encoding::SevenBit),
			Just(Encoding::EightBit),
			Just(Encoding::QuotedPrintable),
		]),
		docs in proptest::option::of("[A-Za-z]{1,8}( [A-Za-z]{1,8}){0,3}"),
	) {
		let mut line = String::new();
		if unregistered { line.push('*'); }
		if obsolete { line.push('!'); }
		if let Some(os) = &platform { line.push_str(&format!("{os}:")); }
		line.push_str(&format!("{top}/{sub}"));
		if !extensions.is_empty() { line.push_str(&format!(" @{}", extensions.join(","))); }
		if let Some(enc) = encoding { line.push_str(&format!(" :{enc}")); }
		if let Some(docs) = &docs { line.push_str(&format!(" ={docs}")); }

		let container = v1::parse_v1_str(&line, Path::new("prop")).unwrap();
		let records: Vec<_> = container.records().collect();
		prop_assert_eq!(records.len(), 1);

		let mut expected = TypeRecord::new(format!("{top}/{sub}")).unwrap();
		expected.registered = !unregistered;
		expected.obsolete = obsolete;
		expected.platform = platform;
		expected.extensions = extensions;
		expected.encoding = encoding;
		expected.documentation = docs;
		prop_assert_eq!(records[0], &expected);
	}
}

#[test]
fn merging_a_parsed_file_into_an_empty_registry_preserves_it() {
	let parsed = v1::parse_v1_str("text/plain @txt\n", Path::new("inline")).unwrap();
	let mut registry = Container::new();
	assert!(registry.merge(parsed.clone(), InsertPolicy::StrictWarn).is_empty());
	assert_eq!(registry, parsed);
}
