use super::*;
use crate::config::DEFAULT_PASSTHROUGH;

fn defaults() -> Passthrough {
    Passthrough::new(&DEFAULT_PASSTHROUGH).unwrap()
}

#[test]
fn default_patterns_match_nested_assets() {
    let passthrough = defaults();
    assert!(passthrough.matches(Path::new("week-01/schema.sql")));
    assert!(passthrough.matches(Path::new("week-01/diagram.svg")));
    assert!(passthrough.matches(Path::new("notes/setup/install.sh")));
    assert!(passthrough.matches(Path::new("data/config.yaml")));
    assert!(passthrough.matches(Path::new("img/deep/tree/photo.png")));
    assert!(passthrough.matches(Path::new("assets/css/site.css")));
}

#[test]
fn default_patterns_match_top_level_files() {
    let passthrough = defaults();
    assert!(passthrough.matches(Path::new("logo.svg")));
    assert!(passthrough.matches(Path::new("compose.yaml")));
}

#[test]
fn pages_are_not_passthrough() {
    let passthrough = defaults();
    assert!(!passthrough.matches(Path::new("index.md")));
    assert!(!passthrough.matches(Path::new("guide/page.html")));
    assert!(!passthrough.matches(Path::new("notes.yml")));
}

#[test]
fn matching_pattern_reports_first_match() {
    let passthrough = defaults();
    assert_eq!(passthrough.matching_pattern(Path::new("assets/logo.svg")), Some("**/*.svg"));
    assert_eq!(passthrough.matching_pattern(Path::new("README.md")), None);
}

#[test]
fn empty_pattern_list_matches_nothing() {
    let passthrough = Passthrough::new::<&str>(&[]).unwrap();
    assert!(!passthrough.matches(Path::new("a.png")));
    assert_eq!(passthrough.patterns().count(), 0);
}

#[test]
fn invalid_pattern_is_reported() {
    let err = Passthrough::new(&["assets/{css,js"]).err().unwrap();
    assert_eq!(err.error_code(), "E_PATTERN");
    assert!(err.to_string().contains("assets/{css,js"));
}

#[test]
fn copy_file_creates_parent_directories() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(input.path().join("week-01")).unwrap();
    std::fs::write(input.path().join("week-01/schema.sql"), "select 1;\n").unwrap();

    let bytes = copy_file(input.path(), output.path(), Path::new("week-01/schema.sql")).unwrap();

    assert_eq!(bytes, 10);
    assert_eq!(std::fs::read_to_string(output.path().join("week-01/schema.sql")).unwrap(), "select 1;\n");
}

#[test]
fn copy_file_missing_source_is_io_error() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    let err = copy_file(input.path(), output.path(), Path::new("missing.png")).unwrap_err();
    assert_eq!(err.error_code(), "E_IO");
}
