use super::*;

#[test]
fn io_error_names_the_path() {
    let err = SiteError::io(Path::new("content/index.md"))(std::io::Error::other("denied"));
    assert_eq!(err.error_code(), "E_IO");
    assert_eq!(err.to_string(), "io error at content/index.md: denied");
}

#[test]
fn collision_message_lists_both_sources() {
    let err = SiteError::OutputCollision {
        first: PathBuf::from("a.md"),
        second: PathBuf::from("a/index.md"),
        output: PathBuf::from("a/index.html"),
    };
    assert_eq!(err.to_string(), "a.md and a/index.md both render to a/index.html");
    assert_eq!(err.error_code(), "E_OUTPUT_COLLISION");
}

#[test]
fn template_error_includes_cause_chain() {
    let mut tera = tera::Tera::default();
    let err = tera.add_raw_template("broken.html", "{{ unclosed").unwrap_err();
    let wrapped = SiteError::template("broken.html", &err);
    let SiteError::Template { name, message } = wrapped else {
        panic!("expected template error");
    };
    assert_eq!(name, "broken.html");
    assert!(message.contains("broken.html"), "message was: {message}");
}
