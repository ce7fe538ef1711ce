use super::*;

async fn spawn(site_dir: &Path) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = router(site_dir);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn site_fixture() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "<h1>home</h1>").unwrap();
    std::fs::create_dir_all(dir.path().join("week-01")).unwrap();
    std::fs::write(dir.path().join("week-01/index.html"), "<h1>week one</h1>").unwrap();
    std::fs::write(dir.path().join("highlight.css"), ".hl-source { color: red; }").unwrap();
    dir
}

#[tokio::test]
async fn healthz_returns_ok() {
    let dir = site_fixture();
    let base = spawn(dir.path()).await;

    let response = reqwest::get(format!("{base}/healthz")).await.unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::OK);
}

#[tokio::test]
async fn root_serves_index_html() {
    let dir = site_fixture();
    let base = spawn(dir.path()).await;

    let body = reqwest::get(format!("{base}/")).await.unwrap().text().await.unwrap();

    assert_eq!(body, "<h1>home</h1>");
}

#[tokio::test]
async fn directory_url_serves_its_index() {
    let dir = site_fixture();
    let base = spawn(dir.path()).await;

    let body = reqwest::get(format!("{base}/week-01/")).await.unwrap().text().await.unwrap();

    assert_eq!(body, "<h1>week one</h1>");
}

#[tokio::test]
async fn stylesheet_has_css_content_type() {
    let dir = site_fixture();
    let base = spawn(dir.path()).await;

    let response = reqwest::get(format!("{base}/highlight.css")).await.unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let content_type = response.headers()[reqwest::header::CONTENT_TYPE].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/css"), "content type was {content_type}");
}

#[tokio::test]
async fn missing_file_is_not_found() {
    let dir = site_fixture();
    let base = spawn(dir.path()).await;

    let response = reqwest::get(format!("{base}/nope.html")).await.unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
}
