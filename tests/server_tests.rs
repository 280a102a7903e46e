use std::net::SocketAddr;

use tokio::net::TcpListener;

async fn start(root: &std::path::Path) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let root = root.to_path_buf();
    tokio::spawn(async move { rschat::server::serve(listener, root).await });
    addr
}

fn web_root() -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("index.html"), "<h1>chat</h1>").unwrap();
    std::fs::write(dir.path().join("script.js"), "console.log('hi');").unwrap();
    std::fs::write(dir.path().join("my file.txt"), "spaced").unwrap();
    dir
}

#[tokio::test]
async fn serves_index_and_assets_with_cors() {
    let root = web_root();
    let addr = start(root.path()).await;
    let client = reqwest::Client::new();

    let res = client.get(format!("http://{addr}/")).send().await.unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(res.headers()["access-control-allow-origin"], "*");
    assert_eq!(
        res.headers()["access-control-allow-methods"],
        "GET, POST, PUT, DELETE, OPTIONS"
    );
    assert_eq!(
        res.headers()["access-control-allow-headers"],
        "Content-Type, Authorization"
    );
    assert!(
        res.headers()["content-type"]
            .to_str()
            .unwrap()
            .starts_with("text/html")
    );
    assert_eq!(res.text().await.unwrap(), "<h1>chat</h1>");

    let res = client
        .get(format!("http://{addr}/script.js"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    assert!(
        res.headers()["content-type"]
            .to_str()
            .unwrap()
            .starts_with("text/javascript")
    );
}

#[tokio::test]
async fn preflight_is_answered_with_ok() {
    let root = web_root();
    let addr = start(root.path()).await;

    let res = reqwest::Client::new()
        .request(reqwest::Method::OPTIONS, format!("http://{addr}/anything"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    assert_eq!(res.headers()["access-control-allow-origin"], "*");
}

#[tokio::test]
async fn missing_files_are_not_found() {
    let root = web_root();
    let addr = start(root.path()).await;

    let res = reqwest::get(format!("http://{addr}/missing.css")).await.unwrap();
    assert_eq!(res.status(), 404);
    assert_eq!(res.headers()["access-control-allow-origin"], "*");
}

#[tokio::test]
async fn percent_encoded_paths_are_decoded() {
    let root = web_root();
    let addr = start(root.path()).await;

    let res = reqwest::get(format!("http://{addr}/my%20file.txt")).await.unwrap();
    assert_eq!(res.status(), 200);
    assert!(
        res.headers()["content-type"]
            .to_str()
            .unwrap()
            .starts_with("text/plain")
    );
    assert_eq!(res.text().await.unwrap(), "spaced");
}

#[tokio::test]
async fn encoded_traversal_is_not_found() {
    let outer = tempfile::tempdir().expect("tempdir");
    std::fs::write(outer.path().join("secret.txt"), "hidden").unwrap();
    let root = outer.path().join("web");
    std::fs::create_dir(&root).unwrap();
    std::fs::write(root.join("index.html"), "<h1>chat</h1>").unwrap();
    let addr = start(&root).await;

    let res = reqwest::get(format!("http://{addr}/%2e%2e/secret.txt")).await.unwrap();
    assert_eq!(res.status(), 404);
}
