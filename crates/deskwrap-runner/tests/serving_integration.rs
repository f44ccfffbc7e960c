//! End-to-end launch scenarios against real sockets and a real directory.
//!
//! Each test lays out an application directory under the system temp dir,
//! runs the launch sequence through the public API, and talks plain HTTP/1.1
//! to whatever it started.

use std::path::{Path, PathBuf};

use deskwrap_core::{AppConfiguration, BundleNesting, CONFIG_FILE_NAME, MACOS_APP_BUNDLE};
use deskwrap_runner::application::{prepare_launch, LaunchOptions};
use deskwrap_runner::domain::ServerConfig;
use deskwrap_runner::infrastructure::presentation::{
    PresentationHost, RecordingPresentationHost,
};
use deskwrap_runner::infrastructure::LocalContentServer;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

static MAC_ONLY: [BundleNesting; 1] = [MACOS_APP_BUNDLE];

// ── Helpers ───────────────────────────────────────────────────────────────────

struct AppDir {
    root: PathBuf,
}

impl AppDir {
    fn new() -> Self {
        let root = std::env::temp_dir().join(format!("deskwrap-it-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&root).unwrap();
        Self { root }
    }

    fn write(&self, relative: &str, contents: &str) -> PathBuf {
        let path = self.root.join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, contents).unwrap();
        path
    }

    fn write_config(&self, relative_dir: &str, config: &AppConfiguration) {
        let dir = Path::new(relative_dir).join(CONFIG_FILE_NAME);
        self.write(dir.to_str().unwrap(), &config.to_json().unwrap());
    }
}

impl Drop for AppDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.root);
    }
}

/// Issues `GET <path>` against `http://localhost:<port>` and returns
/// (status code, body).
async fn http_get(port: u16, path: &str) -> (u16, String) {
    let mut stream = TcpStream::connect(("127.0.0.1", port)).await.unwrap();
    let request = format!(
        "GET {path} HTTP/1.1\r\nHost: localhost:{port}\r\nConnection: close\r\n\r\n"
    );
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut raw = Vec::new();
    stream.read_to_end(&mut raw).await.unwrap();
    let text = String::from_utf8(raw).unwrap();

    let (head, body) = text.split_once("\r\n\r\n").unwrap();
    let status = head
        .split(' ')
        .nth(1)
        .and_then(|code| code.parse().ok())
        .unwrap();
    (status, body.to_string())
}

fn demo_config(target: &str) -> AppConfiguration {
    AppConfiguration::new("Demo", 800, 600, target).unwrap()
}

// ── Scenarios ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_demo_app_end_to_end() {
    // Arrange
    let app = AppDir::new();
    app.write("index.html", "<h1>hi</h1>");
    app.write_config(".", &demo_config("index.html"));
    let options = LaunchOptions {
        nestings: &[],
        ..LaunchOptions::for_executable(app.root.join("runner"))
    };

    // Act
    let plan = prepare_launch(&options).await.expect("prepare");

    // Assert
    let port = plan.server().expect("local server").port();
    assert_eq!(plan.address.as_str(), format!("http://localhost:{port}"));
    assert_eq!(http_get(port, "/index.html").await, (200, "<h1>hi</h1>".to_string()));
    assert_eq!(http_get(port, "/").await, (200, "<h1>hi</h1>".to_string()));
}

#[tokio::test]
async fn test_missing_path_is_404_and_server_keeps_running() {
    // Arrange
    let app = AppDir::new();
    app.write("index.html", "<h1>hi</h1>");
    app.write_config(".", &demo_config("index.html"));
    let options = LaunchOptions {
        nestings: &[],
        ..LaunchOptions::for_executable(app.root.join("runner"))
    };
    let plan = prepare_launch(&options).await.unwrap();
    let port = plan.server().unwrap().port();

    // Act
    let (missing, _) = http_get(port, "/does/not/exist.js").await;
    let (after, body) = http_get(port, "/index.html").await;

    // Assert
    assert_eq!(missing, 404);
    assert_eq!((after, body.as_str()), (200, "<h1>hi</h1>"));
}

#[tokio::test]
async fn test_remote_target_passes_through_without_server() {
    let app = AppDir::new();
    app.write_config(".", &demo_config("https://github.com"));
    let options = LaunchOptions::for_executable(app.root.join("runner"));

    let plan = prepare_launch(&options).await.unwrap();

    assert_eq!(plan.address.as_str(), "https://github.com");
    assert!(plan.server().is_none());
    assert!(!plan.address.is_local());
}

#[tokio::test]
async fn test_two_servers_get_distinct_unprivileged_ports() {
    // Arrange
    let app = AppDir::new();
    app.write("index.html", "x");
    let config = ServerConfig::default();

    // Act: both alive at once
    let first = LocalContentServer::start(&config, app.root.clone(), None)
        .await
        .unwrap();
    let second = LocalContentServer::start(&config, app.root.clone(), None)
        .await
        .unwrap();

    // Assert
    assert_ne!(first.port(), second.port());
    for port in [first.port(), second.port()] {
        assert!(port >= 1024, "port {port}");
    }
}

#[tokio::test]
async fn test_macos_bundle_serves_from_directory_containing_app() {
    // Arrange: <root>/Demo.app/Contents/MacOS/{runner,config.json} with the
    // content next to Demo.app
    let app = AppDir::new();
    app.write("index.html", "<h1>bundled</h1>");
    app.write_config("Demo.app/Contents/MacOS", &demo_config("index.html"));
    let exe = app.root.join("Demo.app/Contents/MacOS/runner");
    let options = LaunchOptions {
        nestings: &MAC_ONLY,
        ..LaunchOptions::for_executable(exe)
    };

    // Act
    let plan = prepare_launch(&options).await.unwrap();

    // Assert
    let port = plan.server().unwrap().port();
    assert_eq!(
        http_get(port, "/").await,
        (200, "<h1>bundled</h1>".to_string())
    );
}

#[tokio::test]
async fn test_subdirectory_entry_redirects_root() {
    // Arrange
    let app = AppDir::new();
    app.write("docs/guide.html", "guide");
    app.write_config(".", &demo_config("docs/guide.html"));
    let options = LaunchOptions {
        nestings: &[],
        ..LaunchOptions::for_executable(app.root.join("runner"))
    };
    let plan = prepare_launch(&options).await.unwrap();
    let port = plan.server().unwrap().port();

    // Act
    let mut stream = TcpStream::connect(("127.0.0.1", port)).await.unwrap();
    stream
        .write_all(b"GET / HTTP/1.1\r\nConnection: close\r\n\r\n")
        .await
        .unwrap();
    let mut raw = String::new();
    stream.read_to_string(&mut raw).await.unwrap();

    // Assert
    assert!(raw.starts_with("HTTP/1.1 302 Found\r\n"), "{raw}");
    assert!(raw.contains("Location: /docs/guide.html\r\n"));
    assert_eq!(http_get(port, "/docs/guide.html").await, (200, "guide".to_string()));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_presented_window_matches_config() {
    // Arrange
    let app = AppDir::new();
    app.write("index.html", "<h1>hi</h1>");
    app.write_config(".", &demo_config("index.html"));
    let options = LaunchOptions {
        nestings: &[],
        ..LaunchOptions::for_executable(app.root.join("runner"))
    };
    let plan = prepare_launch(&options).await.unwrap();
    let expected = plan.address.clone();
    let host = RecordingPresentationHost::new();

    // Act
    tokio::task::block_in_place(|| plan.present(&host)).unwrap();

    // Assert
    let shown = host.presented();
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].title, "Demo");
    assert_eq!((shown[0].width, shown[0].height), (800, 600));
    assert_eq!(shown[0].address, expected);
}

#[test]
fn test_recording_host_is_usable_as_trait_object() {
    let host: Box<dyn PresentationHost> = Box::new(RecordingPresentationHost::new());
    let spec = deskwrap_runner::domain::WindowSpec::new(
        &demo_config("https://example.com"),
        deskwrap_core::ResolvedAddress::remote("https://example.com").unwrap(),
    );

    assert!(host.present(spec).is_ok());
}
