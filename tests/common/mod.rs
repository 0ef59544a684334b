//! Shared utilities for integration testing.
//!
//! Compiled into every test binary; not every binary uses every helper.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::Mutex;

use forward_proxy::accesslog::{AccessLogRecord, AccessLogWriter};
use forward_proxy::admin::{self, AdminState};
use forward_proxy::config::{save_config, ConfigStore, ConfigWatcher, ProxyConfig};
use forward_proxy::http::server::{upstream_connector, AppState};
use forward_proxy::HttpServer;

/// One request captured by a mock destination.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub request_line: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl CapturedRequest {
    /// First value of a header, by lowercase name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn header_values(&self, name: &str) -> Vec<&str> {
        self.headers
            .iter()
            .filter(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
            .collect()
    }
}

/// Start a mock destination server that records every request it receives.
///
/// Responds 200 with body "ok" and a header mix: two Set-Cookie lines plus
/// hop-by-hop headers a proxy must strip before relaying.
pub async fn start_capturing_destination() -> (SocketAddr, Arc<Mutex<Vec<CapturedRequest>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let captured = Arc::new(Mutex::new(Vec::new()));
    let sink = captured.clone();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let sink = sink.clone();
                    tokio::spawn(async move {
                        if let Some(request) = read_request(&mut socket).await {
                            sink.lock().await.push(request);
                        }
                        let response = "HTTP/1.1 200 OK\r\n\
                             Content-Length: 2\r\n\
                             Set-Cookie: a=1\r\n\
                             Set-Cookie: b=2\r\n\
                             Keep-Alive: timeout=5\r\n\
                             X-Upstream: mock\r\n\
                             Connection: close\r\n\
                             \r\n\
                             ok";
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    (addr, captured)
}

/// Read one request (head plus content-length body) off the socket.
async fn read_request(socket: &mut tokio::net::TcpStream) -> Option<CapturedRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 2048];

    loop {
        if let Some(head_end) = find_head_end(&buf) {
            let head = String::from_utf8_lossy(&buf[..head_end]).to_string();
            let content_length = head
                .lines()
                .find_map(|line| {
                    let (key, value) = line.split_once(':')?;
                    if key.eq_ignore_ascii_case("content-length") {
                        value.trim().parse::<usize>().ok()
                    } else {
                        None
                    }
                })
                .unwrap_or(0);
            if buf.len() >= head_end + 4 + content_length {
                let body =
                    String::from_utf8_lossy(&buf[head_end + 4..head_end + 4 + content_length])
                        .to_string();
                return parse_head(&head, body);
            }
        }

        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => return None,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }
}

fn find_head_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|window| window == b"\r\n\r\n")
}

fn parse_head(head: &str, body: String) -> Option<CapturedRequest> {
    let mut lines = head.split("\r\n");
    let request_line = lines.next()?.to_string();
    let headers = lines
        .filter_map(|line| {
            let (key, value) = line.split_once(':')?;
            Some((key.to_ascii_lowercase(), value.trim().to_string()))
        })
        .collect();
    Some(CapturedRequest {
        request_line,
        headers,
        body,
    })
}

/// A fully wired proxy instance under test.
pub struct TestProxy {
    pub proxy_addr: SocketAddr,
    pub proxy_url: String,
    pub admin_url: String,
    pub access_log: PathBuf,
    pub config_path: PathBuf,
    _watch_guard: notify::RecommendedWatcher,
    _dir: tempfile::TempDir,
}

/// Spawn proxy and admin listeners on ephemeral ports, wired the same way
/// the binary wires them.
pub async fn spawn_proxy(config: ProxyConfig) -> TestProxy {
    spawn_proxy_with(config, false).await
}

pub async fn spawn_proxy_with_assets(config: ProxyConfig) -> TestProxy {
    spawn_proxy_with(config, true).await
}

async fn spawn_proxy_with(mut config: ProxyConfig, with_assets: bool) -> TestProxy {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("user-config.json");
    let access_log = dir.path().join("access.log");
    config.settings.access_log = access_log.display().to_string();
    save_config(&config_path, &config).await.unwrap();

    let assets_dir = dir.path().join("dist");
    if with_assets {
        std::fs::create_dir(&assets_dir).unwrap();
        std::fs::write(
            assets_dir.join("index.html"),
            "<!doctype html><title>Proxy Admin</title>",
        )
        .unwrap();
        std::fs::write(assets_dir.join("app.js"), "console.log(\"admin\");").unwrap();
    }

    let store = ConfigStore::new(config);
    let (writer, _writer_task) = AccessLogWriter::spawn(&access_log);

    let (watcher, mut updates) = ConfigWatcher::new(&config_path);
    let watch_guard = watcher.run().unwrap();
    let reload_store = store.clone();
    tokio::spawn(async move {
        while let Some(config) = updates.recv().await {
            reload_store.replace(config);
        }
    });

    let proxy_listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let proxy_addr = proxy_listener.local_addr().unwrap();
    let admin_listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let admin_addr = admin_listener.local_addr().unwrap();

    let proxy = HttpServer::new(AppState {
        config: store.clone(),
        access_log: writer,
        connector: upstream_connector(),
    });
    tokio::spawn(async move {
        let _ = proxy.run(proxy_listener).await;
    });

    let router = admin::setup_admin_router(
        AdminState {
            config: store,
            config_path: config_path.clone(),
            access_log_path: access_log.clone(),
        },
        &assets_dir,
    );
    tokio::spawn(async move {
        let _ = admin::serve(admin_listener, router).await;
    });

    TestProxy {
        proxy_addr,
        proxy_url: format!("http://{proxy_addr}"),
        admin_url: format!("http://{admin_addr}"),
        access_log,
        config_path,
        _watch_guard: watch_guard,
        _dir: dir,
    }
}

/// Client that routes everything through the proxy under test.
pub fn proxied_client(proxy_url: &str) -> reqwest::Client {
    reqwest::Client::builder()
        .proxy(reqwest::Proxy::http(proxy_url).unwrap())
        .build()
        .unwrap()
}

/// Client that talks to the admin API directly.
pub fn direct_client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

/// Poll the access log until it holds `expected` parseable records.
pub async fn read_log_records(proxy: &TestProxy, expected: usize) -> Vec<AccessLogRecord> {
    for _ in 0..100 {
        if let Ok(content) = std::fs::read_to_string(&proxy.access_log) {
            let records: Vec<AccessLogRecord> = content
                .lines()
                .filter_map(|line| serde_json::from_str(line).ok())
                .collect();
            if records.len() >= expected {
                return records;
            }
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!(
        "access log at {} never reached {} records",
        proxy.access_log.display(),
        expected
    );
}
