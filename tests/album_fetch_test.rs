//! Album fetch against a simulated API.
//!
//! wiremock stands in for `GET <base>/albums`; a raw TCP listener covers the
//! malformed-HTTP and truncated-body cases and a closed port covers an
//! unreachable network.

use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use reqwest::Url;
use songbook::config::parse_base_url;
use songbook::network::client::{albums_url, create_client};
use songbook::{fetch_albums, Album, AlbumFetchState, FetchError, FetchState};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn endpoint(mock_server: &MockServer) -> Url {
    albums_url(&parse_base_url(&mock_server.uri()).unwrap()).unwrap()
}

fn client() -> reqwest::Client {
    create_client(5).unwrap()
}

/// URL on a port nothing is listening on
fn closed_port_url() -> Url {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    Url::parse(&format!("http://127.0.0.1:{}/albums", port)).unwrap()
}

#[tokio::test]
async fn success_keeps_server_order() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/albums"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "userId": 1, "id": 3, "title": "omnis laborum odio" },
            { "userId": 1, "id": 1, "title": "quidem molestiae enim" },
            { "userId": 2, "id": 2, "title": "sunt qui excepturi" }
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut cell = AlbumFetchState::new();
    let state = cell.run(&client(), &endpoint(&mock_server)).await;

    let FetchState::Success { albums } = state else {
        panic!("expected success, got {:?}", state);
    };
    let ids: Vec<i64> = albums.iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![3, 1, 2]);
    assert_eq!(
        albums[2],
        Album {
            user_id: 2,
            id: 2,
            title: "sunt qui excepturi".into()
        }
    );
}

#[tokio::test]
async fn empty_body_is_empty_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/albums"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let state = FetchState::from(fetch_albums(&client(), &endpoint(&mock_server)).await);
    assert_eq!(state, FetchState::Success { albums: vec![] });
}

#[tokio::test]
async fn null_body_is_empty_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/albums"))
        .respond_with(ResponseTemplate::new(200).set_body_string("null"))
        .mount(&mock_server)
        .await;

    let albums = fetch_albums(&client(), &endpoint(&mock_server)).await.unwrap();
    assert!(albums.is_empty());
}

#[tokio::test]
async fn not_found_reports_status_code() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/albums"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let mut cell = AlbumFetchState::new();
    let state = cell.run(&client(), &endpoint(&mock_server)).await;
    match state {
        FetchState::Error { message } => assert!(message.contains("404"), "{}", message),
        other => panic!("expected error, got {:?}", other),
    }
}

#[tokio::test]
async fn server_error_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/albums"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&mock_server)
        .await;

    let err = fetch_albums(&client(), &endpoint(&mock_server)).await.unwrap_err();
    assert!(matches!(err, FetchError::Status(503)));
}

#[tokio::test]
async fn unreachable_network_reports_network_error() {
    let mut cell = AlbumFetchState::new();
    let state = cell.run(&client(), &closed_port_url()).await;
    assert_eq!(
        state,
        &FetchState::Error {
            message: "Network error".into()
        }
    );
}

#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[tokio::test]
async fn unreachable_network_logs_the_cause() {
    let logs = LogBuffer::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let err = fetch_albums(&client(), &closed_port_url()).await.unwrap_err();
    assert!(matches!(err, FetchError::Transport(_)));

    let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
    assert!(output.contains("Album request failed"), "{}", output);
    assert!(output.contains("error="), "{}", output);
}

#[tokio::test]
async fn malformed_json_is_http_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/albums"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"albums\": ["))
        .mount(&mock_server)
        .await;

    let err = fetch_albums(&client(), &endpoint(&mock_server)).await.unwrap_err();
    assert!(matches!(err, FetchError::Protocol { .. }));
    assert_eq!(err.to_string(), "HTTP error");
}

/// One-shot HTTP server that reads the request head and answers with `reply`
async fn serve_raw(reply: &'static [u8]) -> std::net::SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = vec![0u8; 4096];
        let mut seen = Vec::new();
        while !seen.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            seen.extend_from_slice(&buf[..n]);
        }
        socket.write_all(reply).await.unwrap();
        let _ = socket.shutdown().await;
    });

    addr
}

#[tokio::test]
async fn malformed_http_is_http_error() {
    let addr = serve_raw(b"THIS IS NOT HTTP\r\n\r\n").await;

    let url = Url::parse(&format!("http://{}/albums", addr)).unwrap();
    let state = FetchState::from(fetch_albums(&client(), &url).await);
    assert_eq!(
        state,
        FetchState::Error {
            message: "HTTP error".into()
        }
    );
}

#[tokio::test]
async fn truncated_body_is_network_error() {
    let addr = serve_raw(b"HTTP/1.1 200 OK\r\nContent-Length: 100\r\n\r\n[{\"userId\": 1").await;

    let url = Url::parse(&format!("http://{}/albums", addr)).unwrap();
    let err = fetch_albums(&client(), &url).await.unwrap_err();
    assert!(matches!(err, FetchError::Transport(_)), "{:?}", err);
    assert_eq!(err.to_string(), "Network error");
}

#[tokio::test]
async fn timeout_reports_network_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/albums"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!([]))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let impatient = reqwest::Client::builder()
        .timeout(Duration::from_millis(300))
        .build()
        .unwrap();
    let mut cell = AlbumFetchState::new();
    let state = cell.run(&impatient, &endpoint(&mock_server)).await;
    assert_eq!(
        state,
        &FetchState::Error {
            message: "Network error".into()
        }
    );
}

#[tokio::test]
async fn loading_precedes_single_terminal_state() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/albums"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut cell = AlbumFetchState::new();
    assert_eq!(cell.state(), &FetchState::Loading);

    cell.run(&client(), &endpoint(&mock_server)).await;
    let attempt = cell.attempt();
    assert_eq!(cell.state(), &FetchState::Success { albums: vec![] });

    // A second outcome for the settled attempt is refused
    assert!(!cell.complete(
        attempt,
        FetchState::Error {
            message: "Network error".into()
        }
    ));
    assert_eq!(cell.state(), &FetchState::Success { albums: vec![] });
}
