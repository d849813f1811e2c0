use concord_cam::{
    ConcordCam, ConcordError, Network, Snapshot, SystemInfo, Video, VideoStreamPatch,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tokio::time::Duration;

/// Minimal canned-response camera. Serves one queued response per
/// connection (every response carries `Connection: close`, so the client
/// reconnects for each request) and records what it was sent.
struct FakeCamera {
    addr: std::net::SocketAddr,
    requests: Arc<Mutex<Vec<String>>>,
}

impl FakeCamera {
    async fn serve(responses: Vec<Vec<u8>>) -> FakeCamera {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests: Arc<Mutex<Vec<String>>> = Arc::default();

        let seen = Arc::clone(&requests);
        tokio::spawn(async move {
            for response in responses {
                let Ok((mut socket, _)) = listener.accept().await else {
                    return;
                };
                let request = read_request(&mut socket).await;
                seen.lock().await.push(request);
                let _ = socket.write_all(&response).await;
                let _ = socket.flush().await;
            }
        });

        FakeCamera { addr, requests }
    }

    fn client(&self) -> ConcordCam {
        ConcordCam::new("127.0.0.1")
            .with_port(self.addr.port())
            .with_credentials("admin", "")
            .with_timeout(Duration::from_secs(2))
    }

    async fn requests(&self) -> Vec<String> {
        self.requests.lock().await.clone()
    }
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = socket.read(&mut chunk).await.unwrap_or(0);
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        if let Some(header_end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&buf[..header_end]);
            let content_length = head
                .lines()
                .filter_map(|line| line.split_once(':'))
                .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
                .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= header_end + 4 + content_length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

fn http_response(status_line: &str, content_type: &str, extra: &[&str], body: &[u8]) -> Vec<u8> {
    let mut head = format!(
        "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n",
        status_line,
        content_type,
        body.len()
    );
    for header in extra {
        head.push_str(header);
        head.push_str("\r\n");
    }
    head.push_str("\r\n");

    let mut response = head.into_bytes();
    response.extend_from_slice(body);
    response
}

fn envelope_ok(data: &str) -> Vec<u8> {
    http_response(
        "200 OK",
        "application/json",
        &[],
        format!(r#"{{"result":0,"data":{}}}"#, data).as_bytes(),
    )
}

fn envelope_result(code: u32) -> Vec<u8> {
    http_response(
        "200 OK",
        "application/json",
        &[],
        format!(r#"{{"result":{}}}"#, code).as_bytes(),
    )
}

fn request_body(request: &str) -> Value {
    let (_, body) = request.split_once("\r\n\r\n").expect("request has no body");
    serde_json::from_str(body).expect("request body is not JSON")
}

#[tokio::test]
async fn getter_passes_network_settings_through() {
    let camera = FakeCamera::serve(vec![envelope_ok(
        r#"{"dhcp":0,"ip":"192.168.1.10","netmask":"255.255.255.0","gateway":"192.168.1.1",
            "dns1":"8.8.8.8","dns2":"1.1.1.1","http_port":80,"rtsp_port":554}"#,
    )])
    .await;

    let network = camera.client().get_network_settings().await.unwrap();
    assert_eq!(network.dhcp, 0);
    assert_eq!(network.ip, "192.168.1.10");
    assert_eq!(network.netmask, "255.255.255.0");
    assert_eq!(network.http_port, 80);
    assert_eq!(network.rtsp_port, 554);

    let requests = camera.requests().await;
    assert!(requests[0].starts_with("GET /api/v1/system/network HTTP/1.1"));
    assert!(requests[0].to_lowercase().contains("authorization: basic"));
}

#[tokio::test]
async fn vendor_result_codes_surface_as_typed_errors() {
    let camera = FakeCamera::serve(vec![envelope_result(2)]).await;
    let err = camera.client().get_system_info().await.unwrap_err();
    assert!(matches!(err, ConcordError::AuthenticationError(_)), "{err}");

    let camera = FakeCamera::serve(vec![envelope_result(4)]).await;
    let err = camera.client().get_network_settings().await.unwrap_err();
    assert!(matches!(err, ConcordError::NotFoundError(_)), "{err}");

    let camera = FakeCamera::serve(vec![envelope_result(6)]).await;
    let err = camera.client().get_video_stream(0).await.unwrap_err();
    assert!(matches!(err, ConcordError::DeviceBusyError(_)), "{err}");
}

#[tokio::test]
async fn setter_sends_only_supplied_fields() {
    let camera = FakeCamera::serve(vec![envelope_result(0)]).await;

    let patch = VideoStreamPatch {
        bitrate: Some(4096),
        ..Default::default()
    };
    camera.client().set_video_stream(0, &patch).await.unwrap();

    let requests = camera.requests().await;
    assert!(requests[0].starts_with("POST /api/v1/video/stream HTTP/1.1"));
    assert_eq!(
        request_body(&requests[0]),
        json!({"channel": 0, "bitrate": 4096})
    );
}

#[tokio::test]
async fn snapshot_saves_exactly_the_returned_bytes() {
    let frame: Vec<u8> = [0xFF, 0xD8, 0xFF, 0xE0]
        .iter()
        .copied()
        .chain((0..512).map(|i| (i % 251) as u8))
        .collect();
    let camera =
        FakeCamera::serve(vec![http_response("200 OK", "image/jpeg", &[], &frame)]).await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("snapshot.jpg");
    let returned = camera.client().save_snapshot(0, &path).await.unwrap();

    assert_eq!(returned, frame);
    assert_eq!(std::fs::read(&path).unwrap(), frame);

    let requests = camera.requests().await;
    assert!(requests[0].starts_with("GET /api/v1/snapshot?channel=0 HTTP/1.1"));
}

#[tokio::test]
async fn snapshot_write_failure_is_an_io_error() {
    let camera =
        FakeCamera::serve(vec![http_response("200 OK", "image/jpeg", &[], b"\xFF\xD8")]).await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing-subdir").join("snapshot.jpg");
    let err = camera.client().save_snapshot(0, &path).await.unwrap_err();
    assert!(matches!(err, ConcordError::IoError(_)), "{err}");
}

#[tokio::test]
async fn snapshot_error_envelope_keeps_typed_mapping() {
    let camera = FakeCamera::serve(vec![envelope_result(6)]).await;
    let err = camera.client().snapshot(0).await.unwrap_err();
    assert!(matches!(err, ConcordError::DeviceBusyError(_)), "{err}");
}

#[tokio::test]
async fn http_404_maps_to_not_found() {
    let camera = FakeCamera::serve(vec![http_response(
        "404 Not Found",
        "text/html",
        &[],
        b"<html>404</html>",
    )])
    .await;
    let err = camera.client().get_system_info().await.unwrap_err();
    assert!(matches!(err, ConcordError::NotFoundError(_)), "{err}");
}

#[tokio::test]
async fn digest_challenge_is_answered_transparently() {
    let camera = FakeCamera::serve(vec![
        http_response(
            "401 Unauthorized",
            "text/html",
            &["WWW-Authenticate: Digest realm=\"ipcam\", nonce=\"deadbeef\", qop=\"auth\""],
            b"",
        ),
        envelope_ok(
            r#"{"model":"CNC81BA-V4","hardware_version":"1.0","firmware_version":"3.2.1",
                "serial_number":"JA4K000123","uptime":42}"#,
        ),
    ])
    .await;

    let info = camera.client().get_system_info().await.unwrap();
    assert_eq!(info.model, "CNC81BA-V4");

    let requests = camera.requests().await;
    assert_eq!(requests.len(), 2);
    let retry = &requests[1];
    assert!(retry.to_lowercase().contains("authorization: digest"));
    assert!(retry.contains("username=\"admin\""));
    assert!(retry.contains("uri=\"/api/v1/system/info\""));
    assert!(retry.contains("qop=auth"));
}

#[tokio::test]
async fn rejected_credentials_surface_as_authentication_error() {
    let camera = FakeCamera::serve(vec![http_response(
        "401 Unauthorized",
        "text/html",
        &["WWW-Authenticate: Basic realm=\"ipcam\""],
        b"",
    )])
    .await;
    let err = camera.client().get_system_info().await.unwrap_err();
    assert!(matches!(err, ConcordError::AuthenticationError(_)), "{err}");
}

#[tokio::test]
async fn silent_host_times_out_promptly() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    // Accept the connection and then say nothing.
    let stall = tokio::spawn(async move {
        let Ok((socket, _)) = listener.accept().await else {
            return;
        };
        tokio::time::sleep(Duration::from_secs(60)).await;
        drop(socket);
    });

    let cam = ConcordCam::new("127.0.0.1")
        .with_port(addr.port())
        .with_timeout(Duration::from_secs(2));

    let start = std::time::Instant::now();
    let err = cam.get_system_info().await.unwrap_err();
    assert!(matches!(err, ConcordError::ConnectionError(_)), "{err}");
    assert!(start.elapsed() < Duration::from_secs(5));

    stall.abort();
}

#[tokio::test]
async fn unreachable_host_is_a_connection_error() {
    // Bind then drop to get a port nothing is listening on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let cam = ConcordCam::new("127.0.0.1")
        .with_port(addr.port())
        .with_timeout(Duration::from_secs(2));
    let err = cam.get_system_info().await.unwrap_err();
    assert!(matches!(err, ConcordError::ConnectionError(_)), "{err}");
}
