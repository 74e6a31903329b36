use httprasa::http::{build_request, create_client, execute_request, RequestSpec};
use httprasa::RequestItems;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

mod common;
use common::request_items;

/// Send `items` to a local listener and return the request head it received
async fn send_and_capture(items: RequestItems) -> (u16, String) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut received = Vec::new();
        let mut buf = [0u8; 1024];
        while !received.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            received.extend_from_slice(&buf[..n]);
        }
        socket
            .write_all(b"HTTP/1.1 204 No Content\r\ncontent-length: 0\r\n\r\n")
            .await
            .unwrap();
        String::from_utf8_lossy(&received).to_ascii_lowercase()
    });

    let client = create_client(None).unwrap();
    let url = format!("http://{addr}/");
    let request = build_request(
        &client,
        RequestSpec {
            method: Some("GET"),
            url: &url,
            items,
            auth: None,
        },
    )
    .unwrap();
    let (status, _) = execute_request(&client, request).await.unwrap();

    (status, server.await.unwrap())
}

#[tokio::test]
async fn execute_request_should_send_default_headers() {
    let (status, head) = send_and_capture(request_items(&["X-Trace:1"], None)).await;

    assert_eq!(status, 204);
    assert!(head.starts_with("get / http/1.1\r\n"));
    assert!(head.contains("user-agent: httprasa/"));
    assert!(head.contains("accept: application/json, */*;q=0.5\r\n"));
    assert!(head.contains("x-trace: 1\r\n"));
}

#[tokio::test]
async fn execute_request_should_honor_suppressed_headers_on_the_wire() {
    let (_, head) = send_and_capture(request_items(&["User-Agent:", "Accept:"], None)).await;

    assert!(!head.contains("user-agent"));
    assert_eq!(head.matches("accept:").count(), 1);
    assert!(head.contains("accept: */*\r\n"));
}
