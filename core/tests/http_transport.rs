//! UreqTransport against a one-shot loopback server.

use churn_core::{
    config::DeskConfig,
    error::ChurnError,
    transport::{Transport, UreqTransport},
};
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::mpsc;
use std::thread;

/// What the server saw: request line, headers (lowercased names), body.
struct Seen {
    request_line: String,
    headers:      Vec<(String, String)>,
    body:         String,
}

impl Seen {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
    }
}

/// Serve exactly one request with a canned response. Returns the base URL
/// and a receiver for the captured request.
fn serve_once(status_line: &'static str, content_type: &'static str, body: &'static str) -> (String, mpsc::Receiver<Seen>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let seen = read_request(&stream);
        let mut stream = stream;
        let response = format!(
            "HTTP/1.1 {status_line}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        stream.write_all(response.as_bytes()).unwrap();
        stream.flush().unwrap();
        let _ = tx.send(seen);
    });

    (format!("http://{addr}"), rx)
}

fn read_request(stream: &TcpStream) -> Seen {
    let mut reader = BufReader::new(stream);
    let mut request_line = String::new();
    reader.read_line(&mut request_line).unwrap();

    let mut headers = Vec::new();
    loop {
        let mut line = String::new();
        reader.read_line(&mut line).unwrap();
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((k, v)) = line.split_once(':') {
            headers.push((k.trim().to_ascii_lowercase(), v.trim().to_string()));
        }
    }

    let length = headers
        .iter()
        .find(|(k, _)| k == "content-length")
        .and_then(|(_, v)| v.parse::<usize>().ok())
        .unwrap_or(0);
    let mut body = vec![0u8; length];
    reader.read_exact(&mut body).unwrap();

    Seen {
        request_line: request_line.trim_end().to_string(),
        headers,
        body: String::from_utf8(body).unwrap(),
    }
}

fn transport() -> UreqTransport {
    let _ = env_logger::builder().is_test(true).try_init();
    UreqTransport::new(&DeskConfig::default_test())
}

#[test]
fn get_returns_status_content_type_and_body() {
    let (base, rx) = serve_once("200 OK", "application/json", "[1,2,3]");
    let response = transport().get(&format!("{base}/api/isp/customers/ids")).unwrap();

    assert_eq!(response.status, 200);
    assert!(response.is_json());
    assert_eq!(response.body, "[1,2,3]");

    let seen = rx.recv().unwrap();
    assert_eq!(seen.request_line, "GET /api/isp/customers/ids HTTP/1.1");
    assert_eq!(seen.header("content-type"), Some("application/json"));
}

#[test]
fn error_statuses_are_plain_responses() {
    let (base, _rx) = serve_once("500 Internal Server Error", "application/json", r#"{"detail":"boom"}"#);
    let response = transport().post(&format!("{base}/api/isp/customers"), Some("{}")).unwrap();

    assert_eq!(response.status, 500);
    assert!(!response.is_success());
    assert_eq!(response.body, r#"{"detail":"boom"}"#);
}

#[test]
fn html_content_type_is_reported() {
    let (base, _rx) = serve_once("200 OK", "text/html; charset=utf-8", "<html></html>");
    let response = transport().get(&format!("{base}/")).unwrap();

    assert!(response.is_success());
    assert!(!response.is_json());
    assert_eq!(response.content_type.as_deref(), Some("text/html; charset=utf-8"));
}

#[test]
fn post_sends_the_json_body() {
    let (base, rx) = serve_once("200 OK", "application/json", r#"{"CLIENTNUM":1}"#);
    let payload = r#"{"Customer_Age":51}"#;
    transport().post(&format!("{base}/api/credit-card/customers"), Some(payload)).unwrap();

    let seen = rx.recv().unwrap();
    assert_eq!(seen.request_line, "POST /api/credit-card/customers HTTP/1.1");
    assert_eq!(seen.header("content-type"), Some("application/json"));
    assert_eq!(seen.body, payload);
}

#[test]
fn unreachable_host_is_a_connection_error() {
    // bind then drop to get a port nothing listens on
    let addr = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap();
    let url = format!("http://{addr}/api/insurance/customers/ids");

    let err = transport().get(&url).unwrap_err();
    assert!(err.is_connection(), "{err}");
    match err {
        ChurnError::Connection { url: failed, .. } => assert_eq!(failed, url),
        other => panic!("unexpected error: {other}"),
    }
}
