// Exercises `ApiClient` against a one-shot HTTP server on localhost and
// checks what actually goes over the wire.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};

use flashcards_cli::api::{ApiClient, Flashcard, FlashcardApi, GenerateRequest};
use flashcards_cli::controller::{Controller, FormState, Status};

struct Captured {
    head: String,
    body: Vec<u8>,
}

/// Accept one connection, capture the request and reply with `status` and a
/// JSON `body`.
fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<Captured>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());

    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];

        let header_end = loop {
            let n = stream.read(&mut chunk).unwrap();
            assert!(n > 0, "connection closed before headers");
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
        };
        let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
        let content_length = head
            .lines()
            .find_map(|l| {
                let (name, value) = l.split_once(':')?;
                name.eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().ok())
                    .flatten()
            })
            .unwrap_or(0);
        while buf.len() < header_end + content_length {
            let n = stream.read(&mut chunk).unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
        }

        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        stream.write_all(response.as_bytes()).unwrap();
        stream.flush().unwrap();

        Captured {
            head,
            body: buf[header_end..].to_vec(),
        }
    });

    (url, handle)
}

#[test]
fn generate_posts_json_with_num_cards_key() {
    let (url, server) = serve_once(
        "200 OK",
        r#"{"cards":[{"question":"What is the sun?","answer":"A star"}]}"#,
    );
    let api = ApiClient::new(&url).unwrap();

    let resp = api
        .generate(&GenerateRequest {
            text: "The sun is a star.".into(),
            difficulty: "easy".into(),
            num_cards: 3,
        })
        .unwrap();
    assert_eq!(resp.cards, Some(vec![Flashcard::new("What is the sun?", "A star")]));

    let captured = server.join().unwrap();
    assert!(captured.head.starts_with("POST /api/generate HTTP/1.1"));
    assert!(captured.head.to_ascii_lowercase().contains("content-type: application/json"));
    let sent: serde_json::Value = serde_json::from_slice(&captured.body).unwrap();
    assert_eq!(
        sent,
        serde_json::json!({"text": "The sun is a star.", "difficulty": "easy", "numCards": 3})
    );
}

#[test]
fn upload_sends_multipart_file_field() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.txt");
    std::fs::write(&path, "Mitochondria make ATP.").unwrap();

    let (url, server) = serve_once("200 OK", r#"{"text":"Mitochondria make ATP."}"#);
    let api = ApiClient::new(&url).unwrap();

    let resp = api.upload(&path).unwrap();
    assert_eq!(resp.text.as_deref(), Some("Mitochondria make ATP."));

    let captured = server.join().unwrap();
    assert!(captured.head.starts_with("POST /api/upload HTTP/1.1"));
    assert!(captured.head.to_ascii_lowercase().contains("multipart/form-data"));
    let body = String::from_utf8_lossy(&captured.body);
    assert!(body.contains(r#"name="file""#));
    assert!(body.contains(r#"filename="notes.txt""#));
    assert!(body.to_ascii_lowercase().contains("content-type: text/plain"));
    assert!(body.contains("Mitochondria make ATP."));
}

#[test]
fn non_success_status_is_an_error() {
    let (url, server) = serve_once("500 Internal Server Error", r#"{"error":"model offline"}"#);
    let api = ApiClient::new(&url).unwrap();

    let err = api
        .generate(&GenerateRequest {
            text: "x".into(),
            difficulty: "hard".into(),
            num_cards: 5,
        })
        .unwrap_err();
    let msg = format!("{}", err);
    assert!(msg.contains("500"), "unexpected error: {}", msg);
    assert!(msg.contains("model offline"));
    server.join().unwrap();
}

#[test]
fn upload_of_missing_file_fails_before_sending() {
    let api = ApiClient::new("http://127.0.0.1:9").unwrap();
    let err = api.upload(std::path::Path::new("/definitely/not/here.txt")).unwrap_err();
    assert!(format!("{}", err).contains("Failed to read"));
}

#[test]
fn controller_reports_generic_failure_on_http_error() {
    let (url, server) = serve_once("404 Not Found", "{}");
    let api = ApiClient::new(&url).unwrap();
    let form = FormState {
        text: "Some text".into(),
        num_cards: "4".into(),
        difficulty: "medium".into(),
        ..FormState::default()
    };
    let mut controller = Controller::with_form(api, form);

    assert_eq!(controller.generate(), Status::GenerateFailed);
    assert_eq!(controller.deck().count_label, "0 cards");
    server.join().unwrap();
}

#[test]
fn controller_end_to_end_extract_then_generate() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lecture.md");
    std::fs::write(&path, "# Plants\nPlants need light.").unwrap();

    let (upload_url, upload_server) = serve_once("200 OK", r#"{"text":"Plants need light."}"#);
    let api = ApiClient::new(&upload_url).unwrap();
    let mut controller = Controller::with_form(
        api,
        FormState {
            file: Some(path),
            num_cards: "".into(),
            difficulty: "easy".into(),
            ..FormState::default()
        },
    );
    assert_eq!(controller.extract(), Status::Extracted);
    upload_server.join().unwrap();
    assert_eq!(controller.state().session.extracted_text, "Plants need light.");

    // One server per request, so the second call gets its own client.
    let (gen_url, gen_server) = serve_once(
        "200 OK",
        r#"{"cards":[{"question":"What do plants need?","answer":"Light"},{"question":"Q2","answer":"A2"}]}"#,
    );
    let state_text = controller.state().session.extracted_text.clone();
    let mut controller = Controller::with_form(
        ApiClient::new(&gen_url).unwrap(),
        FormState {
            text: state_text,
            num_cards: "".into(),
            difficulty: "easy".into(),
            ..FormState::default()
        },
    );
    assert_eq!(controller.generate(), Status::Generated);
    let sent: serde_json::Value = serde_json::from_slice(&gen_server.join().unwrap().body).unwrap();
    assert_eq!(sent["numCards"], 5);
    assert_eq!(sent["text"], "Plants need light.");

    let deck = controller.deck();
    assert_eq!(deck.count_label, "2 cards");
    assert_eq!(deck.cards[0].heading, "Q1. What do plants need?");
    assert_eq!(deck.cards[1].heading, "Q2. Q2");
}
