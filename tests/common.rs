// tests/common.rs

use docsort::classifier::{
    Classification, ClassificationFailure, ClassificationRequest, Classifier, Outcome,
};
use docsort::core_types::FileKind;
use docsort::extraction::{ExtractError, Extractor};
use std::io::{Read, Write};
use std::net::TcpListener;
use std::path::Path;
use std::process::Command;
use std::thread;

// Helper function to get the binary command
#[allow(dead_code)] // This is used by many integration tests, but not all.
pub fn docsort_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("docsort"));
    // Keep the host environment from leaking a real key or endpoint into tests.
    cmd.env_remove("OPENAI_API_KEY")
        .env_remove("OPENAI_BASE_URL")
        .env_remove("DOCSORT_MODEL")
        .env_remove("RUST_LOG");
    cmd
}

/// Returns the file name as the excerpt, without touching the file.
#[allow(dead_code)]
pub struct NameExtractor;

impl Extractor for NameExtractor {
    fn extract(&self, path: &Path, _kind: FileKind) -> Result<String, ExtractError> {
        Ok(path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default())
    }
}

/// Classifies by file name: `invoice*` is a dated invoice, `fail*` fails, everything
/// else is `other` and keeps its stem.
#[allow(dead_code)]
pub struct NameClassifier;

impl Classifier for NameClassifier {
    fn classify(&self, request: &ClassificationRequest<'_>) -> Outcome {
        let stem = request
            .filename
            .rsplit_once('.')
            .map(|(stem, _)| stem)
            .unwrap_or(request.filename);
        if stem.starts_with("fail") {
            return Outcome::Failed(ClassificationFailure::new(request.filename, "model offline"));
        }
        if stem.starts_with("invoice") {
            return Outcome::Classified(Classification {
                category: "invoice".to_string(),
                suggested_basename: "invoice_2025-11-09".to_string(),
                confidence: 0.95,
                date: chrono::NaiveDate::from_ymd_opt(2025, 11, 9),
                description: "Invoice from ACME".to_string(),
                notes: String::new(),
            });
        }
        Outcome::Classified(Classification {
            category: "other".to_string(),
            suggested_basename: stem.to_string(),
            confidence: 0.5,
            date: None,
            description: String::new(),
            notes: String::new(),
        })
    }
}

/// Starts a chat completions endpoint that answers every request with `content`.
///
/// Returns the base URL to point `OPENAI_BASE_URL` at.
#[allow(dead_code)]
pub fn fake_chat_server(content: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let body = serde_json::json!({
        "choices": [{ "message": { "role": "assistant", "content": content } }]
    })
    .to_string();

    thread::spawn(move || {
        for stream in listener.incoming() {
            let mut stream = match stream {
                Ok(s) => s,
                Err(_) => break,
            };
            read_request(&mut stream);
            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            let _ = stream.write_all(response.as_bytes());
        }
    });
    format!("http://{}/v1/", addr)
}

#[allow(dead_code)]
fn read_request(stream: &mut std::net::TcpStream) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = match stream.read(&mut chunk) {
            Ok(0) | Err(_) => return,
            Ok(n) => n,
        };
        buf.extend_from_slice(&chunk[..n]);
        let text = String::from_utf8_lossy(&buf);
        if let Some(header_end) = text.find("\r\n\r\n") {
            let content_length = text[..header_end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if buf.len() >= header_end + 4 + content_length {
                return;
            }
        }
    }
}
