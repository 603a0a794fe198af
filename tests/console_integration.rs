use assert_cmd::Command;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread;

const MODELS: &str = r#"{
    "closed_source": [{"id": "gpt-x", "name": "GPT X"}],
    "open_source": [{"id": "llama-y", "name": "Llama Y"}]
}"#;

const SAMPLES: &str = r#"[{
    "id": 1,
    "category": "Tech",
    "title": "AI in Healthcare",
    "text": "Artificial intelligence is changing how clinicians diagnose and treat their patients."
}]"#;

const SUMMARIES: &str = r#"{
    "word_count": 10,
    "text_length": 60,
    "model1": {"model_name": "gpt-x", "summary": "gpt summary", "success": true, "processing_time": 1.2},
    "model2": {"model_name": "llama-y", "summary": "llama summary", "success": true, "processing_time": 0.8}
}"#;

fn read_request_line(stream: &mut TcpStream) -> String {
    let mut reader = BufReader::new(stream);
    let mut request_line = String::new();
    reader.read_line(&mut request_line).unwrap_or(0);
    let mut content_length = 0usize;
    loop {
        let mut header = String::new();
        let n = reader.read_line(&mut header).unwrap_or(0);
        let line = header.trim_end_matches(['\r', '\n']);
        if n == 0 || line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("content-length") {
                content_length = value.trim().parse().unwrap_or(0);
            }
        }
    }
    let mut body = vec![0u8; content_length];
    let _ = reader.read_exact(&mut body);
    request_line
}

fn respond(mut stream: TcpStream, status: &str, body: &str) {
    let resp = format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );
    let _ = stream.write_all(resp.as_bytes());
    let _ = stream.flush();
}

/// Routed stand-in for the summarization backend. Returns its `/api` base url.
fn spawn_backend(summarize: (&'static str, &'static str)) -> String {
    let listener = TcpListener::bind(("127.0.0.1", 0)).expect("bind");
    let addr = listener.local_addr().unwrap();
    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { continue };
            let line = read_request_line(&mut stream);
            let mut parts = line.split_whitespace();
            let method = parts.next().unwrap_or("");
            let path = parts.next().unwrap_or("");
            let (status, body) = match (method, path) {
                ("GET", "/api/health") => ("200 OK", r#"{"status":"healthy"}"#),
                ("GET", "/api/models") => ("200 OK", MODELS),
                ("GET", "/api/sample-texts") => ("200 OK", SAMPLES),
                ("POST", "/api/summarize") => summarize,
                ("POST", "/api/clear-cache") => {
                    ("200 OK", r#"{"message":"Model cache cleared successfully"}"#)
                }
                _ => ("404 Not Found", r#"{"error":"Endpoint not found"}"#),
            };
            respond(stream, status, body);
        }
    });
    format!("http://{}:{}/api", addr.ip(), addr.port())
}

fn run_console(base_url: &str, script: &str) -> String {
    let output = Command::cargo_bin("llm-battle")
        .unwrap()
        .env("BATTLE_API_URL", base_url)
        .env("RUST_LOG", "off")
        .write_stdin(script)
        .output()
        .expect("run console");
    assert!(output.status.success(), "console exited with {:?}", output.status);
    String::from_utf8(output.stdout).expect("utf8 stdout")
}

#[test]
fn full_battle_with_ratings_and_cache_clear() {
    let base = spawn_backend(("200 OK", SUMMARIES));
    let script = "\
models
use 1 gpt-x
use 2 llama-y
sample 1
battle
rate 1 clarity 4
rate 1 accuracy 2
prefer 2
chart
clear-cache
clear-cache
quit
";
    let out = run_console(&base, script);

    assert!(out.contains("connected (2 models, 1 sample texts)"), "{out}");
    assert!(out.contains("Closed Source (API)"));
    assert!(out.contains("Fighter 2: Llama Y (llama-y)"));
    assert!(out.contains("minimum 50 characters: ok"));
    assert!(out.contains("== Fighter 1: gpt-x [ok] 1.2s"), "{out}");
    assert!(out.contains("llama summary"));
    assert!(out.contains("average 3.0/5"), "{out}");
    assert!(out.contains("average 0.0/5"), "{out}");
    assert!(out.contains("Preferred: 🏆 llama-y"));
    assert_eq!(out.matches("Model cache cleared successfully!").count(), 2);
}

#[test]
fn short_text_is_rejected_without_reaching_backend() {
    // any summarize call would surface this message
    let base = spawn_backend(("500 Internal Server Error", r#"{"error":"should not be called"}"#));
    let script = "\
use 1 gpt-x
use 2 llama-y
text too short to battle
battle
quit
";
    let out = run_console(&base, script);
    assert!(out.contains("error: Please enter at least 50 characters of text"), "{out}");
    assert!(!out.contains("should not be called"));
}

#[test]
fn server_error_message_is_shown_verbatim() {
    let base = spawn_backend(("429 Too Many Requests", r#"{"error":"rate limited"}"#));
    let script = "\
use 1 gpt-x
use 2 llama-y
sample 1
battle
results
rate 1 clarity 3
quit
";
    let out = run_console(&base, script);
    assert!(out.contains("error: rate limited"), "{out}");
    assert!(out.contains("Select your models and input text to compare summaries"));
    assert!(out.contains("error: no results to rate yet"));
}

#[test]
fn unreachable_backend_shows_connection_gate() {
    let listener = TcpListener::bind(("127.0.0.1", 0)).expect("bind");
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let base = format!("http://{}:{}/api", addr.ip(), addr.port());

    let out = run_console(&base, "models\nretry\nquit\n");
    assert!(out.contains("Backend Connection Failed: Backend server is not responding"));
    assert!(out.contains("Type `retry` to reconnect."));
    assert!(!out.contains("Closed Source"));
    assert_eq!(out.matches("Connecting to Battle API...").count(), 2);
}
