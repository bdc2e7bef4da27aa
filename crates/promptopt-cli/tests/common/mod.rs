//! Shared helpers for CLI tests: the command builder and a fake Ollama server

#![allow(dead_code)]

use assert_cmd::Command;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::path::Path;
use std::thread;

pub const ANALYSIS_REPLY: &str = "Clarity: 4 - short\nCompleteness: 3\nContext: no language given";
pub const REWRITE_REPLY: &str = "How do I sort a list of numbers in Rust?";
pub const ANSWER_REPLY: &str = "Call sort() on a Vec of numbers.";

/// `promptopt` with a private config path and no inherited overrides
pub fn promptopt_cmd(config_path: &Path) -> Command {
    let mut cmd = Command::cargo_bin("promptopt").unwrap();
    cmd.env("PROMPTOPT_CONFIG", config_path)
        .env_remove("PROMPTOPT_LLM_PROVIDER")
        .env_remove("PROMPTOPT_LLM_MODEL")
        .env_remove("PROMPTOPT_LLM_URL")
        .env_remove("RUST_LOG");
    cmd
}

/// Start an Ollama look-alike and return its base URL
///
/// Analysis and rewrite prompts are recognized by their first line; any
/// other prompt gets [`ANSWER_REPLY`].
pub fn start_fake_ollama() -> String {
    spawn_server(false)
}

/// Ollama look-alike that passes the liveness check but fails every generation
pub fn start_crashing_ollama() -> String {
    spawn_server(true)
}

fn spawn_server(crash_on_generate: bool) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());

    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            thread::spawn(move || serve(stream, crash_on_generate));
        }
    });

    base_url
}

/// A base URL nothing is listening on
pub fn unused_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

fn serve(stream: TcpStream, crash_on_generate: bool) {
    let Some((method, path, body)) = read_request(&stream) else {
        return;
    };

    if crash_on_generate && method == "POST" {
        write_response(stream, "500 Internal Server Error", r#"{"error":"model crashed"}"#);
        return;
    }

    let reply = match (method.as_str(), path.as_str()) {
        ("GET", "/api/tags") => r#"{"models":[]}"#.to_string(),
        ("POST", "/api/generate") => {
            let request: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
            let prompt = request["prompt"].as_str().unwrap_or_default();
            let text = if prompt.starts_with("Analyze this query.") {
                ANALYSIS_REPLY
            } else if prompt.starts_with("Improve this query.") {
                REWRITE_REPLY
            } else {
                ANSWER_REPLY
            };
            serde_json::json!({ "response": text, "done": true }).to_string()
        }
        _ => {
            write_response(stream, "404 Not Found", r#"{"error":"not found"}"#);
            return;
        }
    };
    write_response(stream, "200 OK", &reply);
}

fn read_request(stream: &TcpStream) -> Option<(String, String, String)> {
    let mut reader = BufReader::new(stream);

    let mut request_line = String::new();
    reader.read_line(&mut request_line).ok()?;
    let mut parts = request_line.split_whitespace();
    let method = parts.next()?.to_string();
    let path = parts.next()?.to_string();

    let mut length = 0usize;
    loop {
        let mut line = String::new();
        reader.read_line(&mut line).ok()?;
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("content-length") {
                length = value.trim().parse().unwrap_or(0);
            }
        }
    }

    let mut body = vec![0u8; length];
    reader.read_exact(&mut body).ok()?;
    Some((method, path, String::from_utf8_lossy(&body).into_owned()))
}

fn write_response(mut stream: TcpStream, status: &str, body: &str) {
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}
