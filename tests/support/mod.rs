//! Mock customer API server for integration tests.
//!
//! Serves the three routes the client uses:
//! - GET /customers returns the stored customers as a JSON array
//! - POST /customer stores `{name, email}` and returns the full record
//! - DELETE /customer?id=X removes the record with that id

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use serde_json::{json, Value};

#[derive(Debug, Clone, Default)]
pub struct MockConfig {
    /// Customers present when the server starts
    pub customers: Vec<Value>,
    /// Respond 500 to every DELETE
    pub fail_delete: bool,
    /// Respond 500 to every POST
    pub fail_create: bool,
    /// Serve a non-JSON body on GET /customers
    pub garbage_list: bool,
    /// Delay in milliseconds before responding
    pub delay_ms: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: String,
    pub target: String,
    pub body: String,
}

struct Shared {
    config: MockConfig,
    customers: Mutex<Vec<Value>>,
    requests: Mutex<Vec<RecordedRequest>>,
    next_id: Mutex<u64>,
}

pub struct MockCustomerServer {
    port: u16,
    running: Arc<AtomicBool>,
    shared: Arc<Shared>,
    thread_handle: Option<thread::JoinHandle<()>>,
}

impl MockCustomerServer {
    pub fn start(config: MockConfig) -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0")?;
        let port = listener.local_addr()?.port();
        listener.set_nonblocking(true)?;

        let running = Arc::new(AtomicBool::new(true));
        let shared = Arc::new(Shared {
            customers: Mutex::new(config.customers.clone()),
            config,
            requests: Mutex::new(Vec::new()),
            next_id: Mutex::new(1000),
        });

        let running_clone = running.clone();
        let shared_clone = shared.clone();
        let thread_handle = thread::spawn(move || {
            while running_clone.load(Ordering::SeqCst) {
                match listener.accept() {
                    Ok((stream, _)) => {
                        let shared = shared_clone.clone();
                        thread::spawn(move || handle_connection(stream, &shared));
                    }
                    Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                        thread::sleep(Duration::from_millis(5));
                    }
                    Err(_) => break,
                }
            }
        });

        Ok(Self { port, running, shared, thread_handle: Some(thread_handle) })
    }

    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.shared.requests.lock().unwrap().clone()
    }

    pub fn customers(&self) -> Vec<Value> {
        self.shared.customers.lock().unwrap().clone()
    }

    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for MockCustomerServer {
    fn drop(&mut self) {
        self.stop();
    }
}

fn read_request(stream: &mut TcpStream) -> Option<RecordedRequest> {
    stream.set_nonblocking(false).ok()?;
    let mut data = Vec::new();
    let mut buffer = [0u8; 4096];

    let header_end = loop {
        let n = stream.read(&mut buffer).ok()?;
        if n == 0 {
            return None;
        }
        data.extend_from_slice(&buffer[..n]);
        if let Some(pos) = data.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&data[..header_end]).to_string();
    let content_length = head
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while data.len() < header_end + content_length {
        let n = stream.read(&mut buffer).ok()?;
        if n == 0 {
            break;
        }
        data.extend_from_slice(&buffer[..n]);
    }

    let mut parts = head.lines().next()?.split_whitespace();
    let method = parts.next()?.to_string();
    let target = parts.next()?.to_string();
    let body = String::from_utf8_lossy(&data[header_end..]).to_string();

    Some(RecordedRequest { method, target, body })
}

fn handle_connection(mut stream: TcpStream, shared: &Shared) {
    let Some(request) = read_request(&mut stream) else {
        return;
    };
    shared.requests.lock().unwrap().push(request.clone());

    if shared.config.delay_ms > 0 {
        thread::sleep(Duration::from_millis(shared.config.delay_ms));
    }

    let (path, query) = request.target.split_once('?').unwrap_or((request.target.as_str(), ""));

    match (request.method.as_str(), path) {
        ("GET", "/customers") => {
            if shared.config.garbage_list {
                send_response(&mut stream, 200, "OK", "not json");
                return;
            }
            let customers = shared.customers.lock().unwrap().clone();
            send_response(&mut stream, 200, "OK", &Value::Array(customers).to_string());
        }
        ("POST", "/customer") => {
            if shared.config.fail_create {
                send_response(&mut stream, 500, "Internal Server Error", r#"{"error":"create failed"}"#);
                return;
            }
            let Ok(input) = serde_json::from_str::<Value>(&request.body) else {
                send_response(&mut stream, 400, "Bad Request", r#"{"error":"invalid body"}"#);
                return;
            };
            let id = {
                let mut next_id = shared.next_id.lock().unwrap();
                *next_id += 1;
                *next_id
            };
            let record = json!({
                "id": id.to_string(),
                "name": input["name"],
                "email": input["email"],
                "status": true,
                "created_at": "2024-06-01T09:30:00.000Z"
            });
            shared.customers.lock().unwrap().push(record.clone());
            send_response(&mut stream, 200, "OK", &record.to_string());
        }
        ("DELETE", "/customer") => {
            if shared.config.fail_delete {
                send_response(&mut stream, 500, "Internal Server Error", r#"{"error":"delete failed"}"#);
                return;
            }
            let id = query.split('&').find_map(|pair| pair.strip_prefix("id=")).unwrap_or("");
            shared.customers.lock().unwrap().retain(|c| c["id"].as_str() != Some(id));
            send_response(&mut stream, 200, "OK", r#"{"ok":true}"#);
        }
        _ => send_response(&mut stream, 404, "Not Found", r#"{"error":"not found"}"#),
    }
}

fn send_response(stream: &mut TcpStream, status: u16, reason: &str, body: &str) {
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        reason,
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}
