use crate::harness::{CapturedEvent, NoCustomers, RecordingMailer, init_test_tracing};
use payalert_core::conf::AppConfig;
use payalert_core::notify::{Addresses, EmailMessage};
use payalert_core::runtime::AppState;
use payalert_core::server::build_pingora_server;
use reqwest::blocking::{Client, RequestBuilder};
use std::net::TcpStream;
use std::sync::{Arc, Mutex, OnceLock};
use std::thread;
use std::time::{Duration, Instant};

/// Handle to a running notifier test server.
pub struct TestServer {
    base_url: String,
    client: Client,
    state: Arc<AppState>,
    mailer: Arc<RecordingMailer>,
}

impl TestServer {
    /// Start a server on a free port with the given mailer and a customer
    /// directory that never resolves anyone.
    ///
    /// This function is fully parallel-safe and nextest-safe.
    pub fn start(mailer: Arc<RecordingMailer>) -> Self {
        // Initialize tracing (this must happen first).
        init_test_tracing(events());

        let listen_port = free_port();

        let mut cfg = AppConfig::default();
        cfg.server.listen = format!("127.0.0.1:{listen_port}");
        cfg.server.threads = Some(1);

        let addresses = Addresses {
            sender: "alerts@example.com".to_string(),
            recipient: "ops@example.com".to_string(),
        };
        let state = Arc::new(AppState::new(
            addresses,
            mailer.clone(),
            Arc::new(NoCustomers),
        ));

        let server =
            build_pingora_server(&cfg, state.clone()).expect("failed to build payalert server");

        // Run server in background thread
        thread::spawn(move || {
            server.run_forever();
        });

        let base_url = format!("http://127.0.0.1:{listen_port}");

        // Wait for server to accept connections
        wait_for_server(&base_url);

        let client = Client::builder()
            .timeout(Duration::from_secs(2))
            .build()
            .expect("failed to build client");

        Self {
            base_url,
            client,
            state,
            mailer,
        }
    }

    pub fn get(&self, path: &str) -> RequestBuilder {
        self.client.get(format!("{}{}", self.base_url, path))
    }

    pub fn post(&self, path: &str) -> RequestBuilder {
        self.client.post(format!("{}{}", self.base_url, path))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// In-process view of the server's stores.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Every message the server tried to send so far.
    pub fn mail_attempts(&self) -> Vec<EmailMessage> {
        self.mailer.attempts()
    }
}

/// Snapshot of every tracing event captured so far in this process.
pub fn captured_events() -> Vec<CapturedEvent> {
    events().lock().unwrap().clone()
}

/// Poll until the server responds (or panic).
fn wait_for_server(listen_addr: &str) {
    let addr = listen_addr.strip_prefix("http://").unwrap_or(listen_addr);

    let deadline = Instant::now() + Duration::from_secs(2);

    loop {
        match TcpStream::connect(addr) {
            Ok(_) => return,
            Err(_) => {
                if Instant::now() > deadline {
                    panic!("server failed to start at {}", listen_addr);
                }
                thread::sleep(Duration::from_millis(25));
            }
        }
    }
}

static EVENTS: OnceLock<Arc<Mutex<Vec<CapturedEvent>>>> = OnceLock::new();

fn events() -> Arc<Mutex<Vec<CapturedEvent>>> {
    EVENTS
        .get_or_init(|| Arc::new(Mutex::new(Vec::new())))
        .clone()
}

/// Allocate a free port on localhost.
/// This is required to avoid port collisions when running tests in parallel.
fn free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}
