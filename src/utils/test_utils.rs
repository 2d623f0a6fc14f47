use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::api::{FundReply, FundService, FundServiceError};
use crate::core::app::{App, AppChannels, AppInit};
use crate::core::message::ClockFormat;
use crate::core::voice::{SpeechRecognizer, VoiceError};
use crate::ui::theme::ThemeMode;
use crate::utils::logging::LoggingState;

/// In-memory calculation service. Answers every call with the same result
/// and records what it was asked.
pub struct MockFundService {
    reply: Option<Option<String>>,
    calls: AtomicUsize,
    messages: Mutex<Vec<String>>,
}

impl MockFundService {
    /// Succeeds with the given `reply` field (`None` models a missing field).
    pub fn replying(reply: Option<&str>) -> Self {
        Self {
            reply: Some(reply.map(str::to_string)),
            calls: AtomicUsize::new(0),
            messages: Mutex::new(Vec::new()),
        }
    }

    /// Fails every call as if the service were down.
    pub fn failing() -> Self {
        Self {
            reply: None,
            calls: AtomicUsize::new(0),
            messages: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().expect("messages lock").clone()
    }
}

#[async_trait]
impl FundService for MockFundService {
    async fn calculate(&self, message: &str) -> Result<FundReply, FundServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.messages
            .lock()
            .expect("messages lock")
            .push(message.to_string());
        match &self.reply {
            Some(reply) => Ok(FundReply {
                reply: reply.clone(),
            }),
            None => Err(FundServiceError::Status {
                status: 503,
                body: "service unavailable".to_string(),
            }),
        }
    }
}

/// Recognizer that "hears" a queue of fixed phrases.
pub struct MockRecognizer {
    phrases: Mutex<VecDeque<String>>,
}

impl MockRecognizer {
    pub fn hearing(phrase: &str) -> Self {
        Self {
            phrases: Mutex::new(VecDeque::from([phrase.to_string()])),
        }
    }

    pub fn failing() -> Self {
        Self {
            phrases: Mutex::new(VecDeque::new()),
        }
    }
}

#[async_trait]
impl SpeechRecognizer for MockRecognizer {
    async fn listen(&self) -> Result<String, VoiceError> {
        self.phrases
            .lock()
            .expect("phrases lock")
            .pop_front()
            .ok_or(VoiceError::NoSpeech)
    }
}

pub fn create_test_app(
    service: Arc<dyn FundService>,
    recognizer: Option<Arc<dyn SpeechRecognizer>>,
) -> (App, AppChannels) {
    App::new(AppInit {
        service,
        recognizer,
        endpoint: "http://fund.test/chat".to_string(),
        theme_mode: ThemeMode::Light,
        clock: ClockFormat::TwentyFourHour,
        reply_delay: Duration::ZERO,
        logging: LoggingState::disabled(),
    })
}

/// A request as received by [`spawn_http_stub`].
pub struct CapturedRequest {
    pub head: String,
    pub body: String,
}

/// Serve exactly one HTTP request on a local port, answering with `status`
/// (e.g. `"200 OK"`) and a JSON `body`. Returns the URL to post to and a
/// handle resolving to the captured request.
pub async fn spawn_http_stub(
    status: &'static str,
    body: &'static str,
) -> (String, JoinHandle<CapturedRequest>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub listener");
    let addr = listener.local_addr().expect("stub address");

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.expect("accept");
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];

        let header_end = loop {
            let n = socket.read(&mut chunk).await.expect("read request");
            assert!(n > 0, "client closed before sending headers");
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
        };

        let head = String::from_utf8_lossy(&buf[..header_end]).into_owned();
        let content_length = head
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                name.trim()
                    .eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().ok())?
            })
            .unwrap_or(0);

        while buf.len() < header_end + content_length {
            let n = socket.read(&mut chunk).await.expect("read body");
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
        }
        let request_body = String::from_utf8_lossy(&buf[header_end..]).into_owned();

        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket
            .write_all(response.as_bytes())
            .await
            .expect("write response");
        socket.shutdown().await.ok();

        CapturedRequest {
            head,
            body: request_body,
        }
    });

    (format!("http://{addr}/"), handle)
}

/// Accept one connection and never answer it. The task ends once the client
/// hangs up.
pub async fn spawn_silent_stub() -> (String, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub listener");
    let addr = listener.local_addr().expect("stub address");

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.expect("accept");
        let mut chunk = [0u8; 1024];
        while let Ok(n) = socket.read(&mut chunk).await {
            if n == 0 {
                break;
            }
        }
    });

    (format!("http://{addr}/chat"), handle)
}

/// A local URL with nothing listening behind it.
pub async fn unused_local_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind placeholder listener");
    let addr = listener.local_addr().expect("placeholder address");
    drop(listener);
    format!("http://{addr}/chat")
}
