//! Shared fakes for the newsdesk test suite

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use newsdesk::transport::{EverythingRequest, NewsTransport, RawResponse, TransportError};

/// What the fake transport answers with.
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub enum Reply {
    Respond(RawResponse),
    Unreachable(String),
}

/// Transport that never touches the network and counts its calls.
#[allow(dead_code)]
pub struct FakeTransport {
    reply: Reply,
    calls: AtomicUsize,
    last_request: Mutex<Option<EverythingRequest>>,
}

#[allow(dead_code)]
impl FakeTransport {
    pub fn new(reply: Reply) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub fn responding(status: u16, body: &str) -> Self {
        Self::new(Reply::Respond(RawResponse {
            status,
            reason: String::new(),
            body: body.to_string(),
        }))
    }

    pub fn ok(body: &str) -> Self {
        Self::responding(200, body)
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<EverythingRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

impl NewsTransport for FakeTransport {
    async fn get_everything(
        &self,
        request: &EverythingRequest,
    ) -> Result<RawResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());
        match &self.reply {
            Reply::Respond(response) => Ok(response.clone()),
            Reply::Unreachable(reason) => Err(TransportError::Connect(reason.clone())),
        }
    }
}

#[allow(dead_code)]
pub const TWO_GOOD_ONE_BAD: &str = r#"{
    "status": "ok",
    "totalResults": 3,
    "articles": [
        {
            "source": {"id": "wired", "name": "Wired"},
            "author": "A. Writer",
            "title": "Rust in the kernel",
            "description": "Memory safety lands upstream",
            "url": "https://example.com/rust-kernel",
            "publishedAt": "2026-10-01T10:00:00Z"
        },
        {
            "source": {"id": null, "name": "Nowhere"},
            "title": "[Removed]",
            "url": null
        },
        {
            "source": {"id": null, "name": "Ars"},
            "title": "Async traits stabilized",
            "description": null,
            "url": "https://example.com/async-traits"
        }
    ]
}"#;
