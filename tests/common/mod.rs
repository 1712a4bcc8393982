//! Shared test helpers: a scriptable in-memory HTTP backend.

// Not every test binary uses every helper.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::Value;

use crm_transport::{
    GatewayError, HttpBackend, PreparedRequest, RequestGateway, SessionEvent, SessionEventChannel,
};

/// One scripted backend outcome, consumed in order.
pub enum Scripted {
    Ok(Value),
    Status(u16, Option<Value>),
    Transport(&'static str),
}

#[derive(Default)]
struct Inner {
    script: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<PreparedRequest>>,
}

/// Scriptable [`HttpBackend`]: pops one [`Scripted`] outcome per call and
/// records every prepared request it sees. Clones share state, so tests
/// keep one handle while the gateway owns another.
#[derive(Clone, Default)]
pub struct FakeBackend {
    inner: Arc<Inner>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, outcome: Scripted) {
        self.inner.script.lock().unwrap().push_back(outcome);
    }

    pub fn requests(&self) -> Vec<PreparedRequest> {
        self.inner.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.inner.requests.lock().unwrap().len()
    }
}

impl HttpBackend for FakeBackend {
    fn execute(&self, request: &PreparedRequest) -> Result<Value, GatewayError> {
        self.inner.requests.lock().unwrap().push(request.clone());
        let outcome = self.inner.script.lock().unwrap().pop_front();
        match outcome {
            Some(Scripted::Ok(body)) => Ok(body),
            Some(Scripted::Status(status, body)) => Err(GatewayError::Status {
                status,
                path: request.path.clone(),
                body,
            }),
            Some(Scripted::Transport(message)) => Err(GatewayError::Transport {
                path: request.path.clone(),
                message: message.to_string(),
            }),
            None => Err(GatewayError::Transport {
                path: request.path.clone(),
                message: "script exhausted".to_string(),
            }),
        }
    }
}

/// Gateway over a [`FakeBackend`], plus a counter of `Expired` events
/// published on its session channel.
pub fn gateway_with(backend: &FakeBackend) -> (RequestGateway, Arc<AtomicUsize>) {
    let session = SessionEventChannel::new();
    let expired = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&expired);
    // Dropping the handle unsubscribes; keep this one registered for the
    // life of the test.
    let handle = session.subscribe(move |SessionEvent::Expired| {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    std::mem::forget(handle);
    let gateway =
        RequestGateway::with_backend(Box::new(backend.clone()), "https://api.example.com", session);
    (gateway, expired)
}

/// Find a header value on a recorded request, case-insensitively.
pub fn header<'a>(request: &'a PreparedRequest, name: &str) -> Option<&'a str> {
    request
        .headers
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}
