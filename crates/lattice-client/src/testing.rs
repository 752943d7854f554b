//! Scripted transport for unit tests.
//!
//! `MockTransport` stands in for the TCP transport: tests script connect
//! and call failures through the shared `MockState` handle and inspect the
//! requests each node received.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use serde_json::json;

use lattice_common::protocol::{LatticeError, Request, Response, Result};
use lattice_common::transport::Transport;

use crate::group::ClientGroup;
use crate::node::NodeClient;

#[derive(Default)]
pub struct MockState {
    open: AtomicBool,
    open_attempts: AtomicUsize,
    calls: Mutex<Vec<Request>>,
    fail_open: Mutex<Option<String>>,
    fail_next_call: Mutex<Option<String>>,
    reply_error: Mutex<Option<String>>,
}

impl MockState {
    /// Makes every subsequent `open` fail with a transport error carrying
    /// `message` (possibly empty, to exercise the fallback rule).
    pub fn fail_open_with(&self, message: &str) {
        *self.lock(&self.fail_open) = Some(message.to_string());
    }

    /// Makes the next `send_request` fail at the wire level, once.
    pub fn fail_next_call(&self, message: &str) {
        *self.lock(&self.fail_next_call) = Some(message.to_string());
    }

    /// Makes every subsequent call answered with an error response.
    pub fn reply_error(&self, message: &str) {
        *self.lock(&self.reply_error) = Some(message.to_string());
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    pub fn open_attempts(&self) -> usize {
        self.open_attempts.load(Ordering::SeqCst)
    }

    /// Requests successfully received by this node, in arrival order.
    pub fn calls(&self) -> Vec<Request> {
        self.lock(&self.calls).clone()
    }

    fn lock<'a, T>(&self, mutex: &'a Mutex<T>) -> std::sync::MutexGuard<'a, T> {
        mutex.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

pub struct MockTransport {
    addr: String,
    state: Arc<MockState>,
}

impl MockTransport {
    pub fn new(addr: &str) -> (Self, Arc<MockState>) {
        let state = Arc::new(MockState::default());
        (
            Self {
                addr: addr.to_string(),
                state: Arc::clone(&state),
            },
            state,
        )
    }
}

impl Transport for MockTransport {
    fn open(&mut self) -> Result<()> {
        self.state.open_attempts.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = self.state.lock(&self.state.fail_open).clone() {
            // Raw variant on purpose: the fallback rule is the node
            // client's job.
            return Err(LatticeError::Transport(message));
        }
        self.state.open.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn close(&mut self) {
        self.state.open.store(false, Ordering::SeqCst);
    }

    fn is_open(&self) -> bool {
        self.state.is_open()
    }

    fn send_request(&mut self, request: &Request) -> Result<Response> {
        if !self.is_open() {
            return Err(LatticeError::Transport(format!(
                "Not connected to {}",
                self.addr
            )));
        }
        if let Some(message) = self.state.lock(&self.state.fail_next_call).take() {
            return Err(LatticeError::Transport(message));
        }
        if let Some(message) = self.state.lock(&self.state.reply_error).clone() {
            return Ok(Response::error(request.id, message));
        }

        self.state.lock(&self.state.calls).push(request.clone());
        Ok(Response::success(
            request.id,
            json!({"node": self.addr, "method": request.method}),
        ))
    }

    fn addr(&self) -> &str {
        &self.addr
    }
}

/// Builds a connected group of mock nodes and hands back the state handles
/// in the same order as `addrs`.
pub fn mock_group(keyspace: &str, addrs: &[&str]) -> (ClientGroup, Vec<Arc<MockState>>) {
    let mut nodes = Vec::with_capacity(addrs.len());
    let mut states = Vec::with_capacity(addrs.len());

    for addr in addrs {
        let (transport, state) = MockTransport::new(addr);
        nodes.push(NodeClient::new(Box::new(transport)));
        states.push(state);
    }

    let group = ClientGroup::from_nodes(keyspace, nodes)
        .expect("mock nodes connect unconditionally");
    (group, states)
}
