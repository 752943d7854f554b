use lattice_common::protocol::{LatticeError, Request, Result, RpcResult};
use lattice_common::transport::{TcpTransport, Transport};

/// Client for one store node.
///
/// Wraps exactly one [`Transport`] and adds the reconnect discipline: every
/// failure path tears the connection down so the next
/// [`ensure_connected`](NodeClient::ensure_connected) dials fresh. There is
/// no same-call retry; a failed call surfaces to the caller.
pub struct NodeClient {
    transport: Box<dyn Transport>,
}

impl NodeClient {
    pub fn new(transport: Box<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Builds a node client over the stock TCP transport. The connection is
    /// not opened here; see [`ensure_connected`](NodeClient::ensure_connected).
    pub fn tcp(addr: impl Into<String>) -> Self {
        Self::new(Box::new(TcpTransport::new(addr.into())))
    }

    pub fn addr(&self) -> &str {
        self.transport.addr()
    }

    pub fn is_connected(&self) -> bool {
        self.transport.is_open()
    }

    /// Opens the transport if it is not already open. Idempotent and cheap
    /// when the connection is up.
    ///
    /// On failure the transport is closed defensively and the error is
    /// returned. Transport-level failures carry the underlying message, or
    /// the fixed fallback when the failure is messageless.
    pub fn ensure_connected(&mut self) -> Result<()> {
        if self.transport.is_open() {
            return Ok(());
        }

        match self.transport.open() {
            Ok(()) => Ok(()),
            Err(err) => {
                self.transport.close();
                tracing::debug!(addr = %self.transport.addr(), error = %err, "Connect failed");
                Err(normalize(err))
            }
        }
    }

    /// Sends one request over the open transport and interprets the
    /// response.
    ///
    /// - A transport-level failure closes the connection and surfaces as
    ///   [`LatticeError::Transport`] with the message-or-fallback rule.
    /// - Any other failure closes the connection and propagates unchanged.
    /// - An error *response* maps to [`LatticeError::Remote`]; the exchange
    ///   completed, so the connection stays open.
    pub fn call(&mut self, request: &Request) -> Result<RpcResult> {
        match self.transport.send_request(request) {
            Ok(response) => {
                if response.success {
                    response.result.ok_or_else(|| {
                        LatticeError::InvalidResponse(
                            "Missing result in success response".to_string(),
                        )
                    })
                } else {
                    Err(LatticeError::Remote(
                        response.error.unwrap_or_else(|| "Unknown error".to_string()),
                    ))
                }
            }
            Err(err) => {
                self.transport.close();
                tracing::debug!(
                    addr = %self.transport.addr(),
                    method = %request.method,
                    error = %err,
                    "Call failed, connection torn down"
                );
                Err(normalize(err))
            }
        }
    }
}

/// Applies the message-or-fallback rule to transport-level failures and
/// leaves every other error untouched.
fn normalize(err: LatticeError) -> LatticeError {
    match err {
        LatticeError::Transport(msg) => LatticeError::transport(msg),
        other => other,
    }
}
