//! HTTP transport trait
//!
//! The session client only needs a single request shape: POST a JSON body
//! (possibly empty) over HTTPS and read the status and body back. TLS,
//! DNS, sockets and link bring-up live behind this trait.

/// Errors below the HTTP status level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportError {
    /// No response within the transport's deadline
    Timeout,
    /// Peer reset the connection
    ConnectionReset,
    /// Other socket, TLS or DNS failure
    Io,
    /// Response body larger than the supplied buffer
    BufferOverflow,
    /// Network link is not up
    LinkDown,
}

/// Status and body length of a completed exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HttpResponse {
    pub status: u16,
    /// Bytes written to the response buffer
    pub len: usize,
}

impl HttpResponse {
    pub const fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Request/response HTTP transport
///
/// Each call is a single suspension point from the scheduler's point of
/// view and must be bounded by the transport's own timeout.
#[allow(async_fn_in_trait)]
pub trait HttpTransport {
    /// POST `body` as `application/json` to `url`, writing the response
    /// body into `response`
    async fn post(
        &mut self,
        url: &str,
        body: &[u8],
        response: &mut [u8],
    ) -> Result<HttpResponse, TransportError>;

    /// Link-up signal from the network stack
    fn is_link_up(&self) -> bool {
        true
    }
}
