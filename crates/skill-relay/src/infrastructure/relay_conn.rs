//! WebSocket connection to the debug relay.
//!
//! The relay speaks JSON envelopes over a single WebSocket.  This module
//! handles the parts that touch the network:
//!
//! - building the upgrade request, including the `authorization` header;
//! - dialing the relay (`wss://` via rustls, or `ws://` for local relays);
//! - reading one data frame at a time, skipping control frames;
//! - writing one text frame at a time;
//! - the close handshake.
//!
//! The session loop talks to the connection through the [`RelayTransport`]
//! trait, so it can be driven by a scripted transport in tests.
//!
//! # Header casing
//!
//! The relay hosts only accept the credential under the lower-case header name
//! `authorization`.  Header names from the `http` crate are always stored and
//! written in lower case, so inserting [`AUTHORIZATION`] produces exactly that
//! on the wire.
//!
//! # Compression
//!
//! tungstenite never offers the `permessage-deflate` extension, so the
//! handshake goes out with compression disabled and no
//! `Sec-WebSocket-Extensions` header.

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use thiserror::Error;
use tokio::net::TcpStream;
use tokio_tungstenite::{
    connect_async,
    tungstenite::{
        client::IntoClientRequest,
        handshake::client::Request,
        http::{header::AUTHORIZATION, HeaderValue},
        protocol::{frame::coding::CloseCode, CloseFrame},
        Error as WsError, Message as WsMessage,
    },
    MaybeTlsStream, WebSocketStream,
};
use tracing::{debug, trace};

use crate::domain::{DebugConfig, RelayEndpoint};

/// Errors on the relay connection.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The endpoint URL or the access token could not be turned into an
    /// upgrade request.
    #[error("invalid relay request for {url}: {reason}")]
    InvalidRequest { url: String, reason: String },

    /// The relay could not be reached or refused the upgrade.
    #[error("WebSocket handshake with {url} failed: {source}")]
    Handshake {
        url: String,
        #[source]
        source: WsError,
    },

    /// The established connection failed.
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] WsError),

    /// The relay closed the connection, or the stream ended.
    #[error("relay closed the connection: {reason}")]
    Closed { reason: String },
}

/// Close status sent when the session releases the connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseStatus {
    /// Normal closure (1000) after cancellation.
    Normal,
    /// Internal error (1011) after a fatal session error.
    Failure,
}

impl CloseStatus {
    /// WebSocket close code.
    pub fn code(self) -> u16 {
        match self {
            CloseStatus::Normal => 1000,
            CloseStatus::Failure => 1011,
        }
    }

    /// Human-readable close reason.
    pub fn reason(self) -> &'static str {
        match self {
            CloseStatus::Normal => "bye",
            CloseStatus::Failure => "session failed",
        }
    }
}

/// A duplex, frame-oriented connection to the relay.
///
/// Implementations are used by exactly one session and are never shared.
#[async_trait]
pub trait RelayTransport: Send {
    /// Reads the next data frame and returns its bytes.
    ///
    /// A close frame or the end of the stream is reported as
    /// [`TransportError::Closed`].
    async fn read_frame(&mut self) -> Result<Vec<u8>, TransportError>;

    /// Writes one text frame.
    async fn write_frame(&mut self, text: String) -> Result<(), TransportError>;

    /// Performs the close handshake.
    async fn close(&mut self, status: CloseStatus) -> Result<(), TransportError>;
}

/// Builds the WebSocket upgrade request for `endpoint`, carrying
/// `access_token` verbatim in the `authorization` header.
///
/// # Errors
///
/// Returns [`TransportError::InvalidRequest`] if the URL does not parse as a
/// WebSocket URL or the token is not a valid header value.
pub fn handshake_request(
    endpoint: &RelayEndpoint,
    access_token: &str,
) -> Result<Request, TransportError> {
    let invalid = |reason: String| TransportError::InvalidRequest {
        url: endpoint.url().to_string(),
        reason,
    };

    let mut request = endpoint
        .url()
        .into_client_request()
        .map_err(|e| invalid(e.to_string()))?;

    let credential = HeaderValue::from_str(access_token)
        .map_err(|_| invalid("access token is not a valid header value".to_string()))?;
    request.headers_mut().insert(AUTHORIZATION, credential);

    Ok(request)
}

/// WebSocket connection to the relay.
pub struct WsRelayTransport {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl WsRelayTransport {
    /// Dials the relay described by `config` and completes the upgrade.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::InvalidRequest`] for an unusable endpoint or
    /// token, and [`TransportError::Handshake`] if the TCP connection, TLS
    /// negotiation, or upgrade fails (including the relay rejecting the token).
    pub async fn connect(config: &DebugConfig) -> Result<Self, TransportError> {
        install_crypto_provider();

        let request = handshake_request(&config.endpoint, config.access_token())?;
        let (stream, response) =
            connect_async(request)
                .await
                .map_err(|source| TransportError::Handshake {
                    url: config.endpoint.url().to_string(),
                    source,
                })?;

        debug!(status = %response.status(), "relay accepted WebSocket upgrade");
        Ok(Self { stream })
    }
}

#[async_trait]
impl RelayTransport for WsRelayTransport {
    async fn read_frame(&mut self) -> Result<Vec<u8>, TransportError> {
        loop {
            match self.stream.next().await {
                Some(Ok(WsMessage::Text(text))) => return Ok(text.into_bytes()),
                Some(Ok(WsMessage::Binary(data))) => return Ok(data),
                Some(Ok(WsMessage::Ping(data))) => {
                    // tungstenite queues the Pong reply itself; it goes out
                    // with the next read or write.
                    trace!("relay ping ({} bytes)", data.len());
                }
                Some(Ok(WsMessage::Pong(_))) | Some(Ok(WsMessage::Frame(_))) => {}
                Some(Ok(WsMessage::Close(frame))) => {
                    let reason = match frame {
                        Some(f) => format!("close code {} ({})", u16::from(f.code), f.reason),
                        None => "close frame without status".to_string(),
                    };
                    return Err(TransportError::Closed { reason });
                }
                Some(Err(e)) => return Err(e.into()),
                None => {
                    return Err(TransportError::Closed {
                        reason: "stream ended".to_string(),
                    })
                }
            }
        }
    }

    async fn write_frame(&mut self, text: String) -> Result<(), TransportError> {
        self.stream.send(WsMessage::Text(text)).await?;
        Ok(())
    }

    async fn close(&mut self, status: CloseStatus) -> Result<(), TransportError> {
        let frame = CloseFrame {
            code: CloseCode::from(status.code()),
            reason: status.reason().into(),
        };
        self.stream.close(Some(frame)).await?;
        Ok(())
    }
}

/// rustls needs a process-wide crypto provider before the first `wss://`
/// dial.  Installing twice is harmless; the second attempt is ignored.
fn install_crypto_provider() {
    let _ = rustls::crypto::ring::default_provider().install_default();
}

// ── Tests ─────────────────────────────────────────────────────────────────────
