//! In-memory broadcast stream
//!
//! A `BroadcastStream` over a pair of tokio channels. The server half goes to
//! the handler, the client half stays with whoever plays the peer: tests, or an
//! embedding process that submits without a network hop.

use async_trait::async_trait;
use shared_types::{BroadcastResponse, Envelope};
use tokio::sync::mpsc;

use crate::domain::errors::StreamError;
use crate::ports::inbound::BroadcastStream;

/// Requests in flight per direction. Small, so a slow reader applies backpressure.
const CHANNEL_CAPACITY: usize = 1;

/// Creates a connected stream pair for a peer at `remote_addr`.
pub fn in_memory_stream(remote_addr: impl Into<String>) -> (InMemoryStream, StreamClient) {
    let (req_tx, req_rx) = mpsc::channel(CHANNEL_CAPACITY);
    let (resp_tx, resp_rx) = mpsc::channel(CHANNEL_CAPACITY);

    let stream = InMemoryStream {
        requests: req_rx,
        responses: resp_tx,
        remote_addr: remote_addr.into(),
    };
    let client = StreamClient {
        requests: Some(req_tx),
        responses: Some(resp_rx),
    };
    (stream, client)
}

/// Server half, handed to [`crate::BroadcastHandler::handle`].
pub struct InMemoryStream {
    requests: mpsc::Receiver<Result<Envelope, StreamError>>,
    responses: mpsc::Sender<BroadcastResponse>,
    remote_addr: String,
}

#[async_trait]
impl BroadcastStream for InMemoryStream {
    async fn recv(&mut self) -> Result<Option<Envelope>, StreamError> {
        match self.requests.recv().await {
            Some(Ok(env)) => Ok(Some(env)),
            Some(Err(e)) => Err(e),
            None => Ok(None),
        }
    }

    async fn send(&mut self, response: BroadcastResponse) -> Result<(), StreamError> {
        self.responses
            .send(response)
            .await
            .map_err(|_| StreamError::Closed)
    }

    fn remote_addr(&self) -> String {
        self.remote_addr.clone()
    }
}

/// Client half.
pub struct StreamClient {
    requests: Option<mpsc::Sender<Result<Envelope, StreamError>>>,
    responses: Option<mpsc::Receiver<BroadcastResponse>>,
}

impl StreamClient {
    /// Queues one submission.
    pub async fn send(&mut self, env: Envelope) -> Result<(), StreamError> {
        self.push(Ok(env)).await
    }

    /// Makes the server's next `recv` fail with `err`.
    pub async fn inject_error(&mut self, err: StreamError) -> Result<(), StreamError> {
        self.push(Err(err)).await
    }

    /// Waits for the next response; `None` once the server side is gone.
    pub async fn recv_response(&mut self) -> Option<BroadcastResponse> {
        match self.responses.as_mut() {
            Some(rx) => rx.recv().await,
            None => None,
        }
    }

    /// Sends one submission and waits for its response.
    pub async fn submit(&mut self, env: Envelope) -> Result<BroadcastResponse, StreamError> {
        self.send(env).await?;
        self.recv_response().await.ok_or(StreamError::Closed)
    }

    /// Half-closes the stream: the server sees end-of-stream after draining what
    /// was already sent. Responses can still be read.
    pub fn close(&mut self) {
        self.requests = None;
    }

    /// Drops both directions, as a peer vanishing would.
    pub fn disconnect(&mut self) {
        self.requests = None;
        self.responses = None;
    }

    async fn push(&mut self, item: Result<Envelope, StreamError>) -> Result<(), StreamError> {
        let tx = self.requests.as_ref().ok_or(StreamError::Closed)?;
        tx.send(item).await.map_err(|_| StreamError::Closed)
    }
}
