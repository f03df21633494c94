//! Broadcast Handler
//!
//! Drives one stream per call to [`BroadcastHandler::handle`]:
//! receive, resolve, validate, submit, reply, repeat.
//!
//! ## Guarantees
//!
//! - Exactly one response per received envelope, in receive order
//! - A message reaches `order`/`configure` only after its validation succeeded
//! - Only transport faults end the loop; rejections never do
//! - Nothing is shared between streams except the `SupportManager`

use std::sync::Arc;
use std::time::Instant;

use quantum_telemetry::{
    BROADCAST_ENQUEUE_DURATION, BROADCAST_PROCESSED, BROADCAST_REJECTED,
    BROADCAST_VALIDATE_DURATION,
};
use shared_types::{BroadcastResponse, ConfigSeq, Envelope, Status};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::domain::errors::{BroadcastError, StreamError};
use crate::domain::status::{failure_response, Stage};
use crate::ports::inbound::BroadcastStream;
use crate::ports::outbound::{ChannelResolution, SupportManager};

/// Label used when a submission could not be attributed to a channel.
const UNKNOWN: &str = "unknown";

/// The broadcast ingestion handler.
///
/// Cheap to clone; every clone routes through the same `SupportManager`.
pub struct BroadcastHandler<M: SupportManager + ?Sized> {
    sm: Arc<M>,
}

impl<M: SupportManager + ?Sized> Clone for BroadcastHandler<M> {
    fn clone(&self) -> Self {
        Self {
            sm: Arc::clone(&self.sm),
        }
    }
}

impl<M: SupportManager + ?Sized> BroadcastHandler<M> {
    pub fn new(sm: Arc<M>) -> Self {
        Self { sm }
    }

    /// Serves `stream` until the client ends it or the transport fails.
    ///
    /// Returns `Ok(())` on a clean end-of-stream and the transport error otherwise.
    pub async fn handle<S>(&self, stream: &mut S) -> Result<(), StreamError>
    where
        S: BroadcastStream + ?Sized,
    {
        let addr = stream.remote_addr();
        debug!("[qc-broadcast] Starting new broadcast loop for {}", addr);

        loop {
            let env = match stream.recv().await {
                Ok(Some(env)) => env,
                Ok(None) => {
                    debug!("[qc-broadcast] Received EOF from {}, hangup", addr);
                    return Ok(());
                }
                Err(e) => {
                    warn!("[qc-broadcast] Error reading from {}: {}", addr, e);
                    return Err(e);
                }
            };

            let response = self.process_message(&env, &addr).await;

            if let Err(e) = stream.send(response).await {
                warn!("[qc-broadcast] Error sending to {}: {}", addr, e);
                return Err(e);
            }
        }
    }

    /// Runs the full pipeline for one envelope and returns its response.
    ///
    /// Never fails: every error is folded into a non-SUCCESS status.
    pub async fn process_message(&self, env: &Envelope, addr: &str) -> BroadcastResponse {
        let ChannelResolution {
            header,
            is_config_update,
            support,
        } = match self.sm.broadcast_channel_support(env) {
            Ok(resolution) => resolution,
            Err(e) => {
                warn!(
                    stage = Stage::Resolve.as_str(),
                    kind = e.kind(),
                    "[qc-broadcast] Could not resolve channel for message from {}: {}",
                    addr,
                    e
                );
                let tracker = Tracker::unresolved(env);
                tracker.reject(Stage::Resolve, &e);
                return tracker.finish(failure_response(Stage::Resolve, &e));
            }
        };

        let tracker = Tracker::new(&header.channel_id, header.header_type.as_str());

        let validate_start = Instant::now();
        let validated: Result<(Option<Envelope>, ConfigSeq), BroadcastError> =
            if is_config_update {
                support
                    .process_config_update_msg(env)
                    .map(|(config, seq)| (Some(config), seq))
            } else {
                support.process_normal_msg(env).map(|seq| (None, seq))
            };

        let (config, config_seq) = match validated {
            Ok(v) => {
                tracker.observe_validate(validate_start, Status::Success);
                v
            }
            Err(e) => {
                let response = failure_response(Stage::Validate, &e);
                tracker.observe_validate(validate_start, response.status);
                tracker.reject(Stage::Validate, &e);
                warn!(
                    stage = Stage::Validate.as_str(),
                    kind = e.kind(),
                    "[channel: {}] Rejecting broadcast of {} from {} because of error: {}",
                    header.channel_id,
                    header.header_type,
                    addr,
                    e
                );
                return tracker.finish(response);
            }
        };

        let enqueue_start = Instant::now();
        let submitted = match config {
            Some(config) => support.configure(env, config, config_seq).await,
            None => support.order(env, config_seq).await,
        };

        if let Err(e) = submitted {
            let response = failure_response(Stage::Submit, &e);
            tracker.observe_enqueue(enqueue_start, response.status);
            tracker.reject(Stage::Submit, &e);
            warn!(
                stage = Stage::Submit.as_str(),
                kind = e.kind(),
                "[channel: {}] Rejecting broadcast of {} from {} with {}: {}",
                header.channel_id,
                header.header_type,
                addr,
                response.status,
                e
            );
            return tracker.finish(response);
        }
        tracker.observe_enqueue(enqueue_start, Status::Success);

        debug!(
            "[channel: {}] Broadcast has successfully enqueued {} from {} at config sequence {}",
            header.channel_id, header.header_type, addr, config_seq
        );
        tracker.finish(BroadcastResponse::success())
    }
}

impl<M: SupportManager + ?Sized + 'static> BroadcastHandler<M> {
    /// Serves `stream` on its own task.
    pub fn spawn<S>(&self, mut stream: S) -> JoinHandle<Result<(), StreamError>>
    where
        S: BroadcastStream + 'static,
    {
        let handler = self.clone();
        tokio::spawn(async move { handler.handle(&mut stream).await })
    }
}

/// Per-message metric labels.
struct Tracker {
    channel: String,
    msg_type: String,
}

impl Tracker {
    fn new(channel: &str, msg_type: &str) -> Self {
        Self {
            channel: channel.to_string(),
            msg_type: msg_type.to_string(),
        }
    }

    /// Labels for a submission the manager refused; best effort from the raw header.
    fn unresolved(env: &Envelope) -> Self {
        match env.payload() {
            Ok(payload) => {
                let chdr = payload.header.channel_header;
                let channel = if chdr.channel_id.is_empty() {
                    UNKNOWN
                } else {
                    chdr.channel_id.as_str()
                };
                Self::new(channel, chdr.header_type.as_str())
            }
            Err(_) => Self::new(UNKNOWN, UNKNOWN),
        }
    }

    fn observe_validate(&self, start: Instant, status: Status) {
        BROADCAST_VALIDATE_DURATION
            .with_label_values(&[&self.channel, &self.msg_type, status.as_str()])
            .observe(start.elapsed().as_secs_f64());
    }

    fn observe_enqueue(&self, start: Instant, status: Status) {
        BROADCAST_ENQUEUE_DURATION
            .with_label_values(&[&self.channel, &self.msg_type, status.as_str()])
            .observe(start.elapsed().as_secs_f64());
    }

    fn reject(&self, stage: Stage, err: &BroadcastError) {
        BROADCAST_REJECTED
            .with_label_values(&[&self.channel, stage.as_str(), err.kind()])
            .inc();
    }

    fn finish(&self, response: BroadcastResponse) -> BroadcastResponse {
        BROADCAST_PROCESSED
            .with_label_values(&[&self.channel, &self.msg_type, response.status.as_str()])
            .inc();
        response
    }
}
