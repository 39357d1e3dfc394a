//! Live header subscription relay.
//!
//! One session bridges the node's upstream head feed into two outward
//! channels (headers, subscription errors) through a single multiplexing
//! task, decoupling the consumer's read cadence from upstream delivery.

use alloy::rpc::types::Header;
use tokio::sync::{broadcast, mpsc};

use crate::lifecycle::StopSignal;
use crate::node::HeadFeed;
use crate::types::{GatewayError, GatewayResult, NodeError};
use crate::EthGateway;

/// One live header subscription session.
///
/// A session moves from established to terminated exactly once; there is no
/// resubscription through an existing session. Headers and upstream
/// subscription errors arrive on separate channels, each in upstream order,
/// with no ordering guarantee between the two. Errors do not end the
/// session: the consumer reads them and decides whether to [`stop`].
/// Dropping the session terminates the relay the same way.
///
/// [`stop`]: HeadSession::stop
#[derive(Debug)]
pub struct HeadSession {
    pub headers: mpsc::Receiver<Header>,
    pub errors: mpsc::Receiver<NodeError>,
    stop: StopSignal,
}

impl HeadSession {
    /// Signal the relay task to terminate. No events are delivered after
    /// the task observes the signal; termination is bounded even while the
    /// relay is blocked on a slow consumer.
    pub fn stop(&self) {
        self.stop.trigger();
    }

    /// True once the relay task has exited (liveness probe).
    pub fn is_finished(&self) -> bool {
        self.stop.receiver_count() == 0
    }
}

impl EthGateway {
    /// Subscribe to newly produced block headers.
    ///
    /// Establishes the upstream subscription and spawns the session's single
    /// relay task. Forwarding is 1:1 with no buffering beyond the channel
    /// capacity itself, so a consumer that stops reading blocks the relay:
    /// backpressure is propagated upstream, never dropped.
    pub async fn subscribe_heads(&self) -> GatewayResult<HeadSession> {
        let feed = self
            .node
            .subscribe_new_heads()
            .await
            .map_err(GatewayError::SubscriptionSetup)?;

        let capacity = self.config.head_buffer.max(1);
        let (head_tx, head_rx) = mpsc::channel(capacity);
        let (err_tx, err_rx) = mpsc::channel(capacity);

        let stop = StopSignal::new();
        let stop_rx = stop.subscribe();
        tokio::spawn(relay(feed, head_tx, err_tx, stop_rx));

        tracing::debug!("head subscription session started");

        Ok(HeadSession {
            headers: head_rx,
            errors: err_rx,
            stop,
        })
    }
}

/// Forward both upstream sources until stopped, the consumer goes away, or
/// both sources close.
async fn relay(
    mut feed: HeadFeed,
    head_out: mpsc::Sender<Header>,
    err_out: mpsc::Sender<NodeError>,
    mut stop: broadcast::Receiver<()>,
) {
    let mut heads_open = true;
    let mut errors_open = true;

    while heads_open || errors_open {
        tokio::select! {
            _ = stop.recv() => break,
            head = feed.headers.recv(), if heads_open => match head {
                Some(header) => tokio::select! {
                    _ = stop.recv() => break,
                    sent = head_out.send(header) => if sent.is_err() { break },
                },
                // Source replaced/closed upstream: disarm it, keep the session.
                None => heads_open = false,
            },
            err = feed.errors.recv(), if errors_open => match err {
                Some(report) => tokio::select! {
                    _ = stop.recv() => break,
                    sent = err_out.send(report) => if sent.is_err() { break },
                },
                None => errors_open = false,
            },
        }
    }

    tracing::debug!("head relay task exiting");
}
