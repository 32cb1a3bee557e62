//! Bidirectional exchange driver.
//!
//! A sender task pushes requests on a fixed cadence and then closes its
//! side; a receiver task drains responses until the peer ends the stream.
//! The two only meet at the stream itself and at a single completion
//! signal the caller waits on.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio_stream::wrappers::ReceiverStream;
use tonic::{Status, Streaming};

use crate::config::ExchangeConfig;
use crate::error::Error;
use crate::pb::{StatusResponse, User};
use crate::report::Reporter;

const DEFAULT_OUTBOUND_BUFFER: usize = 8;

/// The receiving half of a response stream.
///
/// `Ok(None)` is a clean end-of-stream.
pub trait Inbound: Send + 'static {
    fn message(
        &mut self,
    ) -> impl Future<Output = Result<Option<StatusResponse>, Status>> + Send;
}

impl Inbound for Streaming<StatusResponse> {
    async fn message(&mut self) -> Result<Option<StatusResponse>, Status> {
        Streaming::message(self).await
    }
}

/// Counts of one finished exchange.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExchangeSummary {
    pub sent: usize,
    pub received: usize,
}

/// Report every response until end-of-stream. The stream is not polled
/// again after it ends.
pub(crate) async fn drain<I, R>(inbound: &mut I, reporter: &R) -> Result<usize, Error>
where
    I: Inbound,
    R: Reporter + ?Sized,
{
    let mut received = 0;
    loop {
        match inbound.message().await {
            Ok(Some(response)) => {
                tracing::debug!(status = %response.status, "Response received");
                reporter.received(&response);
                received += 1;
            }
            Ok(None) => {
                tracing::debug!(received, "Peer closed the stream");
                return Ok(received);
            }
            Err(status) => return Err(Error::Receive(status)),
        }
    }
}

/// Drives a bidirectional stream to completion.
///
/// # Example
///
/// ```ignore
/// let driver = DuplexDriver::new(Duration::from_secs(2));
/// let mut grpc = client.clone();
/// let summary = driver
///     .drive(sample_users(), ConsoleReporter, |requests| async move {
///         grpc.add_user_stream_both(requests).await.map(|r| r.into_inner())
///     })
///     .await?;
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DuplexDriver {
    interval: Duration,
    buffer: usize,
}

impl DuplexDriver {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            buffer: DEFAULT_OUTBOUND_BUFFER,
        }
    }

    pub fn from_config(config: &ExchangeConfig) -> Self {
        Self::new(config.duplex_interval()).with_buffer(config.outbound_buffer)
    }

    /// Capacity of the outbound channel; at least 1.
    pub fn with_buffer(mut self, buffer: usize) -> Self {
        self.buffer = buffer.max(1);
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Send `users` in order and report every response.
    ///
    /// `open` receives the outbound request stream and starts the call. The
    /// sender task is already running when it is invoked, so a server that
    /// waits for the first request before answering cannot deadlock the
    /// exchange.
    ///
    /// Returns only after the receiver has seen end-of-stream. A peer may
    /// end the stream before every user went out; the sender is stopped and
    /// `sent` counts what reached the stream. A receive error stops the
    /// sender and is returned as [`Error::Receive`].
    pub async fn drive<R, I, F, Fut>(
        &self,
        users: Vec<User>,
        reporter: R,
        open: F,
    ) -> Result<ExchangeSummary, Error>
    where
        R: Reporter,
        I: Inbound,
        F: FnOnce(ReceiverStream<User>) -> Fut,
        Fut: Future<Output = Result<I, Status>>,
    {
        let reporter = Arc::new(reporter);
        let sent = Arc::new(AtomicUsize::new(0));
        let (outbound, requests) = mpsc::channel(self.buffer);

        let sender = tokio::spawn(send_all(
            outbound,
            users,
            self.interval,
            Arc::clone(&reporter),
            Arc::clone(&sent),
        ));

        let mut inbound = match open(ReceiverStream::new(requests)).await {
            Ok(inbound) => inbound,
            Err(status) => {
                sender.abort();
                return Err(Error::Rpc(status));
            }
        };

        let (done_tx, done_rx) = oneshot::channel();
        tokio::spawn(async move {
            let result = drain(&mut inbound, &*reporter).await;
            let _ = done_tx.send(result);
        });

        let received = match done_rx.await {
            Ok(Ok(received)) => received,
            Ok(Err(err)) => {
                sender.abort();
                return Err(err);
            }
            Err(_) => {
                sender.abort();
                return Err(Error::Exchange(
                    "receiver task ended without signalling completion".to_string(),
                ));
            }
        };

        if sender.is_finished() {
            sender.await?;
        } else {
            tracing::debug!("Peer ended the stream before all users were sent");
            sender.abort();
        }

        Ok(ExchangeSummary {
            sent: sent.load(Ordering::SeqCst),
            received,
        })
    }
}

/// `sent` is bumped right after each accepted send. Dropping `outbound` on
/// return closes the send side.
async fn send_all<R: Reporter>(
    outbound: mpsc::Sender<User>,
    users: Vec<User>,
    interval: Duration,
    reporter: Arc<R>,
    sent: Arc<AtomicUsize>,
) {
    let total = users.len();

    for (index, user) in users.into_iter().enumerate() {
        if index > 0 {
            tokio::time::sleep(interval).await;
        }

        tracing::debug!(id = %user.id, "Sending user");
        reporter.sending(&user);
        if outbound.send(user).await.is_err() {
            tracing::debug!(sent = index, total, "Request stream closed");
            return;
        }
        sent.fetch_add(1, Ordering::SeqCst);
    }

    tracing::debug!(sent = total, "Closing send side");
}
