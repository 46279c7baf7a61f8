use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::common::{ApiEvent, ChatMessage, ThreadId};

use super::error::ApiError;

/// Fixed chat refresh period. No backoff on errors.
pub const POLL_INTERVAL: Duration = Duration::from_millis(3000);

/// Read side of a chat thread, as used by the poller.
pub trait ChatBackend: Send + Sync + 'static {
    fn fetch_thread(&self, thread: ThreadId)
    -> BoxFuture<'static, Result<Vec<ChatMessage>, ApiError>>;
}

/// Periodic re-fetch of one chat thread for one mounted view.
///
/// The first fetch starts immediately, then one per [`POLL_INTERVAL`]. Each
/// tick spawns its own fetch, so a slow response does not delay the next one
/// and results are delivered in arrival order. After [`ChatPoller::cancel`]
/// (or drop) no further event is emitted, including by fetches already in
/// flight.
pub struct ChatPoller {
    subscription: Uuid,
    cancel: CancellationToken,
    refresh: mpsc::UnboundedSender<()>,
}

impl ChatPoller {
    pub fn spawn<B: ChatBackend>(
        backend: Arc<B>,
        subscription: Uuid,
        thread: ThreadId,
        events: mpsc::Sender<ApiEvent>,
    ) -> Self {
        let cancel = CancellationToken::new();
        let (refresh, refresh_requests) = mpsc::unbounded_channel();

        tokio::spawn(poll_loop(
            backend,
            subscription,
            thread,
            events,
            cancel.clone(),
            refresh_requests,
        ));

        Self {
            subscription,
            cancel,
            refresh,
        }
    }

    pub fn subscription(&self) -> Uuid {
        self.subscription
    }

    /// Fetch once now, outside the regular schedule. Every call yields its
    /// own fetch, however many are queued before the loop gets to them.
    pub fn refresh_now(&self) {
        if self.refresh.send(()).is_err() {
            log::debug!("Refresh requested for a stopped poller");
        }
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }
}

impl Drop for ChatPoller {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn poll_loop<B: ChatBackend>(
    backend: Arc<B>,
    subscription: Uuid,
    thread: ThreadId,
    events: mpsc::Sender<ApiEvent>,
    cancel: CancellationToken,
    mut refresh_requests: mpsc::UnboundedReceiver<()>,
) {
    let mut ticker = tokio::time::interval(POLL_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    log::info!("Polling chat {thread} every {}ms", POLL_INTERVAL.as_millis());

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
            Some(()) = refresh_requests.recv() => {
                log::debug!("Out-of-band refresh for chat {thread}");
            }
        }

        tokio::spawn(fetch_once(
            backend.clone(),
            subscription,
            thread.clone(),
            events.clone(),
            cancel.clone(),
        ));
    }

    log::info!("Stopped polling chat {thread}");
}

async fn fetch_once<B: ChatBackend>(
    backend: Arc<B>,
    subscription: Uuid,
    thread: ThreadId,
    events: mpsc::Sender<ApiEvent>,
    cancel: CancellationToken,
) {
    let result = tokio::select! {
        _ = cancel.cancelled() => return,
        result = backend.fetch_thread(thread.clone()) => result,
    };
    if cancel.is_cancelled() {
        return;
    }

    let event = match result {
        Ok(messages) => ApiEvent::MessagesLoaded {
            subscription,
            messages,
        },
        Err(ApiError::SessionInvalidated) => ApiEvent::SessionInvalidated,
        Err(err) => {
            log::warn!("Failed to load messages for chat {thread}: {err}");
            ApiEvent::MessagesFailed { subscription }
        }
    };

    // A full channel must not let the result outlive the poller.
    tokio::select! {
        biased;
        _ = cancel.cancelled() => {}
        sent = events.send(event) => {
            if let Err(err) = sent {
                log::debug!("Chat event dropped, receiver gone: {err}");
            }
        }
    }
}
