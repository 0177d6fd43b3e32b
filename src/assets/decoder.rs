use std::{
    future::Future,
    pin::Pin,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    task::{Context, Poll},
};

use tokio::sync::{Semaphore, mpsc, oneshot};

use crate::{
    assets::{decode::decode_source, decoded::DecodedImage, source::SharedSource},
    foundation::error::DecodeError,
};

/// Maximum number of decodes admitted at once by [`Decoder::new`].
pub const MAX_CONCURRENT_DECODES: usize = 3;

type DecodeResult = Result<DecodedImage, DecodeError>;

struct Request {
    source: SharedSource,
    reply: oneshot::Sender<DecodeResult>,
}

#[derive(Debug, Default)]
struct Counters {
    queued: AtomicUsize,
    in_flight: AtomicUsize,
}

/// Concurrency-limited image decoder.
///
/// Requests wait in a FIFO queue; a dispatcher admits the head of the queue whenever one of
/// the `limit` permits is free and runs the decode on Tokio's blocking pool. Completion,
/// successful or not, releases the permit and lets the next request in.
///
/// Cloning yields another handle to the same queue and permits.
#[derive(Clone, Debug)]
pub struct Decoder {
    tx: mpsc::UnboundedSender<Request>,
    counters: Arc<Counters>,
    limit: usize,
}

impl Decoder {
    /// Decoder admitting at most [`MAX_CONCURRENT_DECODES`] requests at a time.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime.
    pub fn new() -> Self {
        Self::with_limit(MAX_CONCURRENT_DECODES)
    }

    /// Decoder admitting at most `limit` requests at a time (minimum 1).
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime.
    pub fn with_limit(limit: usize) -> Self {
        let limit = limit.max(1);
        let (tx, rx) = mpsc::unbounded_channel();
        let counters = Arc::new(Counters::default());
        tokio::spawn(dispatch(
            rx,
            Arc::new(Semaphore::new(limit)),
            Arc::clone(&counters),
        ));
        Self {
            tx,
            counters,
            limit,
        }
    }

    /// Maximum number of concurrent decodes.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Requests currently being decoded.
    pub fn in_flight(&self) -> usize {
        self.counters.in_flight.load(Ordering::SeqCst)
    }

    /// Requests submitted but not yet admitted.
    pub fn queued(&self) -> usize {
        self.counters.queued.load(Ordering::SeqCst)
    }

    /// Enqueue `source` for decoding.
    ///
    /// The returned handle resolves exactly once, with the decoded image or a
    /// [`DecodeError`]. Dropping the handle does not cancel the request.
    pub fn load_image(&self, source: SharedSource) -> DecodeHandle {
        let name = source.name().to_string();
        let (reply, rx) = oneshot::channel();

        self.counters.queued.fetch_add(1, Ordering::SeqCst);
        if let Err(mpsc::error::SendError(req)) = self.tx.send(Request { source, reply }) {
            self.counters.queued.fetch_sub(1, Ordering::SeqCst);
            let _ = req.reply.send(Err(DecodeError::Cancelled { name: name.clone() }));
        }

        DecodeHandle { name, rx }
    }

    /// Submit every source, then wait for each one individually.
    ///
    /// Results come back in input order; one failure does not affect the others.
    pub async fn load_many(
        &self,
        sources: impl IntoIterator<Item = SharedSource>,
    ) -> Vec<DecodeResult> {
        let handles: Vec<DecodeHandle> = sources
            .into_iter()
            .map(|source| self.load_image(source))
            .collect();

        let mut out = Vec::with_capacity(handles.len());
        for handle in handles {
            out.push(handle.await);
        }
        out
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}

async fn dispatch(
    mut rx: mpsc::UnboundedReceiver<Request>,
    permits: Arc<Semaphore>,
    counters: Arc<Counters>,
) {
    while let Some(req) = rx.recv().await {
        let Ok(permit) = Arc::clone(&permits).acquire_owned().await else {
            let name = req.source.name().to_string();
            counters.queued.fetch_sub(1, Ordering::SeqCst);
            let _ = req.reply.send(Err(DecodeError::Cancelled { name }));
            continue;
        };

        counters.queued.fetch_sub(1, Ordering::SeqCst);
        counters.in_flight.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(
            source = req.source.name(),
            in_flight = counters.in_flight.load(Ordering::SeqCst),
            queued = counters.queued.load(Ordering::SeqCst),
            "decode admitted"
        );

        let counters = Arc::clone(&counters);
        tokio::spawn(async move {
            let Request { source, reply } = req;
            let name = source.name().to_string();
            let result = tokio::task::spawn_blocking(move || decode_source(source.as_ref()))
                .await
                .unwrap_or_else(|e| {
                    Err(DecodeError::Corrupt {
                        name: name.clone(),
                        message: format!("decode task failed: {e}"),
                    })
                });

            counters.in_flight.fetch_sub(1, Ordering::SeqCst);
            drop(permit);

            match &result {
                Ok(img) => tracing::debug!(
                    source = %name,
                    width = img.width(),
                    height = img.height(),
                    "decode finished"
                ),
                Err(err) => tracing::warn!(source = %name, error = %err, "decode failed"),
            }
            let _ = reply.send(result);
        });
    }
}

/// Pending result of [`Decoder::load_image`].
#[derive(Debug)]
pub struct DecodeHandle {
    name: String,
    rx: oneshot::Receiver<DecodeResult>,
}

impl DecodeHandle {
    /// Name of the source being decoded.
    pub fn source_name(&self) -> &str {
        &self.name
    }
}

impl Future for DecodeHandle {
    type Output = DecodeResult;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.rx).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(_)) => Poll::Ready(Err(DecodeError::Cancelled {
                name: self.name.clone(),
            })),
            Poll::Pending => Poll::Pending,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decoder.rs"]
mod tests;
