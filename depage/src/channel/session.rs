//! The duplex byte-stream session interface the executor polls.

use std::future::Future;
use std::time::Duration;

use crate::error::ChannelError;

/// An interactive command-response session: an opaque duplex byte stream
/// with non-blocking reads and bounded waits.
///
/// The executor borrows exactly one of these per call and closes it when
/// the call ends. A session must not be shared across concurrent executor
/// invocations; it models a single command-response conversation.
///
/// Reads never block: [`read_chunk`](Self::read_chunk) returns whatever is
/// currently buffered, possibly nothing. Implementations backed by a
/// message-oriented transport (see
/// [`ShellChannel`](crate::transport::ShellChannel)) buffer incoming data
/// internally so these semantics hold.
pub trait SessionChannel: Send {
    /// Wait until data is readable or `bound` elapses.
    ///
    /// Returns `Ok(true)` when at least one byte can be read without
    /// blocking, `Ok(false)` when the bound elapsed first. A zero `bound`
    /// is a non-blocking availability check.
    ///
    /// # Errors
    ///
    /// [`ChannelError::Closed`] once the remote side has shut the stream
    /// down and no buffered data remains.
    fn ready(
        &mut self,
        bound: Duration,
    ) -> impl Future<Output = Result<bool, ChannelError>> + Send;

    /// Whether buffered data can be read right now, without waiting.
    fn data_available(&self) -> bool;

    /// Read up to `max_bytes` of currently buffered data.
    ///
    /// Never blocks; returns an empty vec when nothing is buffered.
    fn read_chunk(&mut self, max_bytes: usize) -> Result<Vec<u8>, ChannelError>;

    /// Write raw bytes to the remote side.
    fn send(&mut self, bytes: &[u8]) -> impl Future<Output = Result<(), ChannelError>> + Send;

    /// Release the channel. The executor calls this on every exit path;
    /// closing an already-dead channel must succeed.
    fn close(&mut self) -> impl Future<Output = Result<(), ChannelError>> + Send;
}

/// A mutable borrow is itself a session: lets callers keep ownership of a
/// channel across an [`execute`](crate::Executor::execute) call (which
/// still closes it).
impl<C: SessionChannel> SessionChannel for &mut C {
    async fn ready(&mut self, bound: Duration) -> Result<bool, ChannelError> {
        (**self).ready(bound).await
    }

    fn data_available(&self) -> bool {
        (**self).data_available()
    }

    fn read_chunk(&mut self, max_bytes: usize) -> Result<Vec<u8>, ChannelError> {
        (**self).read_chunk(max_bytes)
    }

    async fn send(&mut self, bytes: &[u8]) -> Result<(), ChannelError> {
        (**self).send(bytes).await
    }

    async fn close(&mut self) -> Result<(), ChannelError> {
        (**self).close().await
    }
}
