//! Interactive shell channel backed by a russh PTY session.

use std::collections::VecDeque;
use std::time::Duration;

use log::trace;
use russh::client::Msg;
use russh::{Channel, ChannelMsg};
use tokio::time::{Instant, timeout_at};

use crate::channel::SessionChannel;
use crate::error::ChannelError;

/// [`SessionChannel`] over a russh channel with a PTY and shell already
/// requested.
///
/// russh delivers output as discrete messages; this type flattens them
/// into a pending byte queue so reads are non-blocking and bounded, as the
/// executor requires.
pub struct ShellChannel {
    channel: Channel<Msg>,
    pending: VecDeque<u8>,
    exhausted: bool,
}

impl ShellChannel {
    pub(crate) fn new(channel: Channel<Msg>) -> Self {
        Self {
            channel,
            pending: VecDeque::new(),
            exhausted: false,
        }
    }

    fn absorb(&mut self, msg: ChannelMsg) {
        match msg {
            ChannelMsg::Data { data } => self.pending.extend(&*data),
            // With a PTY the server rarely uses the stderr stream, but
            // keep whatever arrives there, in order.
            ChannelMsg::ExtendedData { data, .. } => self.pending.extend(&*data),
            ChannelMsg::Eof | ChannelMsg::Close => self.exhausted = true,
            other => trace!("ignoring channel message: {other:?}"),
        }
    }
}

impl SessionChannel for ShellChannel {
    async fn ready(&mut self, bound: Duration) -> Result<bool, ChannelError> {
        if !self.pending.is_empty() {
            return Ok(true);
        }
        if self.exhausted {
            return Err(ChannelError::Closed);
        }

        let deadline = Instant::now() + bound;
        while self.pending.is_empty() {
            match timeout_at(deadline, self.channel.wait()).await {
                Err(_) => return Ok(false),
                Ok(None) => self.exhausted = true,
                Ok(Some(msg)) => self.absorb(msg),
            }
            if self.exhausted && self.pending.is_empty() {
                return Err(ChannelError::Closed);
            }
        }
        Ok(true)
    }

    fn data_available(&self) -> bool {
        !self.pending.is_empty()
    }

    fn read_chunk(&mut self, max_bytes: usize) -> Result<Vec<u8>, ChannelError> {
        let take = max_bytes.min(self.pending.len());
        Ok(self.pending.drain(..take).collect())
    }

    async fn send(&mut self, bytes: &[u8]) -> Result<(), ChannelError> {
        self.channel.data(bytes).await.map_err(ChannelError::Ssh)
    }

    async fn close(&mut self) -> Result<(), ChannelError> {
        // Nothing to tear down if the remote side already closed.
        if self.exhausted {
            return Ok(());
        }
        self.channel.eof().await.map_err(ChannelError::Ssh)?;
        self.channel.close().await.map_err(ChannelError::Ssh)?;
        self.exhausted = true;
        Ok(())
    }
}
