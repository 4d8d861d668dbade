//! The paging-aware command executor.
//!
//! One bounded-time read/classify/react loop: every chunk arriving on the
//! session is either a pagination prompt (answer it with a keystroke), the
//! device prompt (the command is done), or ordinary output (keep it).
//! Pagination is checked against the chunk just read; the device prompt is
//! checked against the full accumulated output, so a prompt split across
//! reads is still found.

use std::time::Duration;

use log::{debug, trace, warn};
use regex::bytes::Regex;
use tokio::time::Instant;

use crate::channel::{
    DEFAULT_PROMPT_PATTERN, OutputBuffer, PagingPatterns, SessionChannel, compile_prompt_pattern,
};
use crate::error::{ChannelError, ExecuteError, Result};
use crate::profile::DeviceProfile;

/// The keystroke sent to dismiss a pagination prompt.
pub const CONTINUATION_BYTE: &[u8] = b" ";

/// Tuning knobs for a single [`Executor::execute`] call.
#[derive(Debug, Clone)]
pub struct ExecOptions {
    /// Upper bound on total wall-clock time for the call.
    pub timeout: Duration,

    /// Maximum bytes per non-blocking read.
    pub chunk_size: usize,

    /// Bounded wait per polling iteration.
    pub poll_interval: Duration,

    /// Settle pause after prompt detection, before draining trailing
    /// output still in flight.
    pub settle_delay: Duration,
}

impl Default for ExecOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            chunk_size: 1024,
            poll_interval: Duration::from_millis(200),
            settle_delay: Duration::from_millis(500),
        }
    }
}

/// Executes one command over an interactive session, answering pagination
/// prompts until the device prompt returns.
///
/// All configuration is immutable per instance; an `Executor` can be
/// reused across calls but each call owns its channel exclusively.
///
/// # Example
///
/// ```rust,no_run
/// use depage::{Executor, SshConfig, SshTransport};
///
/// # async fn example() -> Result<(), depage::Error> {
/// let config = SshConfig::new("192.168.1.1", "admin").password("secret");
/// let transport = SshTransport::connect(config).await?;
/// let shell = transport.open_shell().await?;
///
/// let output = Executor::new().execute(shell, "show version").await?;
/// println!("{output}");
/// # Ok(())
/// # }
/// ```
pub struct Executor {
    /// Device prompt matcher, searched over the full accumulated output.
    prompt: Regex,

    /// Pagination prompt set, searched per chunk in priority order.
    paging: PagingPatterns,

    /// Timing and sizing knobs.
    options: ExecOptions,
}

impl Executor {
    /// Create an executor with the default prompt pattern, the default
    /// pagination set, and default options.
    pub fn new() -> Self {
        Self {
            prompt: compile_prompt_pattern(DEFAULT_PROMPT_PATTERN)
                .expect("default prompt pattern is valid"),
            paging: PagingPatterns::default(),
            options: ExecOptions::default(),
        }
    }

    /// Build an executor from a device profile's patterns.
    pub fn from_profile(profile: &DeviceProfile) -> Result<Self> {
        Ok(Self {
            prompt: compile_prompt_pattern(&profile.prompt_pattern)
                .map_err(ExecuteError::InvalidPattern)?,
            paging: PagingPatterns::new(&profile.paging_patterns)
                .map_err(ExecuteError::InvalidPattern)?,
            options: ExecOptions::default(),
        })
    }

    /// Override the device prompt pattern (anchored if not already).
    pub fn with_prompt_pattern(mut self, pattern: &str) -> Result<Self> {
        self.prompt = compile_prompt_pattern(pattern).map_err(ExecuteError::InvalidPattern)?;
        Ok(self)
    }

    /// Override the pagination pattern set.
    pub fn with_paging_patterns(mut self, paging: PagingPatterns) -> Self {
        self.paging = paging;
        self
    }

    /// Override all timing and sizing options.
    pub fn with_options(mut self, options: ExecOptions) -> Self {
        self.options = options;
        self
    }

    /// Override just the total timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.options.timeout = timeout;
        self
    }

    /// The compiled prompt pattern.
    pub fn prompt(&self) -> &Regex {
        &self.prompt
    }

    /// The pagination pattern set.
    pub fn paging(&self) -> &PagingPatterns {
        &self.paging
    }

    /// The current options.
    pub fn options(&self) -> &ExecOptions {
        &self.options
    }

    /// Execute `command` over `channel` and return the full output.
    ///
    /// A line terminator is appended to the command automatically. The
    /// returned text is decoded permissively and includes the echoed
    /// command and the final prompt line verbatim.
    ///
    /// The channel is consumed: it is closed on every exit path. A close
    /// failure after an otherwise successful command is an error; after a
    /// failed command it is logged and the original error wins.
    ///
    /// # Errors
    ///
    /// - [`ExecuteError::Timeout`] when the prompt does not return within
    ///   the configured bound; the partial output rides along in the error.
    /// - [`ExecuteError::EmptyCommand`] for empty or whitespace commands.
    /// - [`ChannelError`](crate::error::ChannelError) when a read or write
    ///   fails; channel failures are never reported as completion.
    pub async fn execute<C: SessionChannel>(&self, mut channel: C, command: &str) -> Result<String> {
        if command.trim().is_empty() {
            return Err(ExecuteError::EmptyCommand.into());
        }

        let result = self.collect(&mut channel, command).await;

        match channel.close().await {
            Ok(()) => {}
            Err(close_err) => match &result {
                Ok(_) => return Err(close_err.into()),
                Err(err) => warn!("channel close failed after {err}: {close_err}"),
            },
        }

        result
    }

    async fn collect<C: SessionChannel>(&self, channel: &mut C, command: &str) -> Result<String> {
        let session_ending = is_session_ending(command);

        // Discard whatever the device already sent (login banner, MOTD) so
        // a stale prompt in it cannot be mistaken for command completion.
        let mut discarded = 0;
        while channel.ready(Duration::ZERO).await? {
            discarded += channel.read_chunk(self.options.chunk_size)?.len();
        }
        if discarded > 0 {
            debug!("discarded {discarded} bytes of pre-command output");
        }

        channel.send(format!("{command}\n").as_bytes()).await?;

        let start = Instant::now();
        let mut output = OutputBuffer::new();

        loop {
            let elapsed = start.elapsed();
            if elapsed > self.options.timeout {
                debug!(
                    "timed out after {elapsed:?} with {} bytes accumulated",
                    output.len()
                );
                return Err(ExecuteError::Timeout {
                    elapsed,
                    partial: output.into_text(),
                }
                .into());
            }

            let readable = match channel.ready(self.options.poll_interval).await {
                Ok(readable) => readable,
                // exit/quit may tear the session down before any prompt
                // returns; for those the stream ending is completion.
                Err(ChannelError::Closed) if session_ending => break,
                Err(e) => return Err(e.into()),
            };

            if readable {
                let chunk = channel.read_chunk(self.options.chunk_size)?;
                output.extend(&chunk);
                trace!("read {} bytes ({} accumulated)", chunk.len(), output.len());

                if let Some(idx) = self.paging.first_match(&chunk) {
                    // Pagination takes precedence over prompt detection
                    // within a chunk: a paged fragment must not be read
                    // as completion.
                    debug!("pagination prompt matched (pattern {idx}), continuing");
                    channel.send(CONTINUATION_BYTE).await?;
                } else if output.contains(&self.prompt) {
                    self.drain_trailing(channel, &mut output).await?;
                    break;
                }
            }

            if session_ending {
                break;
            }
        }

        debug!("command completed with {} bytes of output", output.len());
        Ok(output.into_text())
    }

    /// The prompt is in, but trailing bytes may still be in flight: give
    /// the remote side one settle pause, then take everything currently
    /// available without further pattern checks.
    async fn drain_trailing<C: SessionChannel>(
        &self,
        channel: &mut C,
        output: &mut OutputBuffer,
    ) -> Result<()> {
        tokio::time::sleep(self.options.settle_delay).await;
        loop {
            match channel.ready(Duration::ZERO).await {
                Ok(true) => {}
                // The command already completed; the stream ending here is
                // just the end of the drain, not a failure.
                Ok(false) | Err(ChannelError::Closed) => return Ok(()),
                Err(e) => return Err(e.into()),
            }
            let chunk = channel.read_chunk(self.options.chunk_size)?;
            output.extend(&chunk);
        }
    }
}

impl Default for Executor {
    fn default() -> Self {
        Self::new()
    }
}

/// `exit` and `quit` may terminate the session before a prompt reappears,
/// so the loop must not wait for one.
fn is_session_ending(command: &str) -> bool {
    let command = command.trim();
    command.eq_ignore_ascii_case("exit") || command.eq_ignore_ascii_case("quit")
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;
    use crate::error::Error;

    /// When a scripted chunk becomes readable.
    enum Step {
        /// Buffered before the command is sent (banner noise).
        Banner(&'static [u8]),
        /// Readable once the command line has been written.
        Output(&'static [u8]),
        /// Readable only after a continuation byte has been observed.
        AfterContinue(&'static [u8]),
    }

    /// Scripted [`SessionChannel`] double. Chunks are delivered one per
    /// read, in order, with gating rules per [`Step`].
    struct ScriptedChannel {
        steps: VecDeque<Step>,
        writes: Vec<Vec<u8>>,
        command_sent: bool,
        closed: bool,
        closes_after_script: bool,
    }

    impl ScriptedChannel {
        fn new(steps: Vec<Step>) -> Self {
            Self {
                steps: steps.into(),
                writes: Vec::new(),
                command_sent: false,
                closed: false,
                closes_after_script: false,
            }
        }

        /// The remote side tears the stream down once the script runs out:
        /// after the command is sent and all chunks are consumed, `ready`
        /// reports the channel as closed.
        fn closing(steps: Vec<Step>) -> Self {
            Self {
                closes_after_script: true,
                ..Self::new(steps)
            }
        }

        fn front_available(&self) -> bool {
            match self.steps.front() {
                Some(Step::Banner(_)) => true,
                Some(Step::Output(_)) => self.command_sent,
                Some(Step::AfterContinue(_)) => false,
                None => false,
            }
        }

        fn continuation_count(&self) -> usize {
            self.writes.iter().filter(|w| w.as_slice() == b" ").count()
        }
    }

    impl SessionChannel for ScriptedChannel {
        async fn ready(&mut self, bound: Duration) -> std::result::Result<bool, ChannelError> {
            if !self.front_available() {
                if self.closes_after_script && self.command_sent && self.steps.is_empty() {
                    return Err(ChannelError::Closed);
                }
                tokio::time::sleep(bound).await;
            }
            Ok(self.front_available())
        }

        fn data_available(&self) -> bool {
            self.front_available()
        }

        fn read_chunk(&mut self, max_bytes: usize) -> std::result::Result<Vec<u8>, ChannelError> {
            if !self.front_available() {
                return Ok(Vec::new());
            }
            let data = match self.steps.pop_front() {
                Some(Step::Banner(d) | Step::Output(d) | Step::AfterContinue(d)) => d,
                None => return Ok(Vec::new()),
            };
            assert!(data.len() <= max_bytes, "scripted chunks fit one read");
            Ok(data.to_vec())
        }

        async fn send(&mut self, bytes: &[u8]) -> std::result::Result<(), ChannelError> {
            self.writes.push(bytes.to_vec());
            if bytes == CONTINUATION_BYTE {
                if let Some(step) = self
                    .steps
                    .iter_mut()
                    .find(|s| matches!(s, Step::AfterContinue(_)))
                {
                    if let Step::AfterContinue(d) = *step {
                        *step = Step::Output(d);
                    }
                }
            } else if bytes.ends_with(b"\n") {
                self.command_sent = true;
            }
            Ok(())
        }

        async fn close(&mut self) -> std::result::Result<(), ChannelError> {
            self.closed = true;
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_simple_command_no_paging() {
        let channel = ScriptedChannel::new(vec![
            Step::Output(b"show version\n"),
            Step::Output(b"Version 1.0\nrouter#"),
        ]);

        let executor = Executor::new();
        let output = executor.execute(channel, "show version").await.unwrap();
        assert_eq!(output, "show version\nVersion 1.0\nrouter#");
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_continuation_sent_without_paging() {
        let mut channel = ScriptedChannel::new(vec![Step::Output(b"output\nrouter# ")]);
        let executor = Executor::new();
        executor.execute(&mut channel, "show clock").await.unwrap();
        assert_eq!(channel.writes, vec![b"show clock\n".to_vec()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_paging_prompt() {
        let mut channel = ScriptedChannel::new(vec![
            Step::Output(b"--More--"),
            Step::AfterContinue(b"rest of output\nrouter>"),
        ]);

        let executor = Executor::new();
        let output = executor
            .execute(&mut channel, "show running-config")
            .await
            .unwrap();

        assert_eq!(output, "--More--rest of output\nrouter>");
        assert_eq!(channel.continuation_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_one_continuation_per_paging_occurrence() {
        let mut channel = ScriptedChannel::new(vec![
            Step::Output(b"page one\n--More--"),
            Step::AfterContinue(b"page two\n-- MORE --"),
            Step::AfterContinue(b"page three\nPress any key to continue"),
            Step::AfterContinue(b"tail\nrouter#"),
        ]);

        let executor = Executor::new();
        let output = executor
            .execute(&mut channel, "show running-config")
            .await
            .unwrap();

        assert_eq!(channel.continuation_count(), 3);
        assert!(output.starts_with("page one\n"));
        assert!(output.ends_with("tail\nrouter#"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_bounds_and_empty_partial() {
        let channel = ScriptedChannel::new(vec![]);
        // 900ms is deliberately off the poll grid so the failing check
        // falls strictly inside [timeout, timeout + poll_interval).
        let options = ExecOptions {
            timeout: Duration::from_millis(900),
            poll_interval: Duration::from_millis(200),
            ..ExecOptions::default()
        };

        let executor = Executor::new().with_options(options);
        let err = executor.execute(channel, "show tech").await.unwrap_err();

        match err {
            Error::Execute(ExecuteError::Timeout { elapsed, partial }) => {
                assert!(elapsed >= Duration::from_millis(900));
                assert!(elapsed < Duration::from_millis(1100));
                assert!(partial.is_empty());
            }
            other => panic!("expected timeout, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_carries_partial_output() {
        // Data arrives but the prompt never does.
        let channel = ScriptedChannel::new(vec![Step::Output(b"half a config ...\n")]);

        let executor = Executor::new().with_timeout(Duration::from_secs(1));
        let err = executor.execute(channel, "show running-config").await.unwrap_err();

        match err {
            Error::Execute(ExecuteError::Timeout { partial, .. }) => {
                assert_eq!(partial, "half a config ...\n");
            }
            other => panic!("expected timeout, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_exit_returns_without_prompt() {
        let channel = ScriptedChannel::new(vec![Step::Output(b"logout\n")]);

        let executor = Executor::new().with_timeout(Duration::from_secs(5));
        let output = executor.execute(channel, "exit").await.unwrap();
        assert_eq!(output, "logout\n");
    }

    #[tokio::test(start_paused = true)]
    async fn test_quit_with_no_output_returns_empty() {
        let channel = ScriptedChannel::new(vec![]);

        let executor = Executor::new();
        let output = executor.execute(channel, "QUIT").await.unwrap();
        assert_eq!(output, "");
    }

    #[tokio::test(start_paused = true)]
    async fn test_banner_discarded_before_command() {
        let mut channel = ScriptedChannel::new(vec![
            Step::Banner(b"Welcome to router\nrouter# "),
            Step::Output(b"show clock\n12:00:00\nrouter# "),
        ]);

        let executor = Executor::new();
        let output = executor.execute(&mut channel, "show clock").await.unwrap();

        assert_eq!(output, "show clock\n12:00:00\nrouter# ");
        assert!(channel.command_sent);
    }

    #[tokio::test(start_paused = true)]
    async fn test_trailing_flush_after_prompt_is_kept() {
        // The prompt matches on the first chunk; a slow trailing chunk is
        // already queued and must be swept up by the settle drain.
        let channel = ScriptedChannel::new(vec![
            Step::Output(b"output\nrouter# "),
            Step::Output(b"\nlate flush"),
        ]);

        let executor = Executor::new();
        let output = executor.execute(channel, "show clock").await.unwrap();
        assert_eq!(output, "output\nrouter# \nlate flush");
    }

    #[tokio::test(start_paused = true)]
    async fn test_channel_closed_on_success() {
        let mut channel = ScriptedChannel::new(vec![Step::Output(b"ok\nrouter# ")]);
        let executor = Executor::new();
        executor.execute(&mut channel, "show clock").await.unwrap();
        assert!(channel.closed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_channel_closed_on_timeout() {
        let mut channel = ScriptedChannel::new(vec![]);
        let executor = Executor::new().with_timeout(Duration::from_secs(1));
        executor
            .execute(&mut channel, "show clock")
            .await
            .unwrap_err();
        assert!(channel.closed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_command_rejected() {
        let channel = ScriptedChannel::new(vec![]);
        let executor = Executor::new();
        let err = executor.execute(channel, "   ").await.unwrap_err();
        assert!(matches!(err, Error::Execute(ExecuteError::EmptyCommand)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_paging_suppresses_prompt_check_same_chunk() {
        // The chunk contains a line the prompt pattern would match AND a
        // paging marker; paging must win and the loop must keep going.
        let mut channel = ScriptedChannel::new(vec![
            Step::Output(b"interface Gi0/1\n shutdown\nrouter#\n--More--"),
            Step::AfterContinue(b"\nend\nrouter#"),
        ]);

        let executor = Executor::new();
        let output = executor
            .execute(&mut channel, "show running-config")
            .await
            .unwrap();

        assert_eq!(channel.continuation_count(), 1);
        assert!(output.ends_with("\nend\nrouter#"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stream_end_during_trailing_drain_is_completion() {
        // The prompt has matched; the remote hanging up during the settle
        // drain just means there is nothing left to sweep up.
        let channel =
            ScriptedChannel::closing(vec![Step::Output(b"show clock\n12:00:00\nrouter# ")]);

        let executor = Executor::new();
        let output = executor.execute(channel, "show clock").await.unwrap();
        assert_eq!(output, "show clock\n12:00:00\nrouter# ");
    }

    #[tokio::test(start_paused = true)]
    async fn test_closed_channel_before_prompt_is_an_error() {
        // The stream ends mid-command with no prompt in sight; that must
        // surface as a channel failure, never as completion.
        let mut channel = ScriptedChannel::closing(vec![Step::Output(b"partial output\n")]);

        let executor = Executor::new();
        let err = executor.execute(&mut channel, "show clock").await.unwrap_err();

        assert!(matches!(err, Error::Channel(ChannelError::Closed)));
        assert!(channel.closed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exit_on_closing_stream_keeps_output() {
        let channel = ScriptedChannel::closing(vec![Step::Output(b"logout\n")]);

        let executor = Executor::new();
        let output = executor.execute(channel, "exit").await.unwrap();
        assert_eq!(output, "logout\n");
    }

    #[tokio::test(start_paused = true)]
    async fn test_exit_on_immediately_closed_stream_is_completion() {
        // exit tore the session down before anything came back at all.
        let channel = ScriptedChannel::closing(vec![]);

        let executor = Executor::new();
        let output = executor.execute(channel, "quit").await.unwrap();
        assert_eq!(output, "");
    }

    #[test]
    fn test_is_session_ending() {
        assert!(is_session_ending("exit"));
        assert!(is_session_ending(" Quit "));
        assert!(is_session_ending("EXIT"));
        assert!(!is_session_ending("exit session"));
        assert!(!is_session_ending("show version"));
    }
}
