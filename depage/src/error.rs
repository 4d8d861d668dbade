//! Error types for depage.

use std::io;
use std::time::Duration;

use thiserror::Error;

/// Main error type for depage operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Command execution errors
    #[error("Execute error: {0}")]
    Execute(#[from] ExecuteError),

    /// Session channel errors
    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),

    /// SSH transport-level errors
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}

/// Executor errors (the polling loop itself).
#[derive(Error, Debug)]
pub enum ExecuteError {
    /// The device prompt did not return within the configured bound.
    ///
    /// `partial` holds everything accumulated before the deadline, so
    /// callers saving partial output (e.g. a half-fetched config) can
    /// still get at it.
    #[error("Command timed out after {elapsed:?}")]
    Timeout {
        elapsed: Duration,
        partial: String,
    },

    /// The command was empty or whitespace-only.
    #[error("Command is empty")]
    EmptyCommand,

    /// Invalid prompt or pagination regex
    #[error("Invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

/// Session channel errors (reads, writes, teardown).
///
/// These are never conflated with normal loop termination: a failing
/// channel surfaces here instead of being reported as a completed command.
#[derive(Error, Debug)]
pub enum ChannelError {
    /// Channel closed before the command completed
    #[error("Channel closed")]
    Closed,

    /// SSH protocol error on the channel
    #[error("Channel SSH error: {0}")]
    Ssh(russh::Error),

    /// I/O error from a channel implementation
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Transport layer errors (SSH connection, authentication).
#[derive(Error, Debug)]
pub enum TransportError {
    /// Failed to connect to host
    #[error("Connection failed to {host}:{port}: {source}")]
    ConnectionFailed {
        host: String,
        port: u16,
        #[source]
        source: io::Error,
    },

    /// SSH handshake or protocol error
    #[error("SSH error: {0}")]
    Ssh(#[from] russh::Error),

    /// Authentication failed
    #[error("Authentication failed for user '{user}'")]
    AuthenticationFailed { user: String },

    /// SSH key error
    #[error("SSH key error: {0}")]
    Key(String),

    /// Connection attempt timed out
    #[error("Connection timed out after {0:?}")]
    Timeout(Duration),

    /// Host key changed since it was recorded in known_hosts
    #[error("Host key for {host}:{port} changed (known_hosts line {line})")]
    HostKeyChanged {
        host: String,
        port: u16,
        line: usize,
    },

    /// Host not present in known_hosts under strict verification
    #[error("Unknown host key for {host}:{port}")]
    HostKeyUnknown { host: String, port: u16 },

    /// known_hosts file could not be read or written
    #[error("known_hosts error: {0}")]
    KnownHosts(String),
}

/// Result type alias using depage's Error.
pub type Result<T> = std::result::Result<T, Error>;
