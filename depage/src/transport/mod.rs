//! SSH transport layer wrapping russh.
//!
//! Connection setup, authentication, and PTY shell channels live here.
//! The executor itself never touches this module: it only sees the
//! [`SessionChannel`](crate::channel::SessionChannel) that
//! [`SshTransport::open_shell`] hands out.

pub mod config;
mod shell;
mod ssh;

pub use config::{AuthMethod, HostKeyVerification, SshConfig};
pub use shell::ShellChannel;
pub use ssh::SshTransport;
