//! # depage
//!
//! Paging-aware command execution over interactive byte-stream sessions.
//!
//! Network devices paginate long output with "press any key to continue"
//! style prompts. depage runs a single command over an interactive session
//! (typically an SSH PTY), answers those pagination prompts with a
//! continuation keystroke, and returns the complete output once the
//! device's command prompt reappears — all under one wall-clock deadline.
//!
//! ## Features
//!
//! - One bounded read/classify/react loop with per-chunk pagination
//!   detection and full-buffer prompt detection
//! - Transport-agnostic: the executor runs against any
//!   [`SessionChannel`]; a russh-backed implementation is included
//! - Per-vendor pattern profiles, serde-compatible
//! - Timeouts carry the partial output; channel failures stay distinct
//!   from completion
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::time::Duration;
//!
//! use depage::{Executor, SshConfig, SshTransport};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), depage::Error> {
//!     let config = SshConfig::new("192.168.1.1", "admin").password("secret");
//!     let transport = SshTransport::connect(config).await?;
//!     let shell = transport.open_shell().await?;
//!
//!     let output = Executor::new()
//!         .with_timeout(Duration::from_secs(120))
//!         .execute(shell, "show running-config")
//!         .await?;
//!     println!("{output}");
//!
//!     transport.close().await?;
//!     Ok(())
//! }
//! ```

pub mod channel;
pub mod error;
pub mod executor;
pub mod profile;
pub mod transport;

// Re-export main types for convenience
pub use channel::{OutputBuffer, PagingPatterns, SessionChannel};
pub use error::{ChannelError, Error, ExecuteError, Result, TransportError};
pub use executor::{CONTINUATION_BYTE, ExecOptions, Executor};
pub use profile::DeviceProfile;
pub use transport::{AuthMethod, HostKeyVerification, ShellChannel, SshConfig, SshTransport};
