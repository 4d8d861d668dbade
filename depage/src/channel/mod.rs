//! Channel layer: the session abstraction and pattern matching.
//!
//! This module defines the duplex byte-stream interface the executor
//! polls, plus output accumulation and prompt/pagination matching.

mod buffer;
mod patterns;
mod session;

pub use buffer::OutputBuffer;
pub use patterns::{
    DEFAULT_PAGING_PATTERNS, DEFAULT_PROMPT_PATTERN, PagingPatterns, compile_prompt_pattern,
};
pub use session::SessionChannel;
