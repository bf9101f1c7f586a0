//! Stream combinators for standard input and output.
//!
//! Processes read from one input and write to one output per stream, so combining sources or
//! sinks happens on our side: [`Chain`] reads from several sources one after the other, and
//! [`FanOut`] copies every write to several sinks.

use tokio::io::{AsyncRead, AsyncWrite};

#[doc(inline)]
pub use self::{buffer::SharedBuffer, chain::Chain, fan_out::FanOut};

mod buffer;
mod chain;
mod fan_out;

/// A boxed source for standard input.
pub type BoxedReader = Box<dyn AsyncRead + Send + Unpin + 'static>;

/// A boxed sink for standard output or error.
pub type BoxedWriter = Box<dyn AsyncWrite + Send + Unpin + 'static>;
