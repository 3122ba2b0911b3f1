//! Line framing over a byte stream and the transports that carry it.

use alloc::boxed::Box;
use alloc::string::String;

/// Newline-delimited text channel to the peer.
///
/// One line per call; each `send_line` is flushed before it returns. The
/// turn protocol never has more than one `recv_line` outstanding.
#[async_trait::async_trait]
pub trait LineChannel: Send {
    /// Write `line` plus the terminator and flush.
    async fn send_line(&mut self, line: &str) -> anyhow::Result<()>;

    /// Wait for the next complete line, terminator stripped.
    async fn recv_line(&mut self) -> anyhow::Result<String>;
}

#[async_trait::async_trait]
impl<C: LineChannel + ?Sized> LineChannel for Box<C> {
    async fn send_line(&mut self, line: &str) -> anyhow::Result<()> {
        (**self).send_line(line).await
    }

    async fn recv_line(&mut self) -> anyhow::Result<String> {
        (**self).recv_line().await
    }
}

pub mod in_memory;
pub mod lines;
pub mod recording;
pub mod tcp;

pub use in_memory::InMemoryTransport;
pub use lines::LineTransport;
pub use recording::{check_alternation, RecordingTransport, TraceEvent, TraceHandle};
pub use tcp::TcpTransport;
