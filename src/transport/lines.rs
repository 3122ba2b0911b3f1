use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::{timeout, Duration};

use crate::config::MAX_LINE_LEN;
use crate::protocol::ProtocolError;
use crate::transport::LineChannel;

/// [`LineChannel`] over any buffered reader and writer pair.
pub struct LineTransport<R, W> {
    reader: R,
    writer: W,
    recv_timeout: Option<Duration>,
    max_line_len: usize,
    buf: Vec<u8>,
}

impl<R, W> LineTransport<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader,
            writer,
            recv_timeout: None,
            max_line_len: MAX_LINE_LEN,
            buf: Vec::with_capacity(MAX_LINE_LEN + 2),
        }
    }

    /// Bound every `recv_line` wait. `None` waits forever.
    pub fn with_recv_timeout(mut self, recv_timeout: Option<Duration>) -> Self {
        self.recv_timeout = recv_timeout;
        self
    }

    async fn read_line(&mut self) -> anyhow::Result<String> {
        self.buf.clear();
        // room for the content, an optional '\r' and the '\n'
        let limit = (self.max_line_len + 2) as u64;
        let n = (&mut self.reader)
            .take(limit)
            .read_until(b'\n', &mut self.buf)
            .await
            .map_err(read_error)?;
        if n == 0 {
            return Err(ProtocolError::ConnectionClosed.into());
        }
        if self.buf.last() != Some(&b'\n') {
            if n as u64 == limit {
                return Err(ProtocolError::MalformedMessage {
                    line: String::from_utf8_lossy(&self.buf).into_owned(),
                    reason: "line too long",
                }
                .into());
            }
            // stream ended before the terminator
            return Err(ProtocolError::ConnectionClosed.into());
        }
        self.buf.pop();
        let content_len = match self.buf.last() {
            Some(b'\r') => self.buf.len() - 1,
            _ => self.buf.len(),
        };
        if content_len > self.max_line_len {
            return Err(ProtocolError::MalformedMessage {
                line: String::from_utf8_lossy(&self.buf).into_owned(),
                reason: "line too long",
            }
            .into());
        }
        String::from_utf8(self.buf.clone()).map_err(|e| {
            ProtocolError::MalformedMessage {
                line: String::from_utf8_lossy(e.as_bytes()).into_owned(),
                reason: "not valid UTF-8",
            }
            .into()
        })
    }
}

fn read_error(e: std::io::Error) -> anyhow::Error {
    match e.kind() {
        std::io::ErrorKind::UnexpectedEof
        | std::io::ErrorKind::ConnectionReset
        | std::io::ErrorKind::ConnectionAborted => ProtocolError::ConnectionClosed.into(),
        _ => anyhow::anyhow!("Read error: {}", e),
    }
}

fn write_error(e: std::io::Error) -> anyhow::Error {
    match e.kind() {
        std::io::ErrorKind::BrokenPipe
        | std::io::ErrorKind::ConnectionReset
        | std::io::ErrorKind::ConnectionAborted
        | std::io::ErrorKind::WriteZero => ProtocolError::ConnectionClosed.into(),
        _ => anyhow::anyhow!("Write error: {}", e),
    }
}

#[async_trait::async_trait]
impl<R, W> LineChannel for LineTransport<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn send_line(&mut self, line: &str) -> anyhow::Result<()> {
        if line.contains('\n') {
            return Err(anyhow::anyhow!("Refusing to send embedded newline in {:?}", line));
        }
        let mut frame = Vec::with_capacity(line.len() + 1);
        frame.extend_from_slice(line.as_bytes());
        frame.push(b'\n');
        self.writer.write_all(&frame).await.map_err(write_error)?;
        self.writer.flush().await.map_err(write_error)?;
        log::trace!("-> {}", line);
        Ok(())
    }

    async fn recv_line(&mut self) -> anyhow::Result<String> {
        let line = match self.recv_timeout {
            Some(limit) => timeout(limit, self.read_line())
                .await
                .map_err(|_| anyhow::Error::from(ProtocolError::Timeout(limit)))??,
            None => self.read_line().await?,
        };
        log::trace!("<- {}", line);
        Ok(line)
    }
}
