use tokio::io::{duplex, split, BufReader, DuplexStream, ReadHalf, WriteHalf};

use crate::transport::LineTransport;

/// Line channel over an in-process pipe. Same framing as TCP.
pub type InMemoryTransport = LineTransport<BufReader<ReadHalf<DuplexStream>>, WriteHalf<DuplexStream>>;

const PIPE_CAPACITY: usize = 4096;

impl LineTransport<BufReader<ReadHalf<DuplexStream>>, WriteHalf<DuplexStream>> {
    /// Two connected ends. Dropping one closes the stream for the other.
    pub fn pair() -> (Self, Self) {
        let (a, b) = duplex(PIPE_CAPACITY);
        (Self::from_duplex(a), Self::from_duplex(b))
    }

    pub fn from_duplex(stream: DuplexStream) -> Self {
        let (read, write) = split(stream);
        Self::new(BufReader::new(read), write)
    }
}
