use std::net::SocketAddr;

use tokio::io::BufReader;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream, ToSocketAddrs};

use crate::protocol::ProtocolError;
use crate::transport::LineTransport;

/// Line channel over one TCP connection.
pub type TcpTransport = LineTransport<BufReader<OwnedReadHalf>, OwnedWriteHalf>;

impl LineTransport<BufReader<OwnedReadHalf>, OwnedWriteHalf> {
    pub fn from_stream(stream: TcpStream) -> Self {
        if let Err(e) = stream.set_nodelay(true) {
            log::debug!("could not set TCP_NODELAY: {}", e);
        }
        let (read, write) = stream.into_split();
        Self::new(BufReader::new(read), write)
    }

    /// Dial the peer (initiator side).
    pub async fn connect<A: ToSocketAddrs>(addr: A) -> anyhow::Result<Self> {
        let stream = TcpStream::connect(addr)
            .await
            .map_err(|e| ProtocolError::ConnectionSetup(format!("cannot connect: {}", e)))?;
        Ok(Self::from_stream(stream))
    }

    /// Accept exactly one peer from an already bound listener.
    pub async fn accept(listener: &TcpListener) -> anyhow::Result<(Self, SocketAddr)> {
        let (stream, peer) = listener
            .accept()
            .await
            .map_err(|e| ProtocolError::ConnectionSetup(format!("cannot accept: {}", e)))?;
        Ok((Self::from_stream(stream), peer))
    }

    /// Bind `addr`, wait for a single peer and stop listening.
    pub async fn accept_one<A: ToSocketAddrs>(addr: A) -> anyhow::Result<(Self, SocketAddr)> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ProtocolError::ConnectionSetup(format!("cannot listen: {}", e)))?;
        if let Ok(local) = listener.local_addr() {
            log::info!("Listening on {}, waiting for the opponent...", local);
        }
        Self::accept(&listener).await
    }
}
