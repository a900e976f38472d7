//! TCP connect seam.

use std::net::SocketAddrV4;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::net::TcpStream;

use crate::error_handling::ProbeError;

/// One bounded connection attempt.
///
/// Returns the time taken to establish the connection. Implementations must
/// give up after `timeout`.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self, addr: SocketAddrV4, timeout: Duration) -> Result<Duration, ProbeError>;
}

/// Real TCP handshake; the stream is closed immediately.
#[derive(Debug, Default, Clone, Copy)]
pub struct TcpConnector;

#[async_trait]
impl Connector for TcpConnector {
    async fn connect(&self, addr: SocketAddrV4, timeout: Duration) -> Result<Duration, ProbeError> {
        let start = Instant::now();
        match tokio::time::timeout(timeout, TcpStream::connect(addr)).await {
            Ok(Ok(stream)) => {
                let elapsed = start.elapsed();
                drop(stream);
                Ok(elapsed)
            }
            Ok(Err(source)) => Err(ProbeError::Connect { addr, source }),
            Err(_) => Err(ProbeError::Timeout { addr, timeout }),
        }
    }
}
