//! Stand-in for the bucket store
//!
//! Answers every connection the same way so the driver can be exercised
//! without a real store. Each connection carries at most one request.

use std::io;

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};

/// Reply written by `StubMode::Ok`
pub const OK_REPLY: &[u8] = b"{\"status\": \"OK\"}\n";

/// How the stub answers a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum StubMode {
    /// Send the received line back unchanged
    Echo,
    /// Close the connection without writing anything
    Silent,
    /// Always answer `{"status": "OK"}`
    Ok,
}

/// Accept connections forever, one task per connection
pub async fn serve(listener: TcpListener, mode: StubMode) -> io::Result<()> {
    loop {
        let (socket, peer) = listener.accept().await?;
        tracing::info!("Connection from {}", peer);
        tokio::spawn(async move {
            match handle_connection(socket, mode).await {
                Ok(Some(line)) => tracing::info!("Handled request: {}", line.trim_end()),
                Ok(None) => tracing::info!("Closed {} without a reply", peer),
                Err(e) => tracing::warn!("Connection error from {}: {}", peer, e),
            }
        });
    }
}

/// Serve one connection, returning the request line if one was read
///
/// The write side is shut down first and the read side is drained to EOF
/// afterwards, so the client always sees a clean close rather than a reset.
pub async fn handle_connection(mut socket: TcpStream, mode: StubMode) -> io::Result<Option<String>> {
    let (reader, mut writer) = socket.split();
    let mut reader = BufReader::new(reader);

    if mode == StubMode::Silent {
        writer.shutdown().await?;
        drain(&mut reader).await?;
        return Ok(None);
    }

    let mut line = String::new();
    if reader.read_line(&mut line).await? == 0 {
        return Ok(None);
    }

    match mode {
        StubMode::Echo => writer.write_all(line.as_bytes()).await?,
        StubMode::Ok => writer.write_all(OK_REPLY).await?,
        StubMode::Silent => {}
    }
    writer.flush().await?;
    writer.shutdown().await?;
    drain(&mut reader).await?;

    Ok(Some(line))
}

/// Read and discard until the peer closes
pub async fn drain<R: AsyncRead + Unpin>(reader: &mut R) -> io::Result<u64> {
    tokio::io::copy(reader, &mut tokio::io::sink()).await
}
