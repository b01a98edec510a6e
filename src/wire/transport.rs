//! TCP transport for a single request/response exchange

use std::future::Future;
use std::io;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::common::config::ReadMode;
use crate::common::{Error, Result};

use super::codec::DELIMITER;

/// Await `fut`, failing with `Error::Timeout` if `limit` elapses first
pub async fn with_timeout<T, F>(phase: &'static str, limit: Option<Duration>, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match limit {
        Some(limit) => tokio::time::timeout(limit, fut)
            .await
            .map_err(|_| Error::Timeout {
                phase,
                secs: limit.as_secs(),
            })?,
        None => fut.await,
    }
}

/// Open a fresh connection to `addr`
pub async fn connect(addr: &str, timeout: Option<Duration>) -> Result<TcpStream> {
    with_timeout("Connect", timeout, async {
        TcpStream::connect(addr)
            .await
            .map_err(|e| Error::connect_failed(addr, e))
    })
    .await
}

/// Write a full message and flush it
pub async fn send_message<W: AsyncWrite + Unpin>(writer: &mut W, message: &[u8]) -> io::Result<()> {
    writer.write_all(message).await?;
    writer.flush().await?;
    Ok(())
}

/// Read a response of at most `limit` bytes
///
/// `Single` issues exactly one read: a response longer than `limit` is
/// truncated, and one that arrives in several fragments may be cut short.
/// `Line` keeps reading until a delimiter, EOF, or `limit`.
/// EOF before any data is an empty response, not an error.
pub async fn read_response<R: AsyncRead + Unpin>(
    reader: &mut R,
    limit: usize,
    mode: ReadMode,
) -> io::Result<Vec<u8>> {
    let mut buf = vec![0u8; limit];

    let filled = match mode {
        ReadMode::Single => reader.read(&mut buf).await?,
        ReadMode::Line => {
            let mut filled = 0;
            while filled < limit {
                let n = reader.read(&mut buf[filled..]).await?;
                if n == 0 {
                    break;
                }
                let done = buf[filled..filled + n].contains(&DELIMITER);
                filled += n;
                if done {
                    break;
                }
            }
            filled
        }
    };

    buf.truncate(filled);
    Ok(buf)
}
