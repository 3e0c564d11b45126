use serde::Serialize;
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use super::{MAX_DAP_HEADER_LINE_BYTES, MAX_DAP_MESSAGE_BYTES};
use crate::error::DapError;

pub type Result<T> = std::result::Result<T, DapError>;

/// Reads DAP-framed JSON messages:
///
/// ```text
/// Content-Length: 123\r\n
/// \r\n
/// { ...json... }
/// ```
pub struct DapReader<R> {
    reader: BufReader<R>,
}

impl<R: AsyncRead + Unpin> DapReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            reader: BufReader::new(inner),
        }
    }

    /// Next header line without its line terminator, or `None` at EOF.
    async fn read_header_line(&mut self, line: &mut String) -> Result<Option<()>> {
        line.clear();
        let limit = MAX_DAP_HEADER_LINE_BYTES as u64 + 1;
        let n = (&mut self.reader).take(limit).read_line(line).await?;
        if n == 0 {
            return Ok(None);
        }
        if n > MAX_DAP_HEADER_LINE_BYTES {
            return Err(DapError::Protocol(format!(
                "DAP header line exceeds maximum size ({MAX_DAP_HEADER_LINE_BYTES} bytes)"
            )));
        }
        let trimmed = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(trimmed);
        Ok(Some(()))
    }

    /// Read the raw body of the next message. `Ok(None)` means the stream
    /// ended cleanly between messages.
    pub async fn read_raw(&mut self) -> Result<Option<Vec<u8>>> {
        let mut content_length: Option<usize> = None;
        let mut saw_header_line = false;
        let mut line = String::new();

        loop {
            if self.read_header_line(&mut line).await?.is_none() {
                if !saw_header_line {
                    return Ok(None);
                }
                return Err(DapError::Io(std::io::Error::new(
                    std::io::ErrorKind::UnexpectedEof,
                    "EOF while reading DAP headers",
                )));
            }
            saw_header_line = true;

            if line.is_empty() {
                break;
            }

            let Some((name, value)) = line.split_once(':') else {
                continue;
            };
            if name.eq_ignore_ascii_case("Content-Length") {
                let value = value.trim();
                content_length = Some(value.parse::<usize>().map_err(|err| {
                    DapError::Protocol(format!("invalid Content-Length {value:?}: {err}"))
                })?);
            }
        }

        let Some(len) = content_length else {
            return Err(DapError::Protocol(
                "DAP message missing Content-Length header".to_owned(),
            ));
        };
        if len > MAX_DAP_MESSAGE_BYTES {
            return Err(DapError::Protocol(format!(
                "DAP message Content-Length {len} exceeds maximum allowed size {MAX_DAP_MESSAGE_BYTES}"
            )));
        }

        let mut buf = vec![0u8; len];
        self.reader.read_exact(&mut buf).await?;
        Ok(Some(buf))
    }

    pub async fn read_value(&mut self) -> Result<Option<Value>> {
        let Some(bytes) = self.read_raw().await? else {
            return Ok(None);
        };
        Ok(Some(serde_json::from_slice(&bytes)?))
    }
}

pub struct DapWriter<W> {
    writer: W,
}

impl<W: AsyncWrite + Unpin> DapWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub async fn write_raw(&mut self, json_bytes: &[u8]) -> Result<()> {
        let header = format!("Content-Length: {}\r\n\r\n", json_bytes.len());
        self.writer.write_all(header.as_bytes()).await?;
        self.writer.write_all(json_bytes).await?;
        self.writer.flush().await?;
        Ok(())
    }

    pub async fn write_message<T: Serialize>(&mut self, message: &T) -> Result<()> {
        let bytes = serde_json::to_vec(message)?;
        self.write_raw(&bytes).await
    }

    pub async fn write_value(&mut self, value: &Value) -> Result<()> {
        self.write_message(value).await
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}
