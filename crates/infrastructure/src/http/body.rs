use super::bounded;
use bytes::Bytes;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};
use uniproxy_domain::http::status_has_no_body;
use uniproxy_domain::{DomainError, Headers, RequestHead, ResponseHead};

const MAX_CHUNK_LINE_LEN: usize = 8 * 1024;

/// How the end of a message body is found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyFraming {
    None,
    Length(u64),
    Chunked,
    /// Body runs until the sender closes the connection.
    UntilClose,
}

impl BodyFraming {
    /// Requests without `Transfer-Encoding` or `Content-Length` have no body.
    pub fn for_request(request: &RequestHead) -> Result<Self, DomainError> {
        if let Some(encoding) = request.headers.get("Transfer-Encoding") {
            return if is_chunked(&request.headers) {
                Ok(BodyFraming::Chunked)
            } else {
                Err(DomainError::InvalidHttp(format!(
                    "unsupported request transfer encoding: {}",
                    encoding
                )))
            };
        }
        match content_length(&request.headers)? {
            Some(0) | None => Ok(BodyFraming::None),
            Some(len) => Ok(BodyFraming::Length(len)),
        }
    }

    /// Responses to `HEAD` and 1xx/204/304 responses never carry a body,
    /// whatever their headers say.
    pub fn for_response(response: &ResponseHead, head_request: bool) -> Result<Self, DomainError> {
        if head_request || status_has_no_body(response.code) {
            return Ok(BodyFraming::None);
        }
        if response.headers.contains("Transfer-Encoding") {
            return Ok(if is_chunked(&response.headers) {
                BodyFraming::Chunked
            } else {
                BodyFraming::UntilClose
            });
        }
        match content_length(&response.headers)? {
            Some(0) => Ok(BodyFraming::None),
            Some(len) => Ok(BodyFraming::Length(len)),
            None => Ok(BodyFraming::UntilClose),
        }
    }
}

/// Chunked only when `chunked` is the final transfer coding.
fn is_chunked(headers: &Headers) -> bool {
    headers
        .iter()
        .filter(|(name, _)| name.eq_ignore_ascii_case("Transfer-Encoding"))
        .flat_map(|(_, value)| value.split(','))
        .map(str::trim)
        .filter(|coding| !coding.is_empty())
        .last()
        .is_some_and(|coding| coding.eq_ignore_ascii_case("chunked"))
}

fn content_length(headers: &Headers) -> Result<Option<u64>, DomainError> {
    let mut length = None;
    for (_, value) in headers
        .iter()
        .filter(|(name, _)| name.eq_ignore_ascii_case("Content-Length"))
    {
        let parsed = value
            .trim()
            .parse::<u64>()
            .map_err(|_| DomainError::InvalidHttp(format!("invalid Content-Length: {}", value)))?;
        if length.is_some_and(|previous| previous != parsed) {
            return Err(DomainError::InvalidHttp(
                "conflicting Content-Length headers".to_string(),
            ));
        }
        length = Some(parsed);
    }
    Ok(length)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChunkState {
    Length(u64),
    ChunkSize,
    /// Remaining chunk data plus its trailing CRLF.
    ChunkData(u64),
    Trailers,
    UntilClose,
    Done,
}

/// Yields a body exactly as it appears on the wire.
///
/// Chunked bodies are passed through with their size lines, CRLFs and
/// trailer section intact; framing is only tracked to know where the body
/// ends. Each read is bounded by the optional I/O timeout.
pub struct BodyChunks<'a, R> {
    reader: &'a mut R,
    state: ChunkState,
    io_timeout: Option<Duration>,
}

impl<'a, R> BodyChunks<'a, R>
where
    R: AsyncBufRead + Unpin,
{
    pub fn new(reader: &'a mut R, framing: BodyFraming, io_timeout: Option<Duration>) -> Self {
        let state = match framing {
            BodyFraming::None => ChunkState::Done,
            BodyFraming::Length(len) => ChunkState::Length(len),
            BodyFraming::Chunked => ChunkState::ChunkSize,
            BodyFraming::UntilClose => ChunkState::UntilClose,
        };
        Self {
            reader,
            state,
            io_timeout,
        }
    }

    /// Next piece of raw body, or `None` once the body is complete.
    pub async fn next_chunk(&mut self) -> Result<Option<Bytes>, DomainError> {
        match self.state {
            ChunkState::Done => Ok(None),
            ChunkState::Length(0) => {
                self.state = ChunkState::Done;
                Ok(None)
            }
            ChunkState::Length(remaining) => {
                let chunk = self.read_some(remaining).await?;
                self.state = ChunkState::Length(remaining - chunk.len() as u64);
                Ok(Some(chunk))
            }
            ChunkState::UntilClose => {
                let chunk = self.read_available(u64::MAX).await?;
                if chunk.is_empty() {
                    self.state = ChunkState::Done;
                    return Ok(None);
                }
                Ok(Some(chunk))
            }
            ChunkState::ChunkSize => {
                let line = self.read_line().await?;
                let size = parse_chunk_size(&line)?;
                self.state = if size == 0 {
                    ChunkState::Trailers
                } else {
                    size.checked_add(2)
                        .map(ChunkState::ChunkData)
                        .ok_or_else(|| DomainError::InvalidHttp("chunk size overflow".to_string()))?
                };
                Ok(Some(line))
            }
            ChunkState::ChunkData(remaining) => {
                let chunk = self.read_some(remaining).await?;
                let remaining = remaining - chunk.len() as u64;
                self.state = if remaining == 0 {
                    ChunkState::ChunkSize
                } else {
                    ChunkState::ChunkData(remaining)
                };
                Ok(Some(chunk))
            }
            ChunkState::Trailers => {
                let line = self.read_line().await?;
                if line.as_ref() == b"\r\n" || line.as_ref() == b"\n" {
                    self.state = ChunkState::Done;
                }
                Ok(Some(line))
            }
        }
    }

    /// Reads at least one byte; EOF here means the body was cut short.
    async fn read_some(&mut self, limit: u64) -> Result<Bytes, DomainError> {
        let chunk = self.read_available(limit).await?;
        if chunk.is_empty() {
            return Err(DomainError::UnexpectedEof);
        }
        Ok(chunk)
    }

    async fn read_available(&mut self, limit: u64) -> Result<Bytes, DomainError> {
        let available = bounded(self.io_timeout, self.reader.fill_buf()).await?;
        let n = available.len().min(usize::try_from(limit).unwrap_or(usize::MAX));
        let chunk = Bytes::copy_from_slice(&available[..n]);
        self.reader.consume(n);
        Ok(chunk)
    }

    async fn read_line(&mut self) -> Result<Bytes, DomainError> {
        let mut line = Vec::new();
        let n = bounded(
            self.io_timeout,
            (&mut *self.reader)
                .take(MAX_CHUNK_LINE_LEN as u64)
                .read_until(b'\n', &mut line),
        )
        .await?;
        if n == 0 {
            return Err(DomainError::UnexpectedEof);
        }
        if line.last() != Some(&b'\n') {
            return Err(if n >= MAX_CHUNK_LINE_LEN {
                DomainError::InvalidHttp("chunk line too long".to_string())
            } else {
                DomainError::UnexpectedEof
            });
        }
        Ok(Bytes::from(line))
    }
}

fn parse_chunk_size(line: &[u8]) -> Result<u64, DomainError> {
    let text = std::str::from_utf8(line)
        .map_err(|_| DomainError::InvalidHttp("chunk size is not ASCII".to_string()))?;
    let size = text.split(';').next().unwrap_or_default().trim();
    u64::from_str_radix(size, 16)
        .map_err(|_| DomainError::InvalidHttp(format!("invalid chunk size: {:?}", size)))
}
