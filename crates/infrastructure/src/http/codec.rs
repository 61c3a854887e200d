use super::bounded;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use uniproxy_domain::{DomainError, Headers, RequestHead, ResponseHead};

/// Upper bound on a request or response head, start line included.
pub const MAX_HEAD_LEN: usize = 64 * 1024;

/// Reads a request head. `Ok(None)` means the peer closed the connection
/// before sending anything, the normal end of a keep-alive session.
pub async fn read_request_head<R>(reader: &mut R) -> Result<Option<RequestHead>, DomainError>
where
    R: AsyncBufRead + Unpin,
{
    let Some(lines) = read_head_lines(reader).await? else {
        return Ok(None);
    };
    let (start, header_lines) = lines
        .split_first()
        .ok_or_else(|| DomainError::InvalidHttp("empty request head".to_string()))?;

    let mut parts = start.split_whitespace();
    let (Some(method), Some(uri), Some(version), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(DomainError::InvalidHttp(format!(
            "malformed request line: {:?}",
            start
        )));
    };
    check_version(version)?;

    let mut request = RequestHead::new(method, uri, version);
    request.headers = parse_headers(header_lines)?;
    Ok(Some(request))
}

/// Reads a response head. An upstream that closes before answering is an
/// error here, unlike on the client side.
pub async fn read_response_head<R>(
    reader: &mut R,
    io_timeout: Option<Duration>,
) -> Result<ResponseHead, DomainError>
where
    R: AsyncBufRead + Unpin,
{
    let lines = match io_timeout {
        Some(limit) => tokio::time::timeout(limit, read_head_lines(reader))
            .await
            .map_err(|_| DomainError::RelayTimeout)??,
        None => read_head_lines(reader).await?,
    }
    .ok_or(DomainError::UnexpectedEof)?;

    let (start, header_lines) = lines
        .split_first()
        .ok_or_else(|| DomainError::InvalidHttp("empty response head".to_string()))?;

    let mut parts = start.splitn(3, ' ');
    let version = parts.next().unwrap_or_default();
    check_version(version)?;
    let code = parts
        .next()
        .and_then(|code| code.parse::<u16>().ok())
        .filter(|code| (100..1000).contains(code))
        .ok_or_else(|| DomainError::InvalidHttp(format!("malformed status line: {:?}", start)))?;
    let reason = parts.next().unwrap_or_default().trim();

    let mut response = ResponseHead::new(version, code);
    response.reason = reason.to_string();
    response.headers = parse_headers(header_lines)?;
    Ok(response)
}

pub async fn write_request_head<W>(
    writer: &mut W,
    request: &RequestHead,
    io_timeout: Option<Duration>,
) -> Result<(), DomainError>
where
    W: AsyncWrite + Unpin,
{
    bounded(io_timeout, writer.write_all(&request.to_wire())).await
}

pub async fn write_response_head<W>(
    writer: &mut W,
    response: &ResponseHead,
    io_timeout: Option<Duration>,
) -> Result<(), DomainError>
where
    W: AsyncWrite + Unpin,
{
    bounded(io_timeout, writer.write_all(&response.to_wire())).await
}

fn check_version(version: &str) -> Result<(), DomainError> {
    if version.starts_with("HTTP/") {
        Ok(())
    } else {
        Err(DomainError::InvalidHttp(format!(
            "unsupported protocol version: {:?}",
            version
        )))
    }
}

fn parse_headers(lines: &[String]) -> Result<Headers, DomainError> {
    lines
        .iter()
        .map(|line| {
            let (name, value) = line
                .split_once(':')
                .ok_or_else(|| DomainError::InvalidHttp(format!("malformed header: {:?}", line)))?;
            if name.is_empty() || name.contains(char::is_whitespace) {
                return Err(DomainError::InvalidHttp(format!(
                    "malformed header name: {:?}",
                    name
                )));
            }
            Ok((name.to_string(), value.trim().to_string()))
        })
        .collect::<Result<Vec<_>, _>>()
        .map(|pairs| pairs.into_iter().collect())
}

/// Collects head lines up to the blank line, without their line endings.
/// Blank lines before the start line are skipped.
async fn read_head_lines<R>(reader: &mut R) -> Result<Option<Vec<String>>, DomainError>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = Vec::new();
    let mut consumed = 0usize;

    loop {
        let remaining = MAX_HEAD_LEN.saturating_sub(consumed);
        if remaining == 0 {
            return Err(head_too_large());
        }

        let mut line = Vec::new();
        let n = (&mut *reader)
            .take(remaining as u64)
            .read_until(b'\n', &mut line)
            .await
            .map_err(DomainError::relay)?;

        if n == 0 {
            return if consumed == 0 {
                Ok(None)
            } else {
                Err(DomainError::UnexpectedEof)
            };
        }
        consumed += n;

        if line.last() != Some(&b'\n') {
            return Err(if consumed >= MAX_HEAD_LEN {
                head_too_large()
            } else {
                DomainError::UnexpectedEof
            });
        }
        line.pop();
        if line.last() == Some(&b'\r') {
            line.pop();
        }

        if line.is_empty() {
            if lines.is_empty() {
                continue;
            }
            return Ok(Some(lines));
        }

        let line = String::from_utf8(line)
            .map_err(|_| DomainError::InvalidHttp("head is not valid UTF-8".to_string()))?;
        lines.push(line);
    }
}

fn head_too_large() -> DomainError {
    DomainError::InvalidHttp(format!("head exceeds {} bytes", MAX_HEAD_LEN))
}
