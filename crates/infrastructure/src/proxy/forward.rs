use super::ProxyRelay;
use crate::http::{
    bounded, read_response_head, write_request_head, write_response_head, BodyChunks,
    BodyFraming,
};
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufRead, AsyncWrite, AsyncWriteExt, BufStream};
use tracing::{debug, info};
use uniproxy_domain::{parse_target, DomainError, RequestHead, ResponseHead};

impl ProxyRelay {
    /// Forwards one absolute-URI request and streams the response back.
    ///
    /// `Proxy-*` headers are dropped before the request goes upstream. Bodies
    /// pass through raw in both directions. Interim `1xx` heads are relayed
    /// as they arrive. The returned head is the final one the client
    /// received, with `connection` telling whether the client connection may
    /// serve another request.
    pub async fn http<C>(
        &self,
        request: &RequestHead,
        client: &mut C,
    ) -> Result<ResponseHead, DomainError>
    where
        C: AsyncBufRead + AsyncWrite + Unpin + Send,
    {
        let started = Instant::now();
        let io_timeout = self.config.io_timeout();

        let target = parse_target(&request.uri)?;
        let request_framing = BodyFraming::for_request(request)?;

        let mut upstream_request = request.clone();
        upstream_request.uri = target.path.clone();
        upstream_request.headers.strip_proxy_headers();

        if self.config.verbose {
            debug!(request = ?request, "Client request head");
        }

        let upstream = self.sockets.acquire(&target.host, target.port).await?;
        let mut upstream = BufStream::with_capacity(
            self.config.buffer_size,
            self.config.buffer_size,
            upstream,
        );

        write_request_head(&mut upstream, &upstream_request, io_timeout).await?;
        copy_body(client, &mut upstream, request_framing, io_timeout).await?;
        bounded(io_timeout, upstream.flush()).await?;

        let mut response = read_response_head(&mut upstream, io_timeout).await?;
        if self.config.verbose {
            debug!(response = ?response, "Upstream response head");
        }
        while is_interim(response.code) {
            write_response_head(client, &response, io_timeout).await?;
            bounded(io_timeout, client.flush()).await?;
            response = read_response_head(&mut upstream, io_timeout).await?;
            if self.config.verbose {
                debug!(response = ?response, "Upstream response head");
            }
        }

        let response_framing = BodyFraming::for_response(&response, request.is_head())?;
        write_response_head(client, &response, io_timeout).await?;
        copy_body(&mut upstream, client, response_framing, io_timeout).await?;
        bounded(io_timeout, client.flush()).await?;

        response.connection = request.wants_keep_alive()
            && !response.closes_connection()
            && response_framing != BodyFraming::UntilClose;

        info!(
            path = %request.uri.split('?').next().unwrap_or_default(),
            status = response.code,
            elapsed_ms = started.elapsed().as_millis() as u64,
            connection = if response.connection { "keep" } else { "close" },
            "Request forwarded"
        );

        Ok(response)
    }
}

/// `1xx` heads other than `101` precede the final response on the same
/// connection.
fn is_interim(code: u16) -> bool {
    (100..200).contains(&code) && code != 101
}

async fn copy_body<R, W>(
    reader: &mut R,
    writer: &mut W,
    framing: BodyFraming,
    io_timeout: Option<Duration>,
) -> Result<u64, DomainError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut chunks = BodyChunks::new(reader, framing, io_timeout);
    let mut copied = 0u64;
    while let Some(chunk) = chunks.next_chunk().await? {
        bounded(io_timeout, writer.write_all(&chunk)).await?;
        copied += chunk.len() as u64;
    }
    Ok(copied)
}
