use super::ProxyRelay;
use crate::http::{bounded, write_response_head};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};
use uniproxy_domain::{parse_target, DomainError, RequestHead, ResponseHead};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TunnelEnd {
    ClientClosed,
    UpstreamClosed,
    IdleTimeout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TunnelSummary {
    /// Bytes carried from the client to the upstream.
    pub sent: u64,
    /// Bytes carried from the upstream to the client.
    pub received: u64,
    pub end: TunnelEnd,
}

enum Event {
    Client(std::io::Result<usize>),
    Upstream(std::io::Result<usize>),
    Idle,
}

impl ProxyRelay {
    /// Opens a `CONNECT` tunnel and relays bytes until either side closes.
    ///
    /// Bytes the client pipelined behind the `CONNECT` head are forwarded
    /// before relaying starts.
    pub async fn connect<S>(
        &self,
        request: &RequestHead,
        client: &mut BufReader<S>,
    ) -> Result<TunnelSummary, DomainError>
    where
        S: AsyncRead + AsyncWrite + Unpin + Send,
    {
        let target = parse_target(&request.uri)?;
        let idle_timeout = self.config.tunnel_idle_timeout();
        let mut upstream = self.sockets.acquire(&target.host, target.port).await?;

        let established = ResponseHead::new(&request.version, 200);
        write_response_head(client, &established, idle_timeout).await?;
        bounded(idle_timeout, client.flush()).await?;

        info!(target = %target, "Tunnel established");

        let pending = client.buffer().to_vec();
        if !pending.is_empty() {
            client.consume(pending.len());
            bounded(idle_timeout, upstream.write_all(&pending)).await?;
        }

        let result = relay_tunnel(
            client,
            &mut upstream,
            self.config.buffer_size,
            idle_timeout,
        )
        .await;

        match &result {
            Ok(summary) => info!(
                target = %target,
                sent = summary.sent + pending.len() as u64,
                received = summary.received,
                end = ?summary.end,
                "Tunnel closed"
            ),
            Err(e) => warn!(target = %target, error = %e, "Tunnel aborted"),
        }
        result
    }
}

/// Copies bytes both ways between `client` and `upstream`, unmodified and
/// in order, until one side reaches EOF or fails.
///
/// There is no half-close: EOF on either leg ends the whole tunnel. With an
/// idle timeout, a tunnel with no traffic in either direction for that long
/// is closed, and a write stalled that long is an error.
pub async fn relay_tunnel<A, B>(
    client: &mut A,
    upstream: &mut B,
    buffer_size: usize,
    idle_timeout: Option<Duration>,
) -> Result<TunnelSummary, DomainError>
where
    A: AsyncRead + AsyncWrite + Unpin,
    B: AsyncRead + AsyncWrite + Unpin,
{
    let mut client_buf = vec![0u8; buffer_size];
    let mut upstream_buf = vec![0u8; buffer_size];
    let mut sent = 0u64;
    let mut received = 0u64;

    let end = loop {
        let event = tokio::select! {
            read = client.read(&mut client_buf) => Event::Client(read),
            read = upstream.read(&mut upstream_buf) => Event::Upstream(read),
            _ = idle(idle_timeout) => Event::Idle,
        };

        match event {
            Event::Client(read) => {
                let n = read.map_err(DomainError::relay)?;
                if n == 0 {
                    break TunnelEnd::ClientClosed;
                }
                bounded(idle_timeout, upstream.write_all(&client_buf[..n])).await?;
                bounded(idle_timeout, upstream.flush()).await?;
                sent += n as u64;
            }
            Event::Upstream(read) => {
                let n = read.map_err(DomainError::relay)?;
                if n == 0 {
                    break TunnelEnd::UpstreamClosed;
                }
                bounded(idle_timeout, client.write_all(&upstream_buf[..n])).await?;
                bounded(idle_timeout, client.flush()).await?;
                received += n as u64;
            }
            Event::Idle => {
                debug!("Tunnel idle timeout");
                break TunnelEnd::IdleTimeout;
            }
        }
    };

    Ok(TunnelSummary {
        sent,
        received,
        end,
    })
}

async fn idle(limit: Option<Duration>) {
    match limit {
        Some(limit) => tokio::time::sleep(limit).await,
        None => std::future::pending().await,
    }
}
