use super::ProxyRelay;
use crate::http::{bounded, read_request_head, write_response_head};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tracing::{debug, info, warn};
use uniproxy_application::use_cases::ProxyAuthGuard;
use uniproxy_domain::{DomainError, RequestHead, ResponseHead};

/// Accepts client connections and runs each one on its own task.
pub struct ProxyServer {
    relay: ProxyRelay,
    guard: ProxyAuthGuard,
}

impl ProxyServer {
    pub fn new(relay: ProxyRelay, guard: ProxyAuthGuard) -> Self {
        Self { relay, guard }
    }

    pub async fn serve(self: Arc<Self>, listener: TcpListener) {
        if let Ok(addr) = listener.local_addr() {
            info!(
                bind_address = %addr,
                auth = self.guard.is_enabled(),
                "Proxy server listening"
            );
        }

        loop {
            let (stream, peer) = match listener.accept().await {
                Ok(accepted) => accepted,
                Err(e) => {
                    warn!(error = %e, "Failed to accept connection");
                    continue;
                }
            };
            if let Err(e) = stream.set_nodelay(true) {
                debug!(error = %e, "Failed to set TCP_NODELAY");
            }

            let server = self.clone();
            tokio::spawn(async move {
                server.handle_connection(stream, peer).await;
            });
        }
    }

    /// Serves requests on one client connection until a response says
    /// close, the client goes away, or something fails.
    pub async fn handle_connection<S>(&self, stream: S, peer: SocketAddr)
    where
        S: AsyncRead + AsyncWrite + Unpin + Send,
    {
        let mut client = BufReader::with_capacity(self.relay.config().buffer_size, stream);
        let mut served = 0usize;

        loop {
            match self.serve_request(&mut client).await {
                Ok(true) => served += 1,
                Ok(false) => break,
                Err(e) => {
                    debug!(peer = %peer, error = %e, "Client connection aborted");
                    break;
                }
            }
        }

        debug!(peer = %peer, served, "Client connection closed");
    }

    /// Returns whether the connection stays open for another request.
    async fn serve_request<S>(&self, client: &mut BufReader<S>) -> Result<bool, DomainError>
    where
        S: AsyncRead + AsyncWrite + Unpin + Send,
    {
        let io_timeout = self.relay.config().io_timeout();

        let next = match io_timeout {
            Some(limit) => match tokio::time::timeout(limit, read_request_head(client)).await {
                Ok(next) => next?,
                Err(_) => return Ok(false),
            },
            None => read_request_head(client).await?,
        };
        let Some(mut request) = next else {
            return Ok(false);
        };

        if let Some(challenge) = self.guard.check(&mut request) {
            info!(method = %request.method, uri = %request.uri, "Proxy authentication required");
            self.reply(client, &challenge).await?;
            return Ok(false);
        }

        if request.is_connect() {
            self.relay.connect(&request, client).await?;
            return Ok(false);
        }

        if is_absolute_uri(&request) {
            let response = self.relay.http(&request, client).await?;
            return Ok(response.connection);
        }

        info!(method = %request.method, uri = %request.uri, "Rejecting non-proxy request");
        let bad_request =
            ResponseHead::new(&request.version, 400).with_header("Content-Length", "0");
        self.reply(client, &bad_request).await?;
        Ok(false)
    }

    async fn reply<W>(&self, client: &mut W, response: &ResponseHead) -> Result<(), DomainError>
    where
        W: AsyncWrite + Unpin,
    {
        let io_timeout = self.relay.config().io_timeout();
        write_response_head(client, response, io_timeout).await?;
        bounded(io_timeout, client.flush()).await
    }
}

fn is_absolute_uri(request: &RequestHead) -> bool {
    request
        .uri
        .split_once("://")
        .is_some_and(|(scheme, _)| !scheme.is_empty() && !scheme.contains('/'))
}
