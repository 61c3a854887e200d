//! HTTP/1.x wire I/O for the proxy: head parsing and serialization, body
//! framing and raw body streaming.

mod body;
mod codec;

pub use body::{BodyChunks, BodyFraming};
pub use codec::{
    read_request_head, read_response_head, write_request_head, write_response_head,
    MAX_HEAD_LEN,
};

use std::future::Future;
use std::io;
use std::time::Duration;
use uniproxy_domain::DomainError;

/// Runs one read or write, failing with `RelayTimeout` once `limit` passes.
pub(crate) async fn bounded<F, T>(limit: Option<Duration>, op: F) -> Result<T, DomainError>
where
    F: Future<Output = io::Result<T>>,
{
    let result = match limit {
        Some(limit) => tokio::time::timeout(limit, op)
            .await
            .map_err(|_| DomainError::RelayTimeout)?,
        None => op.await,
    };
    result.map_err(DomainError::relay)
}
