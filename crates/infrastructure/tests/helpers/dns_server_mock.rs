#![allow(dead_code)]
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, UdpSocket};
use tokio::sync::oneshot;
use uniproxy_domain::{DnsMessage, ResourceRecord};

/// Turns raw query bytes into raw reply bytes.
pub type Responder = Arc<dyn Fn(&[u8]) -> Vec<u8> + Send + Sync>;

/// Replies to each query with `answers`, echoing id and question.
pub fn answering(answers: Vec<ResourceRecord>) -> Responder {
    Arc::new(move |query: &[u8]| {
        let mut reply = DnsMessage::decode(query).unwrap();
        reply.flags.is_response = true;
        reply.flags.recursion_available = true;
        reply.answers = answers.clone();
        reply.encode().unwrap()
    })
}

/// Like `answering`, with the TC bit set.
pub fn answering_truncated(answers: Vec<ResourceRecord>) -> Responder {
    let inner = answering(answers);
    Arc::new(move |query: &[u8]| {
        let mut reply = inner(query);
        reply[2] |= 0b0000_0010;
        reply
    })
}

pub fn fixed(bytes: Vec<u8>) -> Responder {
    Arc::new(move |_: &[u8]| bytes.clone())
}

pub struct MockDnsServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockDnsServer {
    pub async fn udp(responder: Responder) -> Self {
        let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let addr = socket.local_addr().unwrap();
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            let mut buf = vec![0u8; 4096];
            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    result = socket.recv_from(&mut buf) => {
                        if let Ok((len, peer)) = result {
                            let reply = responder(&buf[..len]);
                            let _ = socket.send_to(&reply, peer).await;
                        }
                    }
                }
            }
        });

        Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Length-prefixed TCP server answering every query on each connection.
    pub async fn tcp(responder: Responder) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    accepted = listener.accept() => {
                        let Ok((mut stream, _)) = accepted else { continue };
                        let responder = responder.clone();
                        tokio::spawn(async move {
                            loop {
                                let mut len_buf = [0u8; 2];
                                if stream.read_exact(&mut len_buf).await.is_err() {
                                    break;
                                }
                                let mut query = vec![0u8; u16::from_be_bytes(len_buf) as usize];
                                if stream.read_exact(&mut query).await.is_err() {
                                    break;
                                }
                                let reply = responder(&query);
                                let mut framed = (reply.len() as u16).to_be_bytes().to_vec();
                                framed.extend_from_slice(&reply);
                                if stream.write_all(&framed).await.is_err() {
                                    break;
                                }
                            }
                        });
                    }
                }
            }
        });

        Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Reads one query per connection and closes it without answering.
    pub async fn tcp_hanging_up() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    accepted = listener.accept() => {
                        if let Ok((mut stream, _)) = accepted {
                            let mut len_buf = [0u8; 2];
                            if stream.read_exact(&mut len_buf).await.is_ok() {
                                let mut query = vec![0u8; u16::from_be_bytes(len_buf) as usize];
                                let _ = stream.read_exact(&mut query).await;
                            }
                            drop(stream);
                        }
                    }
                }
            }
        });

        Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }
}

impl Drop for MockDnsServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
