// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! TCP listener and accept loop.
//!
//! The listener accepts connections, assigns monotonically increasing
//! session identifiers, and spawns one task per session up to the configured
//! cap. A shutdown notification stops the accept loop; running sessions
//! drain on their own when their peers disconnect or time out.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use trellis_space::Server;

use crate::config::NetConfig;
use crate::error::NetResult;
use crate::session::Session;

// =============================================================================
// NetServer
// =============================================================================

/// The bound TCP front end of a [`Server`].
#[derive(Debug)]
pub struct NetServer {
    listener: TcpListener,
    config: NetConfig,
    server: Arc<Server>,
}

impl NetServer {
    /// Validates the configuration and binds the listener.
    pub async fn bind(config: NetConfig, server: Arc<Server>) -> NetResult<Self> {
        config.validate()?;
        let listener = TcpListener::bind(&config.bind_address).await?;
        Ok(Self {
            listener,
            config,
            server,
        })
    }

    /// The address the listener is bound to. With a port of 0 in the
    /// configuration this is where the kernel-assigned port shows up.
    pub fn local_addr(&self) -> NetResult<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Runs the accept loop until a shutdown notification arrives.
    pub async fn serve(self, mut shutdown: broadcast::Receiver<()>) -> NetResult<()> {
        info!(address = %self.local_addr()?, "service layer listening");
        let active = Arc::new(AtomicUsize::new(0));
        let mut next_session_id: u64 = 1;

        loop {
            tokio::select! {
                _ = shutdown.recv() => {
                    info!("shutdown requested, stopping accept loop");
                    return Ok(());
                }
                accepted = self.listener.accept() => {
                    let (stream, peer) = match accepted {
                        Ok(pair) => pair,
                        Err(error) => {
                            warn!(%error, "accept failed");
                            continue;
                        }
                    };

                    if active.load(Ordering::SeqCst) >= self.config.max_sessions {
                        warn!(%peer, "session limit reached, dropping connection");
                        drop(stream);
                        continue;
                    }

                    let session_id = next_session_id;
                    next_session_id += 1;
                    let session = Session::new(session_id, self.server.clone(), &self.config);
                    let counter = active.clone();
                    counter.fetch_add(1, Ordering::SeqCst);
                    debug!(session = session_id, %peer, "session accepted");

                    tokio::spawn(async move {
                        match session.run(stream).await {
                            Ok(()) => debug!(session = session_id, "session ended"),
                            Err(error) if error.is_disconnect() => {
                                debug!(session = session_id, %error, "session disconnected")
                            }
                            Err(error) => {
                                warn!(session = session_id, %error, "session failed")
                            }
                        }
                        counter.fetch_sub(1, Ordering::SeqCst);
                    });
                }
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncWriteExt;
    use tokio::net::TcpStream;

    use crate::codec::FrameCodec;
    use crate::message::{Request, Response};

    async fn bound_server() -> (SocketAddr, broadcast::Sender<()>, tokio::task::JoinHandle<()>) {
        let config = NetConfig::with_bind_address("127.0.0.1:0");
        let net = NetServer::bind(config, Arc::new(Server::new()))
            .await
            .unwrap();
        let address = net.local_addr().unwrap();
        let (tx, rx) = broadcast::channel(1);
        let handle = tokio::spawn(async move {
            net.serve(rx).await.unwrap();
        });
        (address, tx, handle)
    }

    #[tokio::test]
    async fn test_ping_over_tcp() {
        let (address, shutdown, handle) = bound_server().await;
        let codec = FrameCodec::new(1024 * 1024);

        let mut stream = TcpStream::connect(address).await.unwrap();
        let body = codec.encode_request(&Request::Ping).unwrap();
        codec.write_frame(&mut stream, &body).await.unwrap();
        let reply = codec.read_frame(&mut stream).await.unwrap().unwrap();
        assert_eq!(codec.decode_response(&reply).unwrap(), Response::Pong);

        stream.shutdown().await.unwrap();
        shutdown.send(()).unwrap();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_shutdown_stops_accept_loop() {
        let (_address, shutdown, handle) = bound_server().await;
        shutdown.send(()).unwrap();
        // serve() returns once the notification is observed.
        tokio::time::timeout(std::time::Duration::from_secs(5), handle)
            .await
            .expect("accept loop should stop")
            .unwrap();
    }
}
