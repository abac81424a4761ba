//! Sequential TCP accept-serve loop.
//!
//! # Invariants
//! - One connection is handled completely (read once, route, write, close)
//!   before the next one is accepted; the store is never shared.
//! - A failure on one connection is logged and never ends the loop.

use crate::router::Router;
use itemsvc_core::ItemRepository;
use log::{debug, error, info, warn};
use std::future::Future;
use std::io;
use std::net::SocketAddr;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// What happened to a single accepted connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionOutcome {
    /// A response was written.
    Served,
    /// The client closed before sending anything.
    ClientClosed,
    /// Accept, read or write failed; the connection was dropped.
    Failed,
}

pub struct Server<R: ItemRepository> {
    listener: TcpListener,
    router: Router<R>,
    read_buffer_bytes: usize,
}

impl<R: ItemRepository> Server<R> {
    /// Binds the listening socket.
    pub async fn bind(
        addr: SocketAddr,
        router: Router<R>,
        read_buffer_bytes: usize,
    ) -> io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        info!(
            "event=listen module=server status=ok addr={}",
            listener.local_addr()?
        );
        Ok(Self {
            listener,
            router,
            read_buffer_bytes: read_buffer_bytes.max(1),
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub fn router(&self) -> &Router<R> {
        &self.router
    }

    /// Accepts and fully handles one connection.
    pub async fn serve_next(&self) -> ConnectionOutcome {
        let (mut stream, peer) = match self.listener.accept().await {
            Ok(accepted) => accepted,
            Err(err) => {
                error!("event=accept module=server status=error error={err}");
                return ConnectionOutcome::Failed;
            }
        };

        let mut buffer = vec![0_u8; self.read_buffer_bytes];
        let read = match stream.read(&mut buffer).await {
            Ok(0) => {
                info!("event=connection module=server status=closed peer={peer} reason=eof");
                return ConnectionOutcome::ClientClosed;
            }
            Ok(read) => read,
            Err(err) => {
                warn!("event=connection module=server status=error peer={peer} stage=read error={err}");
                return ConnectionOutcome::Failed;
            }
        };

        let response = self.router.handle(&buffer[..read]);

        if let Err(err) = stream.write_all(&response).await {
            warn!("event=connection module=server status=error peer={peer} stage=write error={err}");
            return ConnectionOutcome::Failed;
        }
        if let Err(err) = stream.shutdown().await {
            debug!("event=connection module=server status=ok peer={peer} stage=shutdown error={err}");
        }

        ConnectionOutcome::Served
    }

    /// Serves connections one at a time until `shutdown` resolves.
    ///
    /// A connection still in flight when `shutdown` fires is dropped.
    pub async fn run_until(&self, shutdown: impl Future<Output = ()>) {
        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                () = &mut shutdown => {
                    info!("event=shutdown module=server status=ok");
                    break;
                }
                _ = self.serve_next() => {}
            }
        }
    }
}
