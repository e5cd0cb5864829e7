//! StubServer struct and main run loop.
//!
//! One spawned task per connection; every request runs the stub pipeline
//! against a shared read-only content store. The admin shutdown endpoint
//! flips a watch channel instead of killing the process, so the accept
//! loop stops and in-flight connections drain before exit.

use crate::config::Config;
use crate::handler::{handle_stub_request, StubRequest};
use crate::response::ResponseBuilder;
use crate::store::{ContentStore, DiskStore};
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use hyper_util::server::graceful::GracefulShutdown;
use std::collections::HashMap;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{error, info, warn};

/// Administrative path that terminates the server.
pub const SHUTDOWN_PATH: &str = "/gostub/shutdown";

/// The stub server: configuration plus the content store it serves from.
pub struct StubServer {
    config: Arc<Config>,
    store: Arc<dyn ContentStore>,
}

impl StubServer {
    pub fn new(config: Config) -> Self {
        let store = Arc::new(DiskStore::new(config.root_dir.clone()));
        Self {
            config: Arc::new(config),
            store,
        }
    }

    /// Build a server over a custom content store.
    pub fn with_store(config: Config, store: Arc<dyn ContentStore>) -> Self {
        Self {
            config: Arc::new(config),
            store,
        }
    }

    /// Run the server, accepting connections until shutdown is requested.
    pub async fn run(self) -> Result<(), anyhow::Error> {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.port));
        let listener = TcpListener::bind(addr).await?;

        info!("Listening on http://{}", addr);
        info!(
            "Serving stubs from {} (route root {})",
            self.config.root_dir.display(),
            self.config.route_root()
        );

        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let shutdown_tx = Arc::new(shutdown_tx);
        let graceful = GracefulShutdown::new();
        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        let server = Arc::new(self);

        loop {
            tokio::select! {
                _ = shutdown_rx.changed() => {
                    info!("Shutdown requested via {}", SHUTDOWN_PATH);
                    break;
                }
                _ = &mut ctrl_c => {
                    info!("SIGINT received");
                    break;
                }
                accepted = listener.accept() => {
                    let (stream, remote_addr) = match accepted {
                        Ok(accepted) => accepted,
                        Err(err) => {
                            error!("Accept failed: {err}");
                            continue;
                        }
                    };
                    let io = TokioIo::new(stream);
                    let server = Arc::clone(&server);
                    let shutdown_tx = Arc::clone(&shutdown_tx);

                    let service = service_fn(move |req| {
                        let server = Arc::clone(&server);
                        let shutdown_tx = Arc::clone(&shutdown_tx);
                        async move { server.handle_request_internal(req, &shutdown_tx).await }
                    });

                    let conn = http1::Builder::new().serve_connection(io, service);
                    let conn = graceful.watch(conn);
                    tokio::spawn(async move {
                        if let Err(err) = conn.await {
                            error!("Error serving connection from {remote_addr}: {err}");
                        }
                    });
                }
            }
        }

        info!("Draining in-flight connections");
        graceful.shutdown().await;
        info!("Stopped dirstub server");
        Ok(())
    }

    async fn handle_request_internal(
        &self,
        req: Request<Incoming>,
        shutdown: &watch::Sender<bool>,
    ) -> Result<Response<Full<Bytes>>, Infallible> {
        if req.uri().path() == SHUTDOWN_PATH {
            let _ = shutdown.send(true);
            return Ok(ResponseBuilder::new(StatusCode::OK)
                .body("Stopping dirstub server.")
                .build());
        }

        let request = into_stub_request(req).await;
        Ok(handle_stub_request(self.store.as_ref(), &self.config, &request))
    }
}

/// Detach a hyper request from the transport for the pipeline.
async fn into_stub_request(req: Request<Incoming>) -> StubRequest {
    let method = req.method().to_string();
    let uri = req.uri().clone();
    let headers: HashMap<String, String> = req
        .headers()
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_ascii_lowercase(),
                value.to_str().unwrap_or("").to_string(),
            )
        })
        .collect();

    let body = match req.into_body().collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(err) => {
            warn!("Failed to read request body: {err}");
            Bytes::new()
        }
    };

    StubRequest {
        method,
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        headers,
        body,
    }
}
