//! Server lifecycle: compose, start, wait, stop.

use std::future::Future;
use std::sync::Arc;

use thiserror::Error;
use tokio::signal;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

use turnstile_http::codec::{ForwardResolver, ResponseEncoder};
use turnstile_http::handler::Dispatcher;

use crate::connector::{Connector, ConnectorConfig, DEFAULT_BACKLOG, DEFAULT_MAX_WORKERS, DEFAULT_PORT};
use crate::router::{Handler, Router, RouterBuilder, RouterDispatcher};

/// Builder composing a [`Server`] out of listening parameters, handlers
/// and an optional forward resolver.
pub struct ServerBuilder {
    port: u16,
    backlog: u32,
    max_workers: usize,
    router_builder: RouterBuilder,
    forward_resolver: Option<ForwardResolver>,
}

impl ServerBuilder {
    fn new() -> Self {
        Self {
            port: DEFAULT_PORT,
            backlog: DEFAULT_BACKLOG,
            max_workers: DEFAULT_MAX_WORKERS,
            router_builder: Router::builder(),
            forward_resolver: None,
        }
    }

    /// Listening port; invalid values fall back to the default at build.
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Accept queue depth; values below the floor are raised at build.
    pub fn backlog(mut self, backlog: u32) -> Self {
        self.backlog = backlog;
        self
    }

    /// Maximum number of concurrently served connections.
    pub fn max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers;
        self
    }

    /// Registers a handler; registration order is resolution order.
    pub fn handler(mut self, handler: impl Handler + 'static) -> Self {
        self.router_builder = self.router_builder.handler(handler);
        self
    }

    /// Resolver turning forward targets into response content.
    pub fn forward_resolver(mut self, resolver: ForwardResolver) -> Self {
        self.forward_resolver = Some(resolver);
        self
    }

    /// Builds the server; a server without handlers answers 404 to
    /// everything.
    pub fn build(self) -> Server {
        Server {
            config: ConnectorConfig::new(self.port, self.backlog, self.max_workers),
            router: self.router_builder.build(),
            forward_resolver: self.forward_resolver,
        }
    }
}

pub struct Server {
    config: ConnectorConfig,
    router: Router,
    forward_resolver: Option<ForwardResolver>,
}

#[derive(Error, Debug)]
pub enum ServeError {
    #[error("bind server error: {source}")]
    Bind {
        #[from]
        source: std::io::Error,
    },
}

impl Server {
    pub fn builder() -> ServerBuilder {
        ServerBuilder::new()
    }

    /// Runs until ctrl-c, then stops the connector.
    ///
    /// Installs the global fmt subscriber; embedders that manage their own
    /// logging should use [`Server::run_until`] directly.
    pub async fn run(self) -> Result<(), ServeError> {
        let subscriber = FmtSubscriber::builder().with_max_level(Level::INFO).finish();
        tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

        self.run_until(shutdown_signal()).await
    }

    /// Starts the connector, waits for `shutdown`, then stops.
    ///
    /// In-flight exchanges run to completion after the listener closes.
    pub async fn run_until(self, shutdown: impl Future<Output = ()>) -> Result<(), ServeError> {
        let dispatcher: Arc<dyn Dispatcher> = Arc::new(RouterDispatcher::new(self.router));
        let encoder = match self.forward_resolver {
            Some(resolver) => ResponseEncoder::with_resolver(resolver),
            None => ResponseEncoder::new(),
        };

        let mut connector = match Connector::bind_with_encoder(self.config, dispatcher, encoder) {
            Ok(connector) => connector,
            Err(e) => {
                error!(cause = %e, "bind server error");
                return Err(e.into());
            }
        };

        connector.start();
        info!(address = %connector.local_addr(), "server started");

        shutdown.await;

        info!("shutdown triggered, stopping server");
        connector.stop().await;
        Ok(())
    }
}

/// Resolves when ctrl-c arrives. A failure to install the signal handler
/// is logged and resolves immediately, shutting the server down rather
/// than leaving it unstoppable.
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!(cause = %e, "failed to listen for shutdown signal");
    }
}
