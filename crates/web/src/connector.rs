//! Connection acceptor with bounded concurrency.
//!
//! The [`Connector`] owns the listening socket and an accept loop running
//! as a background task. Backpressure comes first: a worker slot is
//! reserved before the next connection is accepted, so the loop suspends
//! instead of over-accepting while all workers are busy. Stopping cancels
//! the loop at either suspension point, closes the listener, and leaves
//! in-flight exchanges to run to completion.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::{TcpListener, TcpSocket};
use tokio::select;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use turnstile_http::codec::{RequestDecoder, ResponseEncoder};
use turnstile_http::connection::HttpExchange;
use turnstile_http::handler::Dispatcher;

use crate::pool::WorkerPool;

/// Default listening port
pub const DEFAULT_PORT: u16 = 8080;

/// Default (and minimum) accept queue depth
pub const DEFAULT_BACKLOG: u32 = 100;

/// Default number of worker slots
pub const DEFAULT_MAX_WORKERS: usize = 250;

/// Listening parameters, normalized at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectorConfig {
    port: u16,
    backlog: u32,
    max_workers: usize,
}

impl ConnectorConfig {
    /// Builds a config, silently correcting invalid values.
    ///
    /// Port 0 is the only `u16` value outside the bindable range and falls
    /// back to [`DEFAULT_PORT`]; the correction is logged at debug level
    /// since it masks operator mistakes. The backlog has an enforced floor
    /// of [`DEFAULT_BACKLOG`], and the worker limit a floor of one.
    pub fn new(port: u16, backlog: u32, max_workers: usize) -> Self {
        Self { port: check_port(port), backlog: check_backlog(backlog), max_workers: max_workers.max(1) }
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn backlog(&self) -> u32 {
        self.backlog
    }

    pub fn max_workers(&self) -> usize {
        self.max_workers
    }
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self { port: DEFAULT_PORT, backlog: DEFAULT_BACKLOG, max_workers: DEFAULT_MAX_WORKERS }
    }
}

fn check_port(port: u16) -> u16 {
    if port == 0 {
        debug!(fallback = DEFAULT_PORT, "port 0 is outside the bindable range, using default");
        return DEFAULT_PORT;
    }
    port
}

fn check_backlog(backlog: u32) -> u32 {
    if backlog < DEFAULT_BACKLOG {
        debug!(supplied = backlog, floor = DEFAULT_BACKLOG, "backlog below the floor, raising");
        return DEFAULT_BACKLOG;
    }
    backlog
}

/// Owns the listening socket and the accept loop task.
///
/// Built via [`Connector::bind`], which binds and listens immediately;
/// [`Connector::start`] only launches the loop. The connector is single
/// use: once stopped it cannot be restarted.
pub struct Connector {
    listener: Option<TcpListener>,
    dispatcher: Arc<dyn Dispatcher>,
    encoder: ResponseEncoder,
    pool: Arc<WorkerPool>,
    shutdown: CancellationToken,
    accept_loop: Option<JoinHandle<()>>,
    local_addr: SocketAddr,
}

impl Connector {
    /// Binds the listening socket with the shipped response encoder.
    ///
    /// Must run inside a tokio runtime. The socket listens on all
    /// interfaces with the configured backlog; connections queue in the
    /// kernel until [`Connector::start`] launches the accept loop.
    pub fn bind(config: ConnectorConfig, dispatcher: Arc<dyn Dispatcher>) -> io::Result<Self> {
        Self::bind_with_encoder(config, dispatcher, ResponseEncoder::new())
    }

    /// Binds with an explicit response encoder, e.g. one carrying a
    /// forward resolver.
    pub fn bind_with_encoder(
        config: ConnectorConfig,
        dispatcher: Arc<dyn Dispatcher>,
        encoder: ResponseEncoder,
    ) -> io::Result<Self> {
        let socket = TcpSocket::new_v4()?;
        socket.set_reuseaddr(true)?;
        socket.bind(SocketAddr::from(([0, 0, 0, 0], config.port())))?;
        let listener = socket.listen(config.backlog())?;
        let local_addr = listener.local_addr()?;

        Ok(Self {
            listener: Some(listener),
            dispatcher,
            encoder,
            pool: Arc::new(WorkerPool::new(config.max_workers())),
            shutdown: CancellationToken::new(),
            accept_loop: None,
            local_addr,
        })
    }

    /// Launches the accept loop as a background task and returns
    /// immediately.
    ///
    /// Single use: a second call, or a call after [`Connector::stop`],
    /// logs a warning and does nothing.
    pub fn start(&mut self) {
        let Some(listener) = self.listener.take() else {
            if self.shutdown.is_cancelled() {
                warn!("connector already stopped");
            } else {
                warn!("connector already started");
            }
            return;
        };

        info!(address = %self.local_addr, max_workers = self.pool.capacity(), "connector start listening");

        self.accept_loop = Some(tokio::spawn(accept_loop(
            listener,
            Arc::clone(&self.dispatcher),
            self.encoder.clone(),
            Arc::clone(&self.pool),
            self.shutdown.clone(),
        )));
    }

    /// Stops accepting and closes the listening socket.
    ///
    /// Idempotent. Waits for the accept loop to exit; join failures are
    /// logged, never rethrown, so shutdown always completes. In-flight
    /// exchanges are not interrupted and run to completion on their own.
    pub async fn stop(&mut self) {
        self.shutdown.cancel();

        // never started, release the socket directly
        drop(self.listener.take());

        if let Some(accept_loop) = self.accept_loop.take() {
            if let Err(e) = accept_loop.await {
                error!(cause = %e, "accept loop ended abnormally");
            }
        }

        info!(in_flight = self.pool.in_flight(), "connector stopped");
    }

    /// The bound address of the listening socket.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Number of worker slots currently held.
    ///
    /// Includes the slot the accept loop pre-reserves for the next
    /// connection, so the value can transiently exceed the number of live
    /// exchanges by one.
    pub fn busy_workers(&self) -> usize {
        self.pool.in_flight()
    }

    pub fn max_workers(&self) -> usize {
        self.pool.capacity()
    }

    pub fn is_stopped(&self) -> bool {
        self.shutdown.is_cancelled()
    }
}

/// The accept loop: reserve a slot, accept, hand off, repeat.
///
/// The listener is dropped, and the socket closed, when the loop exits.
async fn accept_loop(
    listener: TcpListener,
    dispatcher: Arc<dyn Dispatcher>,
    encoder: ResponseEncoder,
    pool: Arc<WorkerPool>,
    shutdown: CancellationToken,
) {
    loop {
        // backpressure point: no accept happens while the pool is exhausted
        let slot = select! {
            // biased ensures we observe the stop before admitting more work
            biased;
            () = shutdown.cancelled() => break,
            slot = pool.reserve() => slot,
        };

        let (stream, remote_addr) = select! {
            biased;
            () = shutdown.cancelled() => break,
            accepted = listener.accept() => match accepted {
                Ok(stream_and_addr) => stream_and_addr,
                Err(e) => {
                    warn!(cause = %e, "failed to accept");
                    continue;
                }
            },
        };

        debug!(remote_addr = %remote_addr, "accepted connection");

        let dispatcher = Arc::clone(&dispatcher);
        let encoder = encoder.clone();
        pool.submit(slot, async move {
            let (reader, writer) = stream.into_split();
            let exchange = HttpExchange::with_codec(reader, writer, RequestDecoder::new(), encoder);
            match exchange.process(dispatcher).await {
                Ok(()) => {
                    info!("finished exchange, connection shutdown");
                }
                Err(e) => {
                    error!("exchange has error, cause {}, connection shutdown", e);
                }
            }
        });
    }

    info!("accept loop exited, listener closed");
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;
    use tokio::sync::Notify;
    use tokio::time::{sleep, timeout};

    use turnstile_http::handler::make_dispatcher;
    use turnstile_http::protocol::{HttpRequest, ResponseEntity, StatusCode};

    use super::*;

    fn free_port() -> u16 {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind throwaway listener");
        let port = listener.local_addr().expect("throwaway local addr").port();
        drop(listener);
        port
    }

    fn ok_dispatcher() -> Arc<dyn Dispatcher> {
        Arc::new(make_dispatcher(|_request: HttpRequest| async move { Ok(ResponseEntity::of(StatusCode::Ok)) }))
    }

    fn gated_dispatcher(gate: Arc<Notify>) -> Arc<dyn Dispatcher> {
        Arc::new(make_dispatcher(move |_request: HttpRequest| {
            let gate = Arc::clone(&gate);
            async move {
                gate.notified().await;
                Ok(ResponseEntity::of(StatusCode::Ok))
            }
        }))
    }

    async fn wait_until(mut condition: impl FnMut() -> bool) {
        for _ in 0..200 {
            if condition() {
                return;
            }
            sleep(Duration::from_millis(10)).await;
        }
        panic!("condition not reached in time");
    }

    async fn connect_and_send(port: u16) -> TcpStream {
        let mut stream = TcpStream::connect(("127.0.0.1", port)).await.expect("connect");
        stream.write_all(b"GET / HTTP/1.1\r\nHost: localhost\r\n\r\n").await.expect("send request");
        stream
    }

    async fn assert_served_ok(stream: &mut TcpStream) {
        let mut raw = Vec::new();
        stream.read_to_end(&mut raw).await.expect("read response");
        let text = String::from_utf8_lossy(&raw);
        assert!(text.starts_with("HTTP/1.1 200 OK\r\n"), "unexpected response: {text}");
    }

    #[test]
    fn config_replaces_invalid_port_with_default() {
        assert_eq!(ConnectorConfig::new(0, 100, 250).port(), DEFAULT_PORT);
    }

    #[test]
    fn config_keeps_valid_ports() {
        assert_eq!(ConnectorConfig::new(1, 100, 250).port(), 1);
        assert_eq!(ConnectorConfig::new(65535, 100, 250).port(), 65535);
    }

    #[test]
    fn config_enforces_backlog_floor() {
        assert_eq!(ConnectorConfig::new(8080, 5, 250).backlog(), DEFAULT_BACKLOG);
        assert_eq!(ConnectorConfig::new(8080, 512, 250).backlog(), 512);
    }

    #[test]
    fn config_defaults() {
        let config = ConnectorConfig::default();

        assert_eq!(config.port(), DEFAULT_PORT);
        assert_eq!(config.backlog(), DEFAULT_BACKLOG);
        assert_eq!(config.max_workers(), DEFAULT_MAX_WORKERS);
    }

    #[tokio::test]
    async fn serves_accepted_connections() {
        let mut connector = Connector::bind(ConnectorConfig::new(free_port(), 100, 4), ok_dispatcher()).unwrap();
        connector.start();
        let port = connector.local_addr().port();

        let mut stream = connect_and_send(port).await;
        assert_served_ok(&mut stream).await;

        connector.stop().await;
    }

    #[tokio::test]
    async fn backpressure_defers_connections_beyond_capacity() {
        let gate = Arc::new(Notify::new());
        let config = ConnectorConfig::new(free_port(), 100, 2);
        let mut connector = Connector::bind(config, gated_dispatcher(Arc::clone(&gate))).unwrap();
        connector.start();
        let port = connector.local_addr().port();

        let mut first = connect_and_send(port).await;
        let mut second = connect_and_send(port).await;
        wait_until(|| connector.busy_workers() == 2).await;

        // with both workers held, the third connection queues in the kernel
        // and gets no service
        let mut third = connect_and_send(port).await;
        sleep(Duration::from_millis(100)).await;
        assert_eq!(connector.busy_workers(), 2);

        let mut scratch = [0u8; 16];
        assert!(timeout(Duration::from_millis(100), third.read(&mut scratch)).await.is_err());

        // releasing the in-flight exchanges frees slots for the deferred one
        gate.notify_waiters();
        assert_served_ok(&mut first).await;
        assert_served_ok(&mut second).await;

        gate.notify_one();
        assert_served_ok(&mut third).await;

        connector.stop().await;
    }

    #[tokio::test]
    async fn stop_refuses_new_connections_and_keeps_inflight_running() {
        let gate = Arc::new(Notify::new());
        let mut connector =
            Connector::bind(ConnectorConfig::new(free_port(), 100, 4), gated_dispatcher(Arc::clone(&gate))).unwrap();
        connector.start();
        let port = connector.local_addr().port();

        let mut inflight = connect_and_send(port).await;
        // two held slots: the gated exchange plus the loop's pre-reserved one
        wait_until(|| connector.busy_workers() == 2).await;

        connector.stop().await;
        assert!(connector.is_stopped());

        // listener is closed
        assert!(TcpStream::connect(("127.0.0.1", port)).await.is_err());

        // the in-flight exchange survived the stop and completes
        assert_eq!(connector.busy_workers(), 1);
        gate.notify_one();
        assert_served_ok(&mut inflight).await;
        wait_until(|| connector.busy_workers() == 0).await;
    }

    #[tokio::test]
    async fn stop_abandons_connections_waiting_in_the_backlog() {
        let gate = Arc::new(Notify::new());
        let entered = Arc::new(AtomicUsize::new(0));
        let dispatcher: Arc<dyn Dispatcher> = {
            let gate = Arc::clone(&gate);
            let entered = Arc::clone(&entered);
            Arc::new(make_dispatcher(move |_request: HttpRequest| {
                entered.fetch_add(1, Ordering::SeqCst);
                let gate = Arc::clone(&gate);
                async move {
                    gate.notified().await;
                    Ok(ResponseEntity::of(StatusCode::Ok))
                }
            }))
        };
        let mut connector = Connector::bind(ConnectorConfig::new(free_port(), 100, 1), dispatcher).unwrap();
        connector.start();
        let port = connector.local_addr().port();

        let mut served = connect_and_send(port).await;
        wait_until(|| entered.load(Ordering::SeqCst) == 1).await;

        // the only worker is held, so this connection waits in the accept queue
        let mut deferred = connect_and_send(port).await;

        connector.stop().await;

        // the queued connection went down with the listener, never admitted
        assert_eq!(connector.busy_workers(), 1);
        assert_eq!(entered.load(Ordering::SeqCst), 1);

        let mut raw = Vec::new();
        let outcome = deferred.read_to_end(&mut raw).await;
        assert!(outcome.is_err() || raw.is_empty(), "deferred connection must not be served");

        // the in-flight exchange survived and completes
        gate.notify_one();
        assert_served_ok(&mut served).await;
    }

    #[tokio::test]
    async fn stop_is_idempotent() {
        let mut connector = Connector::bind(ConnectorConfig::new(free_port(), 100, 2), ok_dispatcher()).unwrap();
        connector.start();

        connector.stop().await;
        connector.stop().await;

        assert!(connector.is_stopped());
    }

    #[tokio::test]
    async fn stop_without_start_releases_the_socket() {
        let port = free_port();
        let mut connector = Connector::bind(ConnectorConfig::new(port, 100, 2), ok_dispatcher()).unwrap();

        connector.stop().await;

        assert!(TcpStream::connect(("127.0.0.1", port)).await.is_err());
    }

    #[tokio::test]
    async fn start_twice_warns_and_keeps_the_first_loop() {
        let mut connector = Connector::bind(ConnectorConfig::new(free_port(), 100, 2), ok_dispatcher()).unwrap();
        connector.start();
        connector.start();
        let port = connector.local_addr().port();

        let mut stream = connect_and_send(port).await;
        assert_served_ok(&mut stream).await;

        connector.stop().await;
    }

    #[tokio::test]
    async fn start_after_stop_does_not_relaunch_the_loop() {
        let port = free_port();
        let mut connector = Connector::bind(ConnectorConfig::new(port, 100, 2), ok_dispatcher()).unwrap();
        connector.start();
        connector.stop().await;

        connector.start();

        assert!(connector.is_stopped());
        assert!(TcpStream::connect(("127.0.0.1", port)).await.is_err());
    }
}
