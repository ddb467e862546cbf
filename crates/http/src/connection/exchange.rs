use std::sync::Arc;

use futures::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::codec::{Decoder, Encoder, FramedRead, FramedWrite};
use tracing::{error, info};

use crate::codec::{RequestDecoder, ResponseEncoder};
use crate::handler::Dispatcher;
use crate::protocol::{HttpError, HttpRequest, ParseError, ResponseEntity, SendError, StatusCode};

/// A single HTTP exchange over one connection
///
/// `HttpExchange` serves exactly one request: decode, dispatch, respond.
/// Connections are not reused; the exchange consumes itself and the peer
/// sees EOF once it is dropped.
///
/// # Type Parameters
///
/// * `R` / `W`: the async readable and writable halves of the connection
/// * `D` / `E`: the parser and writer collaborators, defaulting to the
///   codecs shipped in [`crate::codec`]
pub struct HttpExchange<R, W, D = RequestDecoder, E = ResponseEncoder> {
    framed_read: FramedRead<R, D>,
    framed_write: FramedWrite<W, E>,
}

impl<R, W> HttpExchange<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    /// Creates an exchange using the shipped codecs.
    pub fn new(reader: R, writer: W) -> Self {
        Self::with_codec(reader, writer, RequestDecoder::new(), ResponseEncoder::new())
    }
}

impl<R, W, D, E> HttpExchange<R, W, D, E>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
    D: Decoder<Item = HttpRequest, Error = ParseError> + Unpin,
    E: Encoder<ResponseEntity, Error = SendError> + Unpin,
{
    /// Creates an exchange with explicit parser and writer collaborators.
    pub fn with_codec(reader: R, writer: W, decoder: D, encoder: E) -> Self {
        Self {
            framed_read: FramedRead::with_capacity(reader, decoder, 8 * 1024),
            framed_write: FramedWrite::new(writer, encoder),
        }
    }

    /// Serves one request through `dispatcher`.
    ///
    /// Failures stay inside this exchange: a dispatch error answers 500 and
    /// resolves the exchange cleanly, a parse error answers 500 and is
    /// returned, a peer closing before sending a request is a clean end.
    pub async fn process<H>(mut self, dispatcher: Arc<H>) -> Result<(), HttpError>
    where
        H: Dispatcher + ?Sized,
    {
        match self.framed_read.next().await {
            Some(Ok(request)) => self.do_process(request, dispatcher).await,

            Some(Err(e)) => {
                error!("can't read request, cause {}", e);
                self.send_entity(ResponseEntity::of(StatusCode::InternalServerError)).await?;
                Err(e.into())
            }

            None => {
                info!("peer closed before sending a request");
                Ok(())
            }
        }
    }

    async fn do_process<H>(&mut self, request: HttpRequest, dispatcher: Arc<H>) -> Result<(), HttpError>
    where
        H: Dispatcher + ?Sized,
    {
        match dispatcher.dispatch(request).await {
            Ok(entity) => self.send_entity(entity).await,

            Err(e) => {
                error!("dispatch request error, cause: {}", e);
                self.send_entity(ResponseEntity::of(StatusCode::InternalServerError)).await
            }
        }
    }

    async fn send_entity(&mut self, entity: ResponseEntity) -> Result<(), HttpError> {
        self.framed_write.send(entity).await?;
        Ok(())
    }
}
