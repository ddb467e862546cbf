use std::future::Future;

use async_trait::async_trait;

use crate::protocol::{DispatchError, HttpRequest, ResponseEntity};

#[async_trait]
pub trait Dispatcher: Send + Sync {
    async fn dispatch(&self, request: HttpRequest) -> Result<ResponseEntity, DispatchError>;
}

#[derive(Debug)]
pub struct DispatcherFn<F> {
    f: F,
}

#[async_trait]
impl<F, Fut> Dispatcher for DispatcherFn<F>
where
    F: Fn(HttpRequest) -> Fut + Send + Sync,
    Fut: Future<Output = Result<ResponseEntity, DispatchError>> + Send,
{
    async fn dispatch(&self, request: HttpRequest) -> Result<ResponseEntity, DispatchError> {
        (self.f)(request).await
    }
}

pub fn make_dispatcher<F, Fut>(f: F) -> DispatcherFn<F>
where
    F: Fn(HttpRequest) -> Fut + Send + Sync,
    Fut: Future<Output = Result<ResponseEntity, DispatchError>> + Send,
{
    DispatcherFn { f }
}
