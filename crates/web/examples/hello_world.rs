use async_trait::async_trait;
use turnstile_http::protocol::{DispatchError, HttpRequest, ResponseEntity, StatusCode};
use turnstile_web::{Handler, Server};

/// Claims every request and greets by query parameter.
struct HelloHandler;

#[async_trait]
impl Handler for HelloHandler {
    fn can_handle(&self, _request: &HttpRequest) -> bool {
        true
    }

    async fn handle(&self, request: &HttpRequest) -> Result<ResponseEntity, DispatchError> {
        let name = request.query().get("name").unwrap_or("world");
        Ok(ResponseEntity::text(StatusCode::Ok, format!("Hello {name}!\r\n")))
    }
}

// curl -v 'http://127.0.0.1:8080/?name=rust'
#[tokio::main]
async fn main() {
    Server::builder()
        .handler(HelloHandler)
        .build()
        .run()
        .await
        .expect("server failed");
}
