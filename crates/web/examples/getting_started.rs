use std::sync::Arc;

use async_trait::async_trait;
use turnstile_http::protocol::{DispatchError, HttpRequest, Method, ResponseEntity, StatusCode};
use turnstile_web::{Handler, Server};

const HOME_PAGE: &str = "/index.html";
const HOME_HTML: &str = "<html><body><h1>turnstile</h1></body></html>";

struct HomeHandler;

#[async_trait]
impl Handler for HomeHandler {
    fn can_handle(&self, request: &HttpRequest) -> bool {
        request.path() == "/" || request.path() == HOME_PAGE
    }

    async fn handle(&self, request: &HttpRequest) -> Result<ResponseEntity, DispatchError> {
        if request.method() != Method::Get {
            return Err(DispatchError::unsupported_method(request.method()));
        }
        Ok(ResponseEntity::forward(StatusCode::Ok, HOME_PAGE))
    }
}

fn resolve_page(path: &str) -> Option<String> {
    (path == HOME_PAGE).then(|| HOME_HTML.to_string())
}

// curl -v http://127.0.0.1:8080/
// curl -v http://127.0.0.1:8080/index.html
#[tokio::main]
async fn main() {
    Server::builder()
        .port(8080)
        .handler(HomeHandler)
        .forward_resolver(Arc::new(resolve_page))
        .build()
        .run()
        .await
        .expect("server failed");
}
