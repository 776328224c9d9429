//! Per-request logging.

use std::net::SocketAddr;
use std::time::Instant;

use axum::{
    extract::{ConnectInfo, Request},
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Log the start and end of every request under a fresh request id.
///
/// The finish line is written after the inner service returns, whatever it
/// returned.
pub async fn request_logger(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let req_id = Uuid::new_v4();
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let remote = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_default();

    tracing::info!(req_id = %req_id, method = %method, path = %path, remote = %remote, "request start");

    let mut response = next.run(request).await;

    tracing::info!(
        req_id = %req_id,
        path = %path,
        status = response.status().as_u16(),
        took = start.elapsed().as_millis() as u64,
        "request finish"
    );

    if let Ok(value) = HeaderValue::from_str(&req_id.to_string()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};

    use axum::{body::Body, http::StatusCode, routing::get, Router};
    use tower::ServiceExt as _;
    use tracing_subscriber::fmt::MakeWriter;

    use super::*;

    /// Collects formatted log output in memory.
    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Captured {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Captured {
        type Writer = Captured;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[tokio::test]
    async fn test_logs_wrap_the_handler() {
        let logs = Captured::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let app = Router::new()
            .route(
                "/work",
                get(|| async {
                    tracing::info!("handler ran");
                    "done"
                }),
            )
            .layer(axum::middleware::from_fn(request_logger));

        let response = app
            .oneshot(axum::http::Request::get("/work").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let req_id = response.headers()[REQUEST_ID_HEADER].to_str().unwrap().to_owned();

        let output = logs.contents();
        let lines: Vec<&str> = output.lines().collect();
        let position = |needle: &str| {
            lines
                .iter()
                .position(|line| line.contains(needle))
                .unwrap_or_else(|| panic!("no {needle:?} line in:\n{output}"))
        };
        let start = position("request start");
        let handler = position("handler ran");
        let finish = position("request finish");
        assert!(start < handler && handler < finish, "{output}");

        assert!(lines[start].contains(&format!("req_id={req_id}")));
        assert!(lines[start].contains("method=GET"));
        assert!(lines[start].contains("path=/work"));
        assert!(lines[finish].contains(&format!("req_id={req_id}")));
        assert!(lines[finish].contains("status=200"));
        assert!(lines[finish].contains("took="));
    }
}
