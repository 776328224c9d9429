//! Connection accept loop.
//!
//! `axum::serve` offers no knobs for header size or keep-alive idle time, so
//! connections are driven by hyper-util directly, the same way `axum::serve`
//! does internally.

use std::net::SocketAddr;
use std::time::Duration;

use axum::{extract::ConnectInfo, http::Request, Router};
use hyper::body::Incoming;
use hyper_util::{
    rt::{TokioExecutor, TokioIo, TokioTimer},
    server::conn::auto::Builder,
    service::TowerToHyperService,
};
use tokio::net::TcpListener;
use tower::ServiceExt as _;

use crate::settings::Timeouts;

/// Upper bound on the buffered request head.
pub const MAX_HEADER_BYTES: usize = 1 << 20;

const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Serve `app` on `listener` until the task is dropped.
///
/// The idle timeout bounds how long a connection may sit without sending the
/// next request head; read and write timeouts are applied by the router.
pub async fn serve(listener: TcpListener, app: Router, timeouts: &Timeouts) {
    let mut builder = Builder::new(TokioExecutor::new());
    builder
        .http1()
        .timer(TokioTimer::new())
        .header_read_timeout(timeouts.idle)
        .max_buf_size(MAX_HEADER_BYTES);
    builder.http2().timer(TokioTimer::new());

    loop {
        let (stream, remote) = match listener.accept().await {
            Ok(conn) => conn,
            Err(e) => {
                tracing::warn!(error = %e, "accept failed");
                tokio::time::sleep(ACCEPT_BACKOFF).await;
                continue;
            }
        };

        let service = app
            .clone()
            .map_request(move |mut request: Request<Incoming>| {
                request
                    .extensions_mut()
                    .insert(ConnectInfo::<SocketAddr>(remote));
                request
            });
        let builder = builder.clone();

        tokio::spawn(async move {
            let io = TokioIo::new(stream);
            if let Err(e) = builder
                .serve_connection_with_upgrades(io, TowerToHyperService::new(service))
                .await
            {
                tracing::debug!(error = %e, remote = %remote, "connection closed with error");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    use crate::{db, routes, settings::Settings, AppState};

    async fn spawn_server(timeouts: Timeouts) -> SocketAddr {
        let pool = db::connect_in_memory().await.unwrap();
        let app = routes::router(AppState::new(pool, Settings::default()));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { serve(listener, app, &timeouts).await });
        addr
    }

    /// Read until the server closes the connection. A reset counts as closed.
    async fn read_until_closed(stream: &mut (impl AsyncRead + Unpin)) -> String {
        let mut response = Vec::new();
        let read = tokio::time::timeout(Duration::from_secs(10), stream.read_to_end(&mut response))
            .await
            .expect("server closed the connection");
        if let Err(e) = read {
            assert_eq!(e.kind(), std::io::ErrorKind::ConnectionReset, "{e}");
        }
        String::from_utf8_lossy(&response).into_owned()
    }

    #[tokio::test]
    async fn test_serves_health_over_tcp() {
        let addr = spawn_server(Timeouts::default()).await;

        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream
            .write_all(b"GET /api/v1/health HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
            .await
            .unwrap();
        let response = read_until_closed(&mut stream).await;

        assert!(response.starts_with("HTTP/1.1 200 OK"), "{response}");
        assert!(response.contains("x-request-id"));
        assert!(response.ends_with(r#"{"status":"ok"}"#), "{response}");
    }

    #[tokio::test]
    async fn test_oversized_request_head_is_refused() {
        let addr = spawn_server(Timeouts::default()).await;

        let filler = "a".repeat(MAX_HEADER_BYTES + 1024);
        let request = format!(
            "GET /api/v1/health HTTP/1.1\r\nHost: localhost\r\nX-Filler: {filler}\r\n\r\n"
        );

        let (mut reader, mut writer) = TcpStream::connect(addr).await.unwrap().into_split();
        // The server may hang up before the whole head is sent.
        tokio::spawn(async move {
            let _ = writer.write_all(request.as_bytes()).await;
        });
        let response = read_until_closed(&mut reader).await;

        assert!(
            response.is_empty() || response.starts_with("HTTP/1.1 431"),
            "{response}"
        );
    }

    #[tokio::test]
    async fn test_incomplete_head_hits_idle_timeout() {
        let addr = spawn_server(Timeouts {
            idle: Duration::from_millis(200),
            ..Timeouts::default()
        })
        .await;

        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream
            .write_all(b"GET /api/v1/health HTTP/1.1\r\nHost: localhost\r\n")
            .await
            .unwrap();
        let response = read_until_closed(&mut stream).await;

        assert!(!response.contains("200 OK"), "{response}");
    }
}
