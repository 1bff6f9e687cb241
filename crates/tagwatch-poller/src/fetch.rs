//! Fetching the monitored page

use crate::{FetchError, PollerError};
use reqwest::StatusCode;
use std::future::Future;
use std::time::Duration;

/// Source of the raw page text polled each cycle
pub trait PageSource {
    /// Fetch the current body; any failure means "no update this cycle"
    fn fetch(&self) -> impl Future<Output = Result<String, FetchError>> + Send;
}

/// Fetches a fixed URL over HTTP with a bounded timeout
pub struct HttpPageSource {
    url: String,
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpPageSource {
    /// Create a source for `url`, failing any request that exceeds `timeout`
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, PollerError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            url: url.into(),
            client,
            timeout,
        })
    }

    fn classify(&self, e: reqwest::Error) -> FetchError {
        if e.is_timeout() {
            FetchError::Timeout(self.timeout)
        } else {
            FetchError::Request(e.to_string())
        }
    }
}

impl PageSource for HttpPageSource {
    fn fetch(&self) -> impl Future<Output = Result<String, FetchError>> + Send {
        async move {
            let response = self
                .client
                .get(&self.url)
                .send()
                .await
                .map_err(|e| self.classify(e))?;

            if response.status() != StatusCode::OK {
                return Err(FetchError::Status(response.status().as_u16()));
            }

            response.text().await.map_err(|e| self.classify(e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode as AxumStatus, routing::get, Router};
    use tokio::net::TcpListener;

    async fn serve_test_page() -> String {
        let app = Router::new()
            .route("/", get(|| async { "TAG ID: x1 gate ---- opened" }))
            .route("/missing", get(|| async { (AxumStatus::NOT_FOUND, "nope") }))
            .route("/created", get(|| async { (AxumStatus::CREATED, "TAG ID: c x ---- m") }))
            .route(
                "/slow",
                get(|| async {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    "late"
                }),
            );

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_fetch_ok() {
        let base = serve_test_page().await;
        let source = HttpPageSource::new(format!("{}/", base), Duration::from_secs(5)).unwrap();

        let body = source.fetch().await.unwrap();
        assert_eq!(body, "TAG ID: x1 gate ---- opened");
    }

    #[tokio::test]
    async fn test_non_200_is_status_error() {
        let base = serve_test_page().await;

        let missing = HttpPageSource::new(format!("{}/missing", base), Duration::from_secs(5)).unwrap();
        assert!(matches!(missing.fetch().await, Err(FetchError::Status(404))));

        let created = HttpPageSource::new(format!("{}/created", base), Duration::from_secs(5)).unwrap();
        assert!(matches!(created.fetch().await, Err(FetchError::Status(201))));
    }

    #[tokio::test]
    async fn test_timeout() {
        let base = serve_test_page().await;
        let source = HttpPageSource::new(format!("{}/slow", base), Duration::from_millis(200)).unwrap();

        match source.fetch().await {
            Err(FetchError::Timeout(d)) => assert_eq!(d, Duration::from_millis(200)),
            other => panic!("expected timeout, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_connection_refused() {
        // Bind then drop to get a port nothing listens on
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let source = HttpPageSource::new(format!("http://{}/", addr), Duration::from_secs(2)).unwrap();
        assert!(matches!(source.fetch().await, Err(FetchError::Request(_))));
    }
}
