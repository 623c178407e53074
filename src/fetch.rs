use std::time::Duration;

use reqwest::{
    StatusCode,
    header::{ACCEPT_LANGUAGE, HeaderMap, HeaderValue},
};
use thiserror::Error;
use tracing::{debug, instrument};

/// Playlist pages are served without durations to clients that don't look like a browser
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Unable to build HTTP client")]
    Client(#[source] reqwest::Error),
    #[error("Request failed")]
    Request(#[from] reqwest::Error),
    #[error("Server responded with {status} for {url}")]
    Status { status: StatusCode, url: String },
}

/// Builds the HTTP client used to download playlist pages
///
/// # Errors
/// Errors when the TLS backend cannot be initialized
pub fn init_http_client(connect_timeout: Duration) -> Result<reqwest::Client, FetchError> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

    reqwest::Client::builder()
        .user_agent(BROWSER_USER_AGENT)
        .default_headers(headers)
        .connect_timeout(connect_timeout)
        .build()
        .map_err(FetchError::Client)
}

/// Downloads a page and returns its body as text
///
/// # Errors
/// Errors on network failure, on a non-success status, or when the body cannot be decoded
#[instrument(skip(client))]
pub async fn fetch_page(client: &reqwest::Client, url: &str) -> Result<String, FetchError> {
    let res = client.get(url).send().await?;

    let status = res.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            status,
            url: res.url().to_string(),
        });
    }

    let body = res.text().await?;
    debug!("Downloaded {} bytes", body.len());

    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
    };

    /// Serves a single canned HTTP response and hands back the raw request it received
    async fn serve_once(
        status_line: &'static str,
        body: &'static str,
    ) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 4096];
            let n = socket.read(&mut buf).await.unwrap();

            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();

            String::from_utf8_lossy(&buf[..n]).into_owned()
        });

        (format!("http://{addr}/playlist?list=PL123"), handle)
    }

    #[tokio::test]
    async fn test_fetch_page() {
        let (url, server) = serve_once("200 OK", r#"<a href="/watch?v=x">"#).await;
        let client = init_http_client(Duration::from_secs(5)).unwrap();

        let body = fetch_page(&client, &url).await.unwrap();
        assert_eq!(body, r#"<a href="/watch?v=x">"#);

        let request = server.await.unwrap().to_lowercase();
        assert!(request.starts_with("get /playlist?list=pl123 "));
        assert!(request.contains(&format!("user-agent: {}", BROWSER_USER_AGENT.to_lowercase())));
    }

    #[tokio::test]
    async fn test_fetch_page_error_status() {
        let (url, server) = serve_once("404 Not Found", "gone").await;
        let client = init_http_client(Duration::from_secs(5)).unwrap();

        let err = fetch_page(&client, &url).await.unwrap_err();
        assert!(matches!(err, FetchError::Status { status, .. } if status == StatusCode::NOT_FOUND));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_fetch_page_unreachable() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = init_http_client(Duration::from_secs(5)).unwrap();
        let err = fetch_page(&client, &format!("http://{addr}/")).await.unwrap_err();
        assert!(matches!(err, FetchError::Request(_)));
    }
}
