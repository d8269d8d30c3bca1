use std::time::Duration;

use futures::future::BoxFuture;
use reqwest::{Client, StatusCode};
use tracing::debug;

use super::{OutboundRequest, TransportError};

/// Sends prepared requests to the server.
pub trait Transport: Send + Sync {
    /// Response handed back to the caller untouched
    type Response: Send;

    fn send(&self, request: OutboundRequest) -> BoxFuture<'_, Result<Self::Response, TransportError>>;

    fn status(&self, response: &Self::Response) -> StatusCode;
}

/// HTTP transport over reqwest.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
    base_url: String,
}

impl ReqwestTransport {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    /// Share an existing connection pool
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Transport for ReqwestTransport {
    type Response = reqwest::Response;

    fn send(&self, request: OutboundRequest) -> BoxFuture<'_, Result<Self::Response, TransportError>> {
        Box::pin(async move {
            let url = self.url_for(&request.path);
            debug!(method = %request.method, url = %url, "Sending request");

            let mut builder = self
                .client
                .request(request.method, &url)
                .headers(request.headers);
            if let Some(body) = request.body {
                builder = builder.body(body);
            }
            let response = builder.send().await?;

            debug!(status = %response.status(), url = %url, "Response received");
            Ok(response)
        })
    }

    fn status(&self, response: &Self::Response) -> StatusCode {
        response.status()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::RequestOptions;

    #[test]
    fn test_url_joins_base_and_path() {
        let transport = ReqwestTransport::with_client(Client::new(), "https://erp.example.com/");
        assert_eq!(transport.base_url(), "https://erp.example.com");
        assert_eq!(transport.url_for("/api/sales"), "https://erp.example.com/api/sales");
    }

    #[tokio::test]
    async fn test_sends_method_headers_and_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/customers")
            .match_header("authorization", "Bearer tok")
            .match_header("content-type", "application/json")
            .match_body(r#"{"name":"Ravi"}"#)
            .with_status(201)
            .with_body(r#"{"id":7}"#)
            .expect(1)
            .create_async()
            .await;

        let transport = ReqwestTransport::new(server.url(), Duration::from_secs(5)).unwrap();
        let options = RequestOptions::post()
            .json(&serde_json::json!({"name": "Ravi"}))
            .unwrap();
        let request = OutboundRequest::prepare("api/customers", options, Some("tok")).unwrap();

        let response = transport.send(request).await.unwrap();
        assert_eq!(transport.status(&response), StatusCode::CREATED);
        assert_eq!(response.text().await.unwrap(), r#"{"id":7}"#);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        // Grab a free port, then release it so nothing is listening there
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let base_url = format!("http://127.0.0.1:{}", port);
        let transport = ReqwestTransport::new(base_url, Duration::from_secs(2)).unwrap();
        let request = OutboundRequest::prepare("/", RequestOptions::get(), None).unwrap();

        let result = transport.send(request).await;
        assert!(matches!(result, Err(TransportError::NetworkError(_))));
    }
}
