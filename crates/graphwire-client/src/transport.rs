//! HTTP transport implementation

use async_trait::async_trait;
use graphwire_core::{Headers, Method, Transport, TransportError, TransportResponse};
use reqwest::header::ACCEPT;
use reqwest::Client;

use crate::config::ClientConfig;

/// Transport that talks to the database REST API over HTTP
pub struct HttpTransport {
    endpoint: String,
    http_client: Client,
    credentials: Option<(String, Option<String>)>,
}

impl HttpTransport {
    /// Create a transport for the given database root with default settings.
    ///
    /// # Example
    /// ```no_run
    /// # use graphwire_client::HttpTransport;
    /// let transport = HttpTransport::new("http://localhost:7474/db/data").unwrap();
    /// ```
    pub fn new(endpoint: &str) -> Result<Self, TransportError> {
        Self::from_config(&ClientConfig::new(endpoint))
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, TransportError> {
        let http_client = Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("graphwire/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(map_error)?;

        Ok(Self {
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            http_client,
            credentials: config
                .username
                .clone()
                .map(|user| (user, config.password.clone())),
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<TransportResponse, TransportError> {
        let url = format!("{}{}", self.endpoint, path);

        let mut request = self
            .http_client
            .request(reqwest_method(method), &url)
            .header(ACCEPT, "application/json");
        if let Some((user, password)) = &self.credentials {
            request = request.basic_auth(user, password.as_ref());
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(map_error)?;

        let status = response.status().as_u16();
        let headers: Headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str(), v.to_string()))
            })
            .collect();
        let bytes = response.bytes().await.map_err(map_error)?;

        Ok(TransportResponse {
            status,
            headers,
            body: decode_body(&bytes),
        })
    }
}

fn reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Delete => reqwest::Method::DELETE,
    }
}

fn map_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout(err.to_string())
    } else if err.is_connect() {
        TransportError::Connect(err.to_string())
    } else {
        TransportError::Other(err.to_string())
    }
}

/// Empty bodies decode to `None`; bodies that are not JSON are kept as a
/// JSON string.
fn decode_body(bytes: &[u8]) -> Option<serde_json::Value> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return None;
    }
    serde_json::from_slice(bytes).ok().or_else(|| {
        Some(serde_json::Value::String(
            String::from_utf8_lossy(bytes).into_owned(),
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_body() {
        assert_eq!(decode_body(b""), None);
        assert_eq!(decode_body(b"  \n"), None);
        assert_eq!(
            decode_body(br#"{"self": "http://host/node/1"}"#),
            Some(json!({"self": "http://host/node/1"}))
        );
        assert_eq!(
            decode_body(b"Internal Server Error"),
            Some(json!("Internal Server Error"))
        );
    }

    #[test]
    fn test_endpoint_trailing_slash() {
        let transport = HttpTransport::new("http://localhost:7474/db/data/").unwrap();
        assert_eq!(transport.endpoint(), "http://localhost:7474/db/data");
    }

    #[tokio::test]
    async fn test_unreachable_server_is_transport_error() {
        let config = ClientConfig::new("http://127.0.0.1:1/db/data").with_timeout(2);
        let transport = HttpTransport::from_config(&config).unwrap();

        let result = transport.request(Method::Get, "/node/1", None).await;
        assert!(result.is_err());
    }
}
