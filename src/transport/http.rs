//! Blocking HTTP transport built on reqwest.

use super::{Transport, UserAgent, authorization_header};
use crate::config::ClientConfig;
use crate::error::{OssIndexError, Result, TransportErrorKind};
use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};

/// Helper to convert reqwest errors to transport errors
fn network_error(msg: &str, err: reqwest::Error) -> OssIndexError {
    OssIndexError::transport(msg, TransportErrorKind::Network(err.to_string()))
}

/// HTTP transport for the report service.
///
/// Applies the configured user agent, service credentials, proxy and
/// timeouts. Cookies are not stored between requests.
pub struct HttpTransport {
    client: Client,
    authorization: Option<String>,
}

impl HttpTransport {
    /// Create a transport from client configuration.
    pub fn new(config: &ClientConfig, user_agent: &UserAgent) -> Result<Self> {
        // no timeout unless configured; reqwest otherwise applies its own default
        let mut builder = Client::builder()
            .user_agent(user_agent.as_str())
            .timeout(config.timeout.read_timeout);

        if let Some(connect_timeout) = config.timeout.connect_timeout {
            builder = builder.connect_timeout(connect_timeout);
        }

        if let Some(ref proxy_config) = config.proxy {
            let mut proxy = reqwest::Proxy::all(proxy_config.url()).map_err(|e| {
                OssIndexError::transport(
                    "configuring http-proxy",
                    TransportErrorKind::Client(e.to_string()),
                )
            })?;
            if let Some(ref auth) = proxy_config.auth {
                proxy = proxy.basic_auth(&auth.username, &auth.password);
                tracing::debug!("Configured http-proxy authentication");
            }
            if let Some(ref hosts) = proxy_config.non_proxy_hosts {
                let hosts = hosts.replace('|', ",");
                proxy = proxy.no_proxy(reqwest::NoProxy::from_string(&hosts));
            }
            builder = builder.proxy(proxy);
            tracing::debug!("Configured http-proxy: {}", proxy_config.url());
        }

        let client = builder.build().map_err(|e| {
            OssIndexError::transport(
                "creating HTTP client",
                TransportErrorKind::Client(e.to_string()),
            )
        })?;

        Ok(Self {
            client,
            authorization: authorization_header(config.auth.as_ref()),
        })
    }
}

impl Transport for HttpTransport {
    fn post(&self, url: &str, content_type: &str, body: &str, accept: &str) -> Result<String> {
        tracing::debug!("POST {}; payload: {} ({}); accept: {}", url, body, content_type, accept);

        let mut request = self
            .client
            .post(url)
            .header(CONTENT_TYPE, content_type)
            .header(ACCEPT, accept)
            .body(body.to_string());

        if let Some(ref authorization) = self.authorization {
            request = request.header(AUTHORIZATION, authorization);
        }

        let response = request
            .send()
            .map_err(|e| network_error("Failed to send request", e))?;

        let status = response.status();
        tracing::trace!("Status: {}", status);

        if status != StatusCode::OK {
            let body = response.text().unwrap_or_default();
            return Err(OssIndexError::transport(
                format!("POST {url}"),
                TransportErrorKind::Status {
                    status: status.as_u16(),
                    body,
                },
            ));
        }

        response.text().map_err(|e| {
            OssIndexError::transport(
                "reading response body",
                TransportErrorKind::InvalidResponse(e.to_string()),
            )
        })
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("authorization", &self.authorization.as_ref().map(|_| "<redacted>"))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AuthConfig, ProxyConfig};
    use std::time::Duration;

    #[test]
    fn test_transport_construction() {
        let mut config = ClientConfig::default().with_auth(AuthConfig::new("user", "token"));
        config.timeout.connect_timeout = Some(Duration::from_secs(5));
        config.timeout.read_timeout = Some(Duration::from_secs(30));

        let transport = HttpTransport::new(&config, &UserAgent::client_default()).unwrap();
        assert_eq!(transport.name(), "http");
        assert!(transport.authorization.as_deref().unwrap().starts_with("Basic "));
        assert!(!format!("{transport:?}").contains("Basic"));
    }

    #[test]
    fn test_transport_with_proxy() {
        let mut proxy = ProxyConfig::new("proxy.internal", 3128);
        proxy.auth = Some(AuthConfig::new("proxy-user", "proxy-pass"));
        proxy.non_proxy_hosts = Some("localhost|*.internal".to_string());
        let config = ClientConfig::default().with_proxy(proxy);

        assert!(HttpTransport::new(&config, &UserAgent::client_default()).is_ok());
    }
}
