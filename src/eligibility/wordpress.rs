//! WordPress host detection
//!
//! A host is treated as a WordPress site when its `/wp-admin` endpoint
//! either refuses access (403) or serves a page mentioning WordPress.

use super::HostEligibility;
use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::debug;

/// Probes `<scheme>://<host>[:port]/wp-admin`
pub struct WordPressProbe {
    client: reqwest::Client,
    scheme: String,
}

impl WordPressProbe {
    /// Probes with `scheme` (`https`, or `http` for local servers)
    pub fn with_scheme(client: reqwest::Client, scheme: &str) -> Self {
        Self {
            client,
            scheme: scheme.to_string(),
        }
    }
}

#[async_trait]
impl HostEligibility for WordPressProbe {
    async fn is_eligible(&self, host: &str, port: Option<u16>) -> bool {
        let probe_url = match port {
            Some(port) => format!("{}://{}:{}/wp-admin", self.scheme, host, port),
            None => format!("{}://{}/wp-admin", self.scheme, host),
        };

        let response = match self.client.get(&probe_url).send().await {
            Ok(response) => response,
            Err(e) => {
                debug!("Eligibility probe for {} failed: {}", host, e);
                return false;
            }
        };

        match response.status() {
            StatusCode::FORBIDDEN => true,
            StatusCode::OK => match response.text().await {
                Ok(body) => body.to_lowercase().contains("wordpress"),
                Err(e) => {
                    debug!("Eligibility probe body for {} unreadable: {}", host, e);
                    false
                }
            },
            status => {
                debug!("Eligibility probe for {} returned {}", host, status);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn probe_against(template: ResponseTemplate) -> bool {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/wp-admin"))
            .respond_with(template)
            .mount(&server)
            .await;

        let address = server.address();
        WordPressProbe::with_scheme(reqwest::Client::new(), "http")
            .is_eligible(&address.ip().to_string(), Some(address.port()))
            .await
    }

    #[tokio::test]
    async fn test_forbidden_is_eligible() {
        assert!(probe_against(ResponseTemplate::new(403)).await);
    }

    #[tokio::test]
    async fn test_login_page_is_eligible() {
        let body = "<html><title>Log In &lsaquo; Blog &#8212; WordPress</title></html>";
        assert!(probe_against(ResponseTemplate::new(200).set_body_string(body)).await);
    }

    #[tokio::test]
    async fn test_other_ok_page_is_not_eligible() {
        let body = "<html><title>Admin</title></html>";
        assert!(!probe_against(ResponseTemplate::new(200).set_body_string(body)).await);
    }

    #[tokio::test]
    async fn test_not_found_is_not_eligible() {
        assert!(!probe_against(ResponseTemplate::new(404)).await);
    }

    #[tokio::test]
    async fn test_unreachable_host_is_not_eligible() {
        let probe = WordPressProbe::with_scheme(reqwest::Client::new(), "http");
        assert!(!probe.is_eligible("127.0.0.1", Some(1)).await);
    }
}
