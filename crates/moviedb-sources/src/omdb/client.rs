use crate::error::{LookupError, LookupOperation};
use crate::omdb::api;
use crate::traits::MovieLookup;
use async_trait::async_trait;
use moviedb_config::{OmdbConfig, DEFAULT_OMDB_BASE_URL};
use moviedb_models::{MediaType, Movie};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Create a reqwest Client with the configured user agent and timeout
pub fn create_omdb_client(user_agent: &str, timeout: Duration) -> Client {
    Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| Client::new())
}

#[derive(Clone)]
pub struct OmdbClient {
    client: Arc<Client>,
    api_key: String,
    base_url: String,
    search_type: MediaType,
}

impl OmdbClient {
    pub fn new(api_key: String) -> Self {
        Self::from_config(&OmdbConfig::default(), api_key)
    }

    pub fn from_config(config: &OmdbConfig, api_key: String) -> Self {
        let base_url = if config.base_url.trim().is_empty() {
            DEFAULT_OMDB_BASE_URL.to_string()
        } else {
            config.base_url.trim().to_string()
        };

        Self {
            client: Arc::new(create_omdb_client(
                &config.user_agent,
                Duration::from_secs(config.timeout_seconds),
            )),
            api_key,
            base_url,
            search_type: config.search_type.clone(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn search_type(&self) -> &MediaType {
        &self.search_type
    }

    /// GET a URL and return the body of a 2xx response.
    /// `what` is a loggable description of the request (the URL carries the key).
    async fn get_body(&self, url: &str, operation: LookupOperation, what: &str) -> Result<String, LookupError> {
        let response = match self.client.get(url).header("Accept", "application/json").send().await {
            Ok(response) => response,
            Err(e) => {
                let e = e.without_url();
                warn!("{} request failed for {}: {}", self.lookup_name(), what, e);
                return Err(LookupError::transport(operation, e.to_string()));
            }
        };

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!("{} request for {} returned HTTP {} - {}", self.lookup_name(), what, status, error_text);
            return Err(LookupError::transport(operation, format!("HTTP {}", status)));
        }

        response.text().await.map_err(|e| {
            let e = e.without_url();
            warn!("Failed to read {} response body for {}: {}", self.lookup_name(), what, e);
            LookupError::transport(operation, e.to_string())
        })
    }
}

#[async_trait]
impl MovieLookup for OmdbClient {
    fn lookup_name(&self) -> &str {
        "omdb"
    }

    async fn search(&self, query: &str) -> Result<Vec<Movie>, LookupError> {
        debug!("{} search: query='{}' type={}", self.lookup_name(), query, self.search_type);
        let url = api::search_url(&self.base_url, &self.api_key, query, &self.search_type);
        let body = self
            .get_body(&url, LookupOperation::Search, &format!("search '{}'", query))
            .await?;
        let hits = api::parse_search_response(&body)?;
        debug!("{} search '{}' returned {} hits", self.lookup_name(), query, hits.len());
        Ok(hits)
    }

    async fn fetch(&self, imdb_id: &str) -> Result<Movie, LookupError> {
        debug!("{} detail fetch: id={}", self.lookup_name(), imdb_id);
        let url = api::detail_url(&self.base_url, &self.api_key, imdb_id);
        let body = self
            .get_body(&url, LookupOperation::Detail, &format!("detail {}", imdb_id))
            .await?;
        api::parse_detail_response(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn client_for(base_url: String) -> OmdbClient {
        let config = OmdbConfig {
            base_url,
            timeout_seconds: 2,
            ..OmdbConfig::default()
        };
        OmdbClient::from_config(&config, "test-key".to_string())
    }

    /// Serve one canned HTTP response on a local port and return its base URL
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 4096];
            let _ = socket.read(&mut request).await;
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        });

        format!("http://{}/", addr)
    }

    fn unreachable_client() -> OmdbClient {
        client_for("http://127.0.0.1:1/".to_string())
    }

    #[test]
    fn test_from_config_defaults() {
        let client = OmdbClient::new("k".to_string());
        assert_eq!(client.base_url(), DEFAULT_OMDB_BASE_URL);
        assert_eq!(client.search_type(), &MediaType::Movie);
        assert_eq!(client.lookup_name(), "omdb");
    }

    #[tokio::test]
    async fn test_search_network_failure_is_generic() {
        let err = unreachable_client().search("batman").await.unwrap_err();
        assert!(err.is_transport());
        assert_eq!(err.to_string(), "Failed to fetch movies");
    }

    #[tokio::test]
    async fn test_fetch_network_failure_is_generic() {
        let err = unreachable_client().fetch("tt0111161").await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to fetch movie details");
    }

    #[tokio::test]
    async fn test_search_http_error_status_is_generic() {
        let base_url = serve_once(
            "503 Service Unavailable",
            r#"{"Response":"False","Error":"Request limit reached!"}"#,
        )
        .await;

        let err = client_for(base_url).search("batman").await.unwrap_err();
        assert!(err.is_transport());
        assert_eq!(err.to_string(), "Failed to fetch movies");
        assert!(!err.to_string().contains("Request limit"));
    }

    #[tokio::test]
    async fn test_search_success_over_http() {
        let base_url = serve_once(
            "200 OK",
            r#"{"Search":[{"Title":"Batman","Year":"1989","imdbID":"tt0096895","Type":"movie","Poster":"N/A"}],"Response":"True"}"#,
        )
        .await;

        let hits = client_for(base_url).search("batman").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].imdb_id, "tt0096895");
    }
}
