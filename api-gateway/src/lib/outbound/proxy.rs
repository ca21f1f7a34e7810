use axum::body::Body;
use axum::extract::Request;
use axum::http::header;
use axum::http::HeaderMap;
use axum::http::HeaderName;
use axum::response::Response;
use reqwest::Client;
use thiserror::Error;

/// Largest request body relayed upstream.
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Connection-scoped headers that must not cross the proxy.
const HOP_BY_HOP: [HeaderName; 8] = [
    header::CONNECTION,
    HeaderName::from_static("keep-alive"),
    header::PROXY_AUTHENTICATE,
    header::PROXY_AUTHORIZATION,
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProxyError {
    #[error("No route for path: {0}")]
    NoRoute(String),

    #[error("Unreadable request body: {0}")]
    Body(String),

    #[error("Upstream request failed: {0}")]
    Upstream(String),
}

/// Path prefix served by one upstream base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    prefix: String,
    upstream: String,
}

impl Route {
    pub fn new(prefix: impl Into<String>, upstream: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            upstream: upstream.into().trim_end_matches('/').to_string(),
        }
    }

    /// `/students` matches `/students` and `/students/1`, not `/studentsx`.
    fn matches(&self, path: &str) -> bool {
        match path.strip_prefix(self.prefix.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with('/') || self.prefix.ends_with('/'),
            None => false,
        }
    }

    fn url_for(&self, path_and_query: &str) -> String {
        format!("{}{}", self.upstream, path_and_query)
    }
}

/// Relays requests to the upstream owning the longest matching prefix.
pub struct UpstreamProxy {
    client: Client,
    routes: Vec<Route>,
}

impl UpstreamProxy {
    pub fn new(mut routes: Vec<Route>) -> Result<Self, ProxyError> {
        let client = Client::builder()
            .build()
            .map_err(|e| ProxyError::Upstream(e.to_string()))?;

        routes.sort_by(|a, b| b.prefix.len().cmp(&a.prefix.len()));

        Ok(Self { client, routes })
    }

    pub fn route_for(&self, path: &str) -> Option<&Route> {
        self.routes.iter().find(|route| route.matches(path))
    }

    /// Send the request upstream and relay status, headers and body back.
    ///
    /// # Errors
    /// * `NoRoute` - No configured prefix matches the path
    /// * `Body` - Request body could not be read
    /// * `Upstream` - Upstream unreachable or response unreadable
    pub async fn forward(&self, req: Request) -> Result<Response, ProxyError> {
        let (parts, body) = req.into_parts();
        let path = parts.uri.path();

        let route = self
            .route_for(path)
            .ok_or_else(|| ProxyError::NoRoute(path.to_string()))?;
        let path_and_query = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or(path);
        let url = route.url_for(path_and_query);

        let body = axum::body::to_bytes(body, MAX_BODY_BYTES)
            .await
            .map_err(|e| ProxyError::Body(e.to_string()))?;

        let mut headers = parts.headers;
        strip_connection_headers(&mut headers);
        headers.remove(header::HOST);

        tracing::debug!(method = %parts.method, url = %url, "Forwarding request");

        let upstream = self
            .client
            .request(parts.method, &url)
            .headers(headers)
            .body(body)
            .send()
            .await
            .map_err(|e| ProxyError::Upstream(e.to_string()))?;

        let status = upstream.status();
        let mut headers = upstream.headers().clone();
        strip_connection_headers(&mut headers);

        let bytes = upstream
            .bytes()
            .await
            .map_err(|e| ProxyError::Upstream(e.to_string()))?;

        let mut response = Response::new(Body::from(bytes));
        *response.status_mut() = status;
        *response.headers_mut() = headers;

        Ok(response)
    }
}

/// Remove hop-by-hop headers and the length, which is recomputed on send.
fn strip_connection_headers(headers: &mut HeaderMap) {
    for name in HOP_BY_HOP {
        headers.remove(name);
    }
    headers.remove(header::CONTENT_LENGTH);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn proxy() -> UpstreamProxy {
        UpstreamProxy::new(vec![
            Route::new("/auth", "http://auth:8081/"),
            Route::new("/students", "http://students:8082"),
            Route::new("/students/reports", "http://reports:8083"),
        ])
        .unwrap()
    }

    #[test]
    fn test_longest_prefix_wins() {
        let proxy = proxy();

        assert_eq!(
            proxy.route_for("/students/reports/1").unwrap().upstream,
            "http://reports:8083"
        );
        assert_eq!(
            proxy.route_for("/students/1").unwrap().upstream,
            "http://students:8082"
        );
        assert_eq!(
            proxy.route_for("/students").unwrap().upstream,
            "http://students:8082"
        );
    }

    #[test]
    fn test_prefix_matches_whole_segments() {
        let proxy = proxy();

        assert!(proxy.route_for("/studentsx").is_none());
        assert!(proxy.route_for("/drivers").is_none());
    }

    #[test]
    fn test_url_for_keeps_path_and_query() {
        let route = Route::new("/auth", "http://auth:8081/");
        assert_eq!(
            route.url_for("/auth/login?next=%2F"),
            "http://auth:8081/auth/login?next=%2F"
        );
    }

    #[test]
    fn test_strip_connection_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONNECTION, "keep-alive".parse().unwrap());
        headers.insert(header::TRANSFER_ENCODING, "chunked".parse().unwrap());
        headers.insert(header::CONTENT_TYPE, "application/json".parse().unwrap());

        strip_connection_headers(&mut headers);

        assert_eq!(headers.len(), 1);
        assert!(headers.contains_key(header::CONTENT_TYPE));
    }
}
