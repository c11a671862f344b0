//! Console backend client.
//!
//! Every call goes through two interceptors. The request interceptor attaches
//! the stored bearer token. The response interceptor turns 401 and 403 into
//! full-page redirects before the caller sees anything; the caller still gets
//! an error so it never waits on a page that is going away.

use console_auth::{AppRoutes, Navigator, TokenStore};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use crate::classify::{classify, ResponseClass};
use crate::config::{ApiConfig, ServiceEndpoint};
use crate::error::{ApiError, ApiResult};

/// Per-call extras.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Query parameters, encoded by the client.
    pub query: Vec<(String, String)>,

    /// Extra headers.
    pub headers: Vec<(String, String)>,
}

impl RequestOptions {
    /// Empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Add a header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// HTTP client for the console backend.
#[derive(Clone)]
pub struct ApiClient {
    /// HTTP client instance.
    client: Client,

    /// Backend endpoint.
    endpoint: ServiceEndpoint,

    /// Source of the bearer token. Read only.
    store: Arc<dyn TokenStore>,

    /// Used for auth-failure redirects.
    navigator: Arc<dyn Navigator>,

    /// Redirect targets.
    routes: AppRoutes,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("endpoint", &self.endpoint)
            .field("has_token", &self.store.has_token())
            .field("routes", &self.routes)
            .finish()
    }
}

impl ApiClient {
    /// Create a client for the configured backend.
    ///
    /// Fails with [`ApiError::InvalidRequest`] when the base URL is not
    /// http(s).
    pub fn new(
        config: &ApiConfig,
        store: Arc<dyn TokenStore>,
        navigator: Arc<dyn Navigator>,
        routes: AppRoutes,
    ) -> ApiResult<Self> {
        config.validate()?;
        let client = Client::builder().timeout(config.timeout()).build()?;

        Ok(Self {
            client,
            endpoint: config.backend.clone(),
            store,
            navigator,
            routes,
        })
    }

    /// Backend endpoint in use.
    pub fn endpoint(&self) -> &ServiceEndpoint {
        &self.endpoint
    }

    /// Send a GET request.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        options: &RequestOptions,
    ) -> ApiResult<T> {
        self.send(Method::GET, path, None::<&()>, options).await
    }

    /// Send a POST request with a JSON body.
    pub async fn post<B, T>(&self, path: &str, body: &B, options: &RequestOptions) -> ApiResult<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        self.send(Method::POST, path, Some(body), options).await
    }

    /// Send a PUT request with a JSON body.
    pub async fn put<B, T>(&self, path: &str, body: &B, options: &RequestOptions) -> ApiResult<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        self.send(Method::PUT, path, Some(body), options).await
    }

    /// Send a PATCH request with a JSON body.
    pub async fn patch<B, T>(&self, path: &str, body: &B, options: &RequestOptions) -> ApiResult<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        self.send(Method::PATCH, path, Some(body), options).await
    }

    /// Send a DELETE request.
    pub async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
        options: &RequestOptions,
    ) -> ApiResult<T> {
        self.send(Method::DELETE, path, None::<&()>, options).await
    }

    /// Send a request through both interceptors.
    #[instrument(skip(self, body, options), fields(method = %method))]
    pub async fn send<B, T>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        options: &RequestOptions,
    ) -> ApiResult<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let request = self.build(method, path, body, options);
        let request = self.authorize(request);

        let response = request.send().await?;
        let response = self.intercept(response).await?;
        Self::decode(response).await
    }

    /// Send a request with neither interceptor: no bearer token, and auth
    /// failures come back as plain status errors.
    #[instrument(skip(self, options))]
    pub async fn get_bare<T: DeserializeOwned>(
        &self,
        path: &str,
        options: &RequestOptions,
    ) -> ApiResult<T> {
        let response = self
            .build(Method::GET, path, None::<&()>, options)
            .send()
            .await?;

        if classify(response.status()) != ResponseClass::Ok {
            return Err(Self::status_error(response).await);
        }
        Self::decode(response).await
    }

    fn build<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        options: &RequestOptions,
    ) -> RequestBuilder
    where
        B: Serialize + ?Sized,
    {
        let url = self.endpoint.url(path);
        debug!(url = %url, "Sending backend request");

        let mut request = self.client.request(method, &url);
        if !options.query.is_empty() {
            request = request.query(&options.query);
        }
        for (name, value) in &options.headers {
            request = request.header(name.as_str(), value.as_str());
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        request
    }

    /// Request interceptor.
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.store.get() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Response interceptor.
    async fn intercept(&self, response: Response) -> ApiResult<Response> {
        match classify(response.status()) {
            ResponseClass::Ok => Ok(response),
            ResponseClass::Unauthenticated => {
                let next = self.navigator.location().path_and_query();
                let target = self.routes.login_with_next(&next);
                warn!(next = %next, "Backend rejected credentials; redirecting to login");
                self.navigator.redirect(&target);
                Err(ApiError::Unauthenticated)
            }
            ResponseClass::Forbidden => {
                warn!("Backend denied access; redirecting to unauthorized page");
                self.navigator.redirect(&self.routes.unauthorized);
                Err(ApiError::Forbidden)
            }
            ResponseClass::Other => Err(Self::status_error(response).await),
        }
    }

    async fn status_error(response: Response) -> ApiError {
        let status = response.status().as_u16();
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        warn!("Backend API error ({}): {}", status, message);
        ApiError::Status { status, message }
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
        let bytes = response.bytes().await?;
        // Empty bodies decode as JSON null so `()` and `Option<T>` work.
        let body: &[u8] = if bytes.is_empty() { b"null" } else { &bytes };
        serde_json::from_slice(body).map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use console_auth::{MemoryNavigator, MemoryTokenStore};

    #[test]
    fn test_request_options_builder() {
        let options = RequestOptions::new()
            .query("month", "3")
            .header("X-Request-Source", "console");
        assert_eq!(options.query, vec![("month".to_string(), "3".to_string())]);
        assert_eq!(options.headers.len(), 1);
    }

    #[test]
    fn test_debug_hides_token() {
        let client = ApiClient::new(
            &ApiConfig::default(),
            Arc::new(MemoryTokenStore::with_token("secret-token")),
            Arc::new(MemoryNavigator::new("/dashboard").unwrap()),
            AppRoutes::default(),
        )
        .unwrap();

        let debug = format!("{:?}", client);
        assert!(!debug.contains("secret-token"));
        assert!(debug.contains("has_token: true"));
    }

    #[test]
    fn test_new_rejects_non_http_backend() {
        let config = ApiConfig {
            backend: ServiceEndpoint {
                base_url: "localhost:5000".to_string(),
            },
            ..Default::default()
        };

        let result = ApiClient::new(
            &config,
            Arc::new(MemoryTokenStore::new()),
            Arc::new(MemoryNavigator::new("/dashboard").unwrap()),
            AppRoutes::default(),
        );

        assert!(matches!(result, Err(ApiError::InvalidRequest(_))));
    }
}
