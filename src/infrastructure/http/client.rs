use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use super::envelope::Envelope;
use super::error::ApiError;
use crate::config::ServerConfig;

const CSRF_HEADER: &str = "X-CSRFToken";

/// Typed client for the library web application's endpoints.
///
/// Every mutating request carries the CSRF token in `X-CSRFToken`.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    csrf_token: String,
}

impl ApiClient {
    pub fn new(config: &ServerConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| ApiError::network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            csrf_token: config.csrf_token.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// GET a JSON document that is not wrapped in an envelope
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        debug!(path, "GET");
        let resp = self.http.get(self.url(path)).send().await?;
        let resp = Self::ensure_success(resp).await?;
        Ok(resp.json().await?)
    }

    /// GET an envelope and unwrap it
    pub async fn get_envelope<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        debug!(path, "GET");
        let resp = self.http.get(self.url(path)).send().await?;
        Self::read_envelope::<T>(resp).await?.into_result()
    }

    /// POST a JSON body and return the raw envelope.
    ///
    /// A non-2xx answer that still carries field errors comes back as `Ok`, so the
    /// caller can attach them to their fields.
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<Envelope<T>, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!(path, "POST json");
        let resp = self
            .http
            .post(self.url(path))
            .header(CSRF_HEADER, &self.csrf_token)
            .json(body)
            .send()
            .await?;
        Self::read_envelope(resp).await
    }

    /// POST `multipart/form-data` text fields
    pub async fn post_form<T: DeserializeOwned>(
        &self,
        path: &str,
        fields: &[(String, String)],
    ) -> Result<Envelope<T>, ApiError> {
        debug!(path, fields = fields.len(), "POST form");
        let form = fields
            .iter()
            .fold(reqwest::multipart::Form::new(), |form, (name, value)| {
                form.text(name.clone(), value.clone())
            });
        let resp = self
            .http
            .post(self.url(path))
            .header(CSRF_HEADER, &self.csrf_token)
            .multipart(form)
            .send()
            .await?;
        Self::read_envelope(resp).await
    }

    /// POST a JSON body and return the response bytes (file downloads)
    pub async fn post_for_bytes<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Vec<u8>, ApiError> {
        debug!(path, "POST download");
        let resp = self
            .http
            .post(self.url(path))
            .header(CSRF_HEADER, &self.csrf_token)
            .json(body)
            .send()
            .await?;
        let resp = Self::ensure_success(resp).await?;
        Ok(resp.bytes().await?.to_vec())
    }

    async fn ensure_success(resp: Response) -> Result<Response, ApiError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let text = resp.text().await.unwrap_or_default();
        Err(Self::status_error(status, &text))
    }

    async fn read_envelope<T: DeserializeOwned>(resp: Response) -> Result<Envelope<T>, ApiError> {
        let status = resp.status();
        let text = resp.text().await?;

        if status.is_success() {
            return serde_json::from_str(&text).map_err(|e| {
                warn!(%status, error = %e, "Unexpected response body");
                ApiError::decode(format!("Respuesta inválida del servidor: {}", e))
            });
        }

        match serde_json::from_str::<Envelope<T>>(&text) {
            Ok(envelope) if envelope.has_field_errors() => Ok(envelope),
            _ => Err(Self::status_error(status, &text)),
        }
    }

    fn status_error(status: StatusCode, body: &str) -> ApiError {
        // Prefer the envelope's `error` text over the raw body
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
            .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
        warn!(%status, %message, "Request failed");
        ApiError::from_status(status, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::http::ApiErrorKind;
    use crate::test_support::spawn_server;
    use axum::http::{HeaderMap, StatusCode as AxumStatus};
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::{json, Value};

    async fn client_for(router: Router) -> ApiClient {
        let base_url = spawn_server(router).await;
        ApiClient::new(&ServerConfig {
            base_url,
            csrf_token: "tok123".into(),
            request_timeout_secs: 5,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn post_json_sends_csrf_header() {
        let router = Router::new().route(
            "/echo/",
            post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                let token = headers
                    .get("X-CSRFToken")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                Json(json!({"success": true, "token": token, "echo": body}))
            }),
        );
        let client = client_for(router).await;

        let env: Envelope<Value> = client.post_json("/echo/", &json!({"motivo": "x"})).await.unwrap();
        assert!(env.success);
        assert_eq!(env.data["token"], "tok123");
        assert_eq!(env.data["echo"]["motivo"], "x");
    }

    #[tokio::test]
    async fn http_status_is_classified() {
        let router = Router::new()
            .route("/forbidden/", get(|| async { (AxumStatus::FORBIDDEN, "nope") }))
            .route(
                "/boom/",
                get(|| async {
                    (
                        AxumStatus::INTERNAL_SERVER_ERROR,
                        Json(json!({"success": false, "error": "Fallo interno"})),
                    )
                }),
            );
        let client = client_for(router).await;

        let err = client.get_envelope::<Value>("/forbidden/").await.unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::Permission);
        assert_eq!(err.status, Some(403));

        let err = client.get_envelope::<Value>("/boom/").await.unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::Server);
        assert_eq!(err.message, "Fallo interno");
    }

    #[tokio::test]
    async fn field_errors_survive_a_400() {
        let router = Router::new().route(
            "/crear/",
            post(|| async {
                (
                    AxumStatus::BAD_REQUEST,
                    Json(json!({"success": false, "errors": {"ci": "Ya registrado"}})),
                )
            }),
        );
        let client = client_for(router).await;
        let env: Envelope<Value> = client
            .post_form("/crear/", &[("ci".to_string(), "1234567".to_string())])
            .await
            .unwrap();
        assert!(!env.success);
        assert_eq!(env.errors.unwrap()["ci"].first(), Some("Ya registrado"));
    }

    #[tokio::test]
    async fn unreachable_server_is_network() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = ApiClient::new(&ServerConfig {
            base_url: format!("http://{}", addr),
            csrf_token: String::new(),
            request_timeout_secs: 2,
        })
        .unwrap();
        let err = client.get_json::<Value>("/x/").await.unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::Network);
    }

    #[tokio::test]
    async fn malformed_body_is_decode() {
        let router = Router::new().route("/bad/", get(|| async { "not json" }));
        let client = client_for(router).await;
        let err = client.get_envelope::<Value>("/bad/").await.unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::Decode);
    }

    #[tokio::test]
    async fn bytes_download() {
        let router = Router::new().route("/xlsx/", post(|| async { vec![0x50u8, 0x4b, 0x03, 0x04] }));
        let client = client_for(router).await;
        let bytes = client.post_for_bytes("/xlsx/", &json!({"tablas": ["libros"]})).await.unwrap();
        assert_eq!(bytes, vec![0x50, 0x4b, 0x03, 0x04]);
    }
}
