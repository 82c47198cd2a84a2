//! # HTTP Client Utilities
//!
//! Thin reqwest wrapper used by the backend API client.
//!
//! Handles timeouts and JSON (de)serialization. It also maps transport
//! failures and non-success statuses onto [`ApiError`], keeping the server's
//! `message` string when the error body carries one.

use crate::infrastructure::api::error::{ApiError, ApiResult};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// HTTP client wrapper for the backend API.
#[derive(Debug, Clone)]
pub struct HttpClient {
    /// Inner reqwest client.
    client: Client,
    /// Request timeout in milliseconds.
    timeout_ms: u64,
}

impl HttpClient {
    /// Creates a new HTTP client with the specified timeout.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Internal` if the client cannot be created.
    pub fn new(timeout_ms: u64) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| ApiError::internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, timeout_ms })
    }

    /// Returns the configured timeout in milliseconds.
    #[inline]
    #[must_use]
    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    /// Makes a GET request and deserializes the JSON response.
    ///
    /// # Errors
    ///
    /// Returns a transport error if the request fails, a status error for
    /// non-2xx answers and `ApiError::Decode` if the body cannot be parsed.
    pub async fn get<T: DeserializeOwned>(&self, url: &str) -> ApiResult<T> {
        self.send_json(self.client.get(url)).await
    }

    /// Makes a GET request with query parameters.
    ///
    /// # Errors
    ///
    /// Same as [`get`](Self::get).
    pub async fn get_with_params<T: DeserializeOwned, P: Serialize + ?Sized>(
        &self,
        url: &str,
        params: &P,
    ) -> ApiResult<T> {
        self.send_json(self.client.get(url).query(params)).await
    }

    /// Makes a POST request with a JSON body.
    ///
    /// # Errors
    ///
    /// Same as [`get`](Self::get).
    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
    ) -> ApiResult<T> {
        self.send_json(self.client.post(url).json(body)).await
    }

    /// Makes a PUT request with a JSON body.
    ///
    /// # Errors
    ///
    /// Same as [`get`](Self::get).
    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
    ) -> ApiResult<T> {
        self.send_json(self.client.put(url).json(body)).await
    }

    /// Makes a DELETE request, ignoring any response body.
    ///
    /// # Errors
    ///
    /// Returns a transport error if the request fails and a status error for
    /// non-2xx answers.
    pub async fn delete(&self, url: &str) -> ApiResult<()> {
        let response = self.send(self.client.delete(url)).await?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let error_body = response.text().await.unwrap_or_default();
            Err(map_status_error(status, &error_body))
        }
    }

    async fn send(&self, request: RequestBuilder) -> ApiResult<Response> {
        request.send().await.map_err(|e| self.map_reqwest_error(e))
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> ApiResult<T> {
        let response = self.send(request).await?;
        self.handle_response(response).await
    }

    /// Handles the HTTP response, checking status and deserializing JSON.
    async fn handle_response<T: DeserializeOwned>(&self, response: Response) -> ApiResult<T> {
        let status = response.status();

        if status.is_success() {
            response
                .json::<T>()
                .await
                .map_err(|e| ApiError::decode(format!("Failed to parse response: {}", e)))
        } else {
            let error_body = response.text().await.unwrap_or_default();
            Err(map_status_error(status, &error_body))
        }
    }

    /// Maps a reqwest error to an `ApiError`.
    fn map_reqwest_error(&self, error: reqwest::Error) -> ApiError {
        if error.is_timeout() {
            ApiError::timeout(format!("Request timed out after {}ms", self.timeout_ms))
        } else if error.is_connect() {
            ApiError::connection(format!("Connection failed: {}", error))
        } else if error.is_decode() {
            ApiError::decode(format!("Failed to read response: {}", error))
        } else {
            ApiError::connection(format!("HTTP request failed: {}", error))
        }
    }
}

/// Extracts the server's `message` (or `error`) string from an error body.
///
/// Falls back to the raw body, then to the status reason phrase.
#[must_use]
pub fn server_message(status: StatusCode, body: &str) -> String {
    let from_json = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            ["message", "error"]
                .iter()
                .find_map(|key| value.get(key).and_then(|m| m.as_str()).map(str::to_string))
        });

    match from_json {
        Some(message) => message,
        None if !body.trim().is_empty() => body.trim().to_string(),
        None => status
            .canonical_reason()
            .unwrap_or("HTTP error")
            .to_string(),
    }
}

/// Maps an HTTP status code to an `ApiError`.
fn map_status_error(status: StatusCode, body: &str) -> ApiError {
    let message = server_message(status, body);
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::unauthorized(message),
        StatusCode::NOT_FOUND => ApiError::not_found(message),
        _ => ApiError::http(status.as_u16(), message),
    }
}
