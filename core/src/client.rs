// SPDX-License-Identifier: GPL-3.0-only

//! HTTP client for the hotel backend.
//!
//! The client only knows how to reach the backend and how to turn its answers
//! into [`ApiError`]s. The endpoints themselves live next to the models they
//! return (`Transaction::get_page`, `Room::get_details`, ...).

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::Config;
use crate::error::ApiError;
use crate::session::Session;

#[derive(Debug, serde::Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    session: Session,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ApiError::Request(format!("failed to initialize HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.backend_url.trim_end_matches('/').to_string(),
            session: config.session.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn headers(&self) -> Result<HeaderMap, ApiError> {
        let token = self.session.access_token().ok_or(ApiError::MissingSession)?;
        let auth_header = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|e| ApiError::Request(format!("invalid access token: {e}")))?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(AUTHORIZATION, auth_header);
        Ok(headers)
    }

    /// Starts an authenticated request to the given backend path
    pub(crate) fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        Ok(self.client.request(method, url).headers(self.headers()?))
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let request = request.build()?;
        debug!(method = %request.method(), url = %request.url(), "sending request");

        let response = self.client.execute(request).await?;
        debug!(status = %response.status(), "response received");
        Ok(response)
    }

    /// Sends the request and parses a JSON body out of a successful answer
    pub(crate) async fn fetch_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = self.send(request).await?;
        let status = response.status();
        let body = read_body(response).await?;

        parse_response(status, &body)
    }

    /// Sends the request, only the transport status matters
    pub(crate) async fn expect_status(
        &self,
        request: RequestBuilder,
        expected: StatusCode,
    ) -> Result<(), ApiError> {
        let response = self.send(request).await?;
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        check_status(status, &body, expected)
    }
}

/// Reads the whole answer, a connection lost halfway means no usable response
async fn read_body(response: Response) -> Result<String, ApiError> {
    response
        .text()
        .await
        .map_err(|e| ApiError::NoResponse(e.to_string()))
}

/// Turns an answer into `T` or into the matching [`ApiError`]
pub fn parse_response<T: DeserializeOwned>(status: StatusCode, body: &str) -> Result<T, ApiError> {
    if !status.is_success() {
        return Err(server_error(status, body));
    }

    serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
}

pub fn check_status(status: StatusCode, body: &str, expected: StatusCode) -> Result<(), ApiError> {
    if !status.is_success() {
        return Err(server_error(status, body));
    }
    if status != expected {
        return Err(ApiError::UnexpectedStatus(status.as_u16()));
    }

    Ok(())
}

fn server_error(status: StatusCode, body: &str) -> ApiError {
    let message = serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .and_then(|err| err.message.or(err.error))
        .filter(|message| !message.is_empty());

    ApiError::Server {
        status: status.as_u16(),
        message,
    }
}
