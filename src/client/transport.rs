//! HTTP transport used by [`DruidClient`](super::DruidClient).

use async_trait::async_trait;
use serde_json::Value;

use crate::config::Settings;
use crate::error::{DruidError, DruidResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Delete => "DELETE",
        }
    }
}

/// A request to one of the cluster's HTTP endpoints.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub body: Option<Value>,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            body: None,
        }
    }

    pub fn post(url: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::Post,
            url: url.into(),
            body: Some(body),
        }
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self {
            method: Method::Delete,
            url: url.into(),
            body: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends one request and returns the raw response.
///
/// Implementations report failures that happen before a response arrives
/// as `DruidError::Transport`; any HTTP status is a successful send.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &HttpRequest) -> DruidResult<HttpResponse>;
}

/// [`Transport`] backed by `reqwest`.
pub struct ReqwestTransport {
    client: reqwest::Client,
    auth: Option<(String, String)>,
}

impl ReqwestTransport {
    pub fn new(settings: &Settings) -> DruidResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout())
            .connect_timeout(settings.connect_timeout())
            .build()
            .map_err(|e| DruidError::Transport {
                message: format!("failed to build http client: {}", e),
                retriable: false,
            })?;
        let auth = match &settings.auth {
            Some(auth) => {
                let password = auth
                    .resolved_password()
                    .map_err(|e| DruidError::InvalidArgument(e.to_string()))?;
                Some((auth.username.clone(), password))
            }
            None => None,
        };
        Ok(Self { client, auth })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &HttpRequest) -> DruidResult<HttpResponse> {
        let mut builder = match request.method {
            Method::Get => self.client.get(&request.url),
            Method::Post => self.client.post(&request.url),
            Method::Delete => self.client.delete(&request.url),
        };
        if let Some((username, password)) = &self.auth {
            builder = builder.basic_auth(username, Some(password));
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(transport_error)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(transport_error)?;
        Ok(HttpResponse { status, body })
    }
}

fn transport_error(error: reqwest::Error) -> DruidError {
    DruidError::Transport {
        retriable: error.is_connect() || error.is_timeout(),
        message: error.to_string(),
    }
}
