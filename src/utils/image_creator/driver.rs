//! I/O capabilities the protocol runs on.
//!
//! The protocol in [`super::protocol`] never touches a socket, a timer or the
//! filesystem directly. It asks a [`Driver`] instead, so the same logic serves
//! both the tokio client and the blocking client.

use std::ffi::OsString;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::LOCATION;
use reqwest::redirect::Policy;
use reqwest::{Method, StatusCode};

use super::error::ImageCreatorResult;
use super::session::{Credentials, SessionConfig};

/// A request as the protocol describes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: Method,
    pub url: String,
    /// Url-encoded form body, if any.
    pub form: Option<String>,
}

impl Request {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            url: url.into(),
            form: None,
        }
    }

    pub fn post(url: impl Into<String>, form: Option<String>) -> Self {
        Self {
            method: Method::POST,
            url: url.into(),
            form,
        }
    }
}

/// The parts of a response the protocol inspects.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: StatusCode,
    pub location: Option<String>,
    pub body: Bytes,
}

impl Response {
    pub fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            location: None,
            body: body.into(),
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Body decoded as text, replacing invalid UTF-8.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Network, timer and file capabilities for one execution mode.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Driver: Send + Sync {
    /// Performs one request without following redirects.
    async fn send(&self, request: Request) -> ImageCreatorResult<Response>;

    /// Waits between polls.
    async fn sleep(&self, duration: Duration);

    /// Creates `dir` if it is missing and lists the names of its entries.
    async fn scan_dir(&self, dir: &Path) -> std::io::Result<Vec<OsString>>;

    /// Writes a downloaded image to disk.
    async fn write_file(&self, path: &Path, contents: &[u8]) -> std::io::Result<()>;
}

fn extract_location(headers: &reqwest::header::HeaderMap) -> Option<String> {
    headers
        .get(LOCATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
}

/// Cooperative driver backed by `reqwest::Client` and the tokio timer.
#[derive(Clone)]
pub struct AsyncDriver {
    client: reqwest::Client,
}

impl AsyncDriver {
    pub fn new(config: &SessionConfig, credentials: &Credentials) -> ImageCreatorResult<Self> {
        let client = reqwest::Client::builder()
            .default_headers(config.headers()?)
            .cookie_provider(config.cookie_jar(credentials)?)
            .redirect(Policy::none())
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Driver for AsyncDriver {
    async fn send(&self, request: Request) -> ImageCreatorResult<Response> {
        let mut builder = self.client.request(request.method, request.url.as_str());
        if let Some(form) = request.form {
            builder = builder.body(form);
        }

        let response = builder.send().await?;
        let status = response.status();
        let location = extract_location(response.headers());
        let body = response.bytes().await?;

        Ok(Response {
            status,
            location,
            body,
        })
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }

    async fn scan_dir(&self, dir: &Path) -> std::io::Result<Vec<OsString>> {
        tokio::fs::create_dir_all(dir).await?;
        let mut entries = tokio::fs::read_dir(dir).await?;
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            names.push(entry.file_name());
        }
        Ok(names)
    }

    async fn write_file(&self, path: &Path, contents: &[u8]) -> std::io::Result<()> {
        tokio::fs::write(path, contents).await
    }
}

/// Thread-blocking driver backed by `reqwest::blocking::Client`.
///
/// Must not be used from inside an async runtime.
#[cfg(feature = "blocking")]
#[derive(Clone)]
pub struct BlockingDriver {
    client: reqwest::blocking::Client,
}

#[cfg(feature = "blocking")]
impl BlockingDriver {
    pub fn new(config: &SessionConfig, credentials: &Credentials) -> ImageCreatorResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .default_headers(config.headers()?)
            .cookie_provider(config.cookie_jar(credentials)?)
            .redirect(Policy::none())
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self { client })
    }
}

#[cfg(feature = "blocking")]
#[async_trait]
impl Driver for BlockingDriver {
    async fn send(&self, request: Request) -> ImageCreatorResult<Response> {
        let mut builder = self.client.request(request.method, request.url.as_str());
        if let Some(form) = request.form {
            builder = builder.body(form);
        }

        let response = builder.send()?;
        let status = response.status();
        let location = extract_location(response.headers());
        let body = response.bytes()?;

        Ok(Response {
            status,
            location,
            body,
        })
    }

    async fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }

    async fn scan_dir(&self, dir: &Path) -> std::io::Result<Vec<OsString>> {
        std::fs::create_dir_all(dir)?;
        std::fs::read_dir(dir)?
            .map(|entry| entry.map(|entry| entry.file_name()))
            .collect()
    }

    async fn write_file(&self, path: &Path, contents: &[u8]) -> std::io::Result<()> {
        std::fs::write(path, contents)
    }
}
