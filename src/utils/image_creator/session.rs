//! Session context shared by both clients: credentials, static headers and
//! the cookie jar handed to the HTTP client.

use std::fmt;
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Url;
use reqwest::cookie::Jar;
use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};

use super::error::{ImageCreatorError, ImageCreatorResult};

pub const DEFAULT_BASE_URL: &str = "https://www.bing.com";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(200);
pub const DEFAULT_POLL_BUDGET: Duration = Duration::from_secs(200);
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Name of the primary authentication cookie.
pub const AUTH_COOKIE: &str = "_U";
/// Name of the secondary session cookie.
pub const SESSION_COOKIE: &str = "SRCHHPGUSR";

const ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.7";
const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/110.0.0.0 Safari/537.36 Edg/110.0.1587.63";

/// A single cookie name/value pair.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cookie {
    pub name: String,
    pub value: String,
}

impl Cookie {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

// Cookie values are secrets; keep them out of logs.
impl fmt::Debug for Cookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cookie")
            .field("name", &self.name)
            .field("value", &"<redacted>")
            .finish()
    }
}

/// Cookies identifying the browser session the service is driven through.
#[derive(Clone, Debug)]
pub struct Credentials {
    auth: Cookie,
    session: Cookie,
    extra: Vec<Cookie>,
}

impl Credentials {
    /// Builds credentials from the two required cookie values.
    ///
    /// # Errors
    ///
    /// Returns [`ImageCreatorError::MissingCredentials`] if either value is blank.
    pub fn new(
        auth_token: impl Into<String>,
        session_token: impl Into<String>,
    ) -> ImageCreatorResult<Self> {
        let auth_token = auth_token.into();
        let session_token = session_token.into();

        if auth_token.trim().is_empty() {
            return Err(ImageCreatorError::MissingCredentials { name: AUTH_COOKIE });
        }
        if session_token.trim().is_empty() {
            return Err(ImageCreatorError::MissingCredentials {
                name: SESSION_COOKIE,
            });
        }

        Ok(Self {
            auth: Cookie::new(AUTH_COOKIE, auth_token),
            session: Cookie::new(SESSION_COOKIE, session_token),
            extra: Vec::new(),
        })
    }

    /// Attaches arbitrary extra cookies, e.g. a full export from a browser.
    pub fn with_extra_cookies(mut self, cookies: impl IntoIterator<Item = Cookie>) -> Self {
        self.extra.extend(cookies);
        self
    }

    /// All cookies in the order they are installed in the jar.
    pub fn cookies(&self) -> impl Iterator<Item = &Cookie> {
        [&self.auth, &self.session].into_iter().chain(self.extra.iter())
    }
}

/// Spoofed `x-forwarded-for` address inside 13.104.0.0/14.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ForwardedIp(Ipv4Addr);

impl ForwardedIp {
    pub fn random() -> Self {
        Self(Ipv4Addr::new(
            13,
            rand::random_range(104..=107),
            rand::random_range(0..=255),
            rand::random_range(0..=255),
        ))
    }

    pub fn addr(&self) -> Ipv4Addr {
        self.0
    }
}

impl fmt::Display for ForwardedIp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Tunables for one session. The forwarded IP is chosen when the config is
/// built and stays fixed for every request made with it.
#[derive(Clone, Debug)]
pub struct SessionConfig {
    pub base_url: String,
    pub request_timeout: Duration,
    pub poll_budget: Duration,
    pub poll_interval: Duration,
    pub forwarded_ip: ForwardedIp,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            poll_budget: DEFAULT_POLL_BUDGET,
            poll_interval: DEFAULT_POLL_INTERVAL,
            forwarded_ip: ForwardedIp::random(),
        }
    }
}

impl SessionConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_poll_budget(mut self, budget: Duration) -> Self {
        self.poll_budget = budget;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Builds the static header bundle sent with every request.
    pub fn headers(&self) -> ImageCreatorResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static(ACCEPT));
        headers.insert(
            header::ACCEPT_LANGUAGE,
            HeaderValue::from_static(ACCEPT_LANGUAGE),
        );
        headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("max-age=0"));
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/x-www-form-urlencoded"),
        );
        headers.insert(header::USER_AGENT, HeaderValue::from_static(USER_AGENT));
        headers.insert(header::ORIGIN, header_value(&self.base_url)?);
        headers.insert(
            HeaderName::from_static("referrer"),
            header_value(&format!("{}/images/create/", self.base_url))?,
        );
        headers.insert(
            HeaderName::from_static("x-forwarded-for"),
            header_value(&self.forwarded_ip.to_string())?,
        );
        Ok(headers)
    }

    /// Fills a cookie jar with the credentials, scoped to the service host.
    pub fn cookie_jar(&self, credentials: &Credentials) -> ImageCreatorResult<Arc<Jar>> {
        let url = Url::parse(&self.base_url)?;
        let jar = Jar::default();
        for cookie in credentials.cookies() {
            jar.add_cookie_str(&format!("{}={}", cookie.name, cookie.value), &url);
        }
        Ok(Arc::new(jar))
    }
}

fn header_value(value: &str) -> ImageCreatorResult<HeaderValue> {
    Ok(HeaderValue::from_str(value)?)
}
