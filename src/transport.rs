//! HTTP access for the fetch and download stages.

use std::io::Read;

use reqwest::header::HeaderMap;
use reqwest::Url;

use crate::error::AppErr;

/// Quota information NASA attaches to API responses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RateLimit {
    pub limit: Option<u32>,
    pub remaining: Option<u32>,
}

impl RateLimit {
    pub fn from_headers(headers: &HeaderMap) -> RateLimit {
        let read = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u32>().ok())
        };
        RateLimit {
            limit: read("x-ratelimit-limit"),
            remaining: read("x-ratelimit-remaining"),
        }
    }
}

pub struct HttpResponse<B> {
    pub status: u16,
    pub rate_limit: RateLimit,
    pub body: B,
}

impl<B> HttpResponse<B> {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A single GET, with the body left unread so callers can stream it.
pub trait Transport {
    type Body: Read;

    fn get(&self, url: &Url) -> Result<HttpResponse<Self::Body>, AppErr>;
}

pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<ReqwestTransport, AppErr> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("apod-wallpaper/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(ReqwestTransport { client })
    }
}

/// `url` without its query string, which carries the API key.
pub fn redacted(url: &Url) -> Url {
    let mut url = url.clone();
    url.set_query(None);
    url
}

/// Response body whose read errors no longer mention the request URL.
pub struct ResponseBody(reqwest::blocking::Response);

impl Read for ResponseBody {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.0.read(buf).map_err(strip_url)
    }
}

fn strip_url(err: std::io::Error) -> std::io::Error {
    let kind = err.kind();
    if !err.get_ref().map_or(false, |inner| inner.is::<reqwest::Error>()) {
        return err;
    }
    match err.into_inner().map(|inner| inner.downcast::<reqwest::Error>()) {
        Some(Ok(e)) => std::io::Error::new(kind, (*e).without_url()),
        Some(Err(inner)) => std::io::Error::new(kind, inner),
        None => std::io::Error::from(kind),
    }
}

impl Transport for ReqwestTransport {
    type Body = ResponseBody;

    fn get(&self, url: &Url) -> Result<HttpResponse<Self::Body>, AppErr> {
        debug!("GET {}", redacted(url));
        let response = self
            .client
            .get(url.clone())
            .send()
            .map_err(|e| AppErr::from(e.without_url()))?;
        Ok(HttpResponse {
            status: response.status().as_u16(),
            rate_limit: RateLimit::from_headers(response.headers()),
            body: ResponseBody(response),
        })
    }
}
