//! In-memory doubles for the HTTP and wallpaper seams.

use std::cell::RefCell;
use std::collections::HashMap;
use std::io::{self, Cursor, Read};
use std::path::{Path, PathBuf};

use reqwest::Url;

use crate::config::{ApiKey, Config};
use crate::error::{AppErr, ErrorKind};
use crate::transport::{HttpResponse, RateLimit, Transport};
use crate::wallpaper::WallpaperSetter;

pub fn test_config(output: &Path) -> Config {
    Config {
        endpoint: Url::parse("https://api.test/apod").unwrap(),
        api_key: ApiKey::resolve(Some("KEY"), None).unwrap(),
        date: None,
        prefer_hd: false,
        output: output.to_path_buf(),
        set_wallpaper: true,
    }
}

#[derive(Clone)]
pub struct Reply {
    status: u16,
    body: Vec<u8>,
    // The connection drops after `body` has been read.
    broken: bool,
}

impl Reply {
    pub fn ok(body: &[u8]) -> Reply {
        Reply::status(200, body)
    }

    pub fn status(status: u16, body: &[u8]) -> Reply {
        Reply { status, body: body.to_vec(), broken: false }
    }

    pub fn broken(status: u16, body: &[u8]) -> Reply {
        Reply { status, body: body.to_vec(), broken: true }
    }
}

struct BrokenBody(Cursor<Vec<u8>>);

impl Read for BrokenBody {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.0.read(buf)? {
            0 => Err(io::Error::new(io::ErrorKind::ConnectionReset, "connection reset by peer")),
            n => Ok(n),
        }
    }
}

/// Serves canned replies by exact URL; anything else fails like an
/// unreachable host.
#[derive(Default)]
pub struct FakeTransport {
    replies: HashMap<String, Reply>,
    requests: RefCell<Vec<String>>,
}

impl FakeTransport {
    pub fn new() -> FakeTransport {
        FakeTransport::default()
    }

    pub fn reply(mut self, url: &str, reply: Reply) -> FakeTransport {
        self.replies.insert(url.to_string(), reply);
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }
}

impl Transport for FakeTransport {
    type Body = Box<dyn Read>;

    fn get(&self, url: &Url) -> Result<HttpResponse<Self::Body>, AppErr> {
        self.requests.borrow_mut().push(url.to_string());
        let reply = self.replies.get(url.as_str()).cloned().ok_or_else(|| {
            AppErr::new(ErrorKind::Transport, &format!("dns error: no such host for {}", url))
        })?;
        let body: Box<dyn Read> = if reply.broken {
            Box::new(BrokenBody(Cursor::new(reply.body)))
        } else {
            Box::new(Cursor::new(reply.body))
        };
        Ok(HttpResponse {
            status: reply.status,
            rate_limit: RateLimit { limit: Some(2000), remaining: Some(1999) },
            body,
        })
    }
}

/// Records every call along with what was on disk at that moment.
#[derive(Default)]
pub struct RecordingSetter {
    calls: RefCell<Vec<(PathBuf, Option<Vec<u8>>)>>,
    fail: bool,
}

impl RecordingSetter {
    pub fn new() -> RecordingSetter {
        RecordingSetter::default()
    }

    pub fn failing() -> RecordingSetter {
        RecordingSetter { fail: true, ..RecordingSetter::default() }
    }

    pub fn calls(&self) -> Vec<(PathBuf, Option<Vec<u8>>)> {
        self.calls.borrow().clone()
    }
}

impl WallpaperSetter for RecordingSetter {
    fn set_wallpaper(&self, image_path: &Path) -> Result<(), AppErr> {
        let contents = std::fs::read(image_path).ok();
        self.calls.borrow_mut().push((image_path.to_path_buf(), contents));
        if self.fail {
            return Err(AppErr::new(ErrorKind::OsIntegration, "gsettings failed (exit status: 1)"));
        }
        Ok(())
    }
}
