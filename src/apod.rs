use std::io::Read;

use reqwest::Url;

use crate::config::Config;
use crate::error::{AppErr, ErrorKind};
use crate::transport::Transport;

pub const DEFAULT_ENDPOINT: &str = "https://api.nasa.gov/planetary/apod";

/// One day's entry as returned by the APOD API.
#[derive(Deserialize, Debug, Clone)]
pub struct ApodRecord {
    pub url: String,
    pub hdurl: Option<String>,
    pub title: Option<String>,
    pub date: Option<String>,
    pub media_type: Option<String>,
    pub copyright: Option<String>,
    pub explanation: Option<String>,
}

impl ApodRecord {
    /// Entries without a `media_type` are treated as images.
    pub fn is_image(&self) -> bool {
        match self.media_type {
            Some(ref m) => m == "image",
            None => true,
        }
    }

    pub fn image_url(&self, prefer_hd: bool) -> &str {
        match self.hdurl {
            Some(ref hd) if prefer_hd && !hd.is_empty() => hd,
            _ => &self.url,
        }
    }
}

pub fn request_url(config: &Config) -> Url {
    let mut url = config.endpoint.clone();
    {
        let mut query = url.query_pairs_mut();
        query.append_pair("api_key", config.api_key.value());
        if let Some(date) = config.date {
            query.append_pair("date", &date.to_string());
        }
    }
    url
}

pub fn fetch_metadata<T: Transport>(transport: &T, config: &Config) -> Result<ApodRecord, AppErr> {
    info!("Fetching picture of the day from {} (key from {})", config.endpoint, config.api_key.source());

    let response = transport.get(&request_url(config))?;

    if let Some(remaining) = response.rate_limit.remaining {
        debug!(
            "Rate limit: {} of {} requests remaining",
            remaining,
            response.rate_limit.limit.map_or_else(|| "?".to_string(), |l| l.to_string())
        );
    }

    if response.status != 200 {
        return Err(AppErr::bad_status(response.status));
    }

    let mut body = Vec::new();
    let mut reader = response.body;
    reader
        .read_to_end(&mut body)
        .map_err(|e| AppErr::with_source(ErrorKind::Transport, "Failed to read the API response", e))?;

    let record: ApodRecord = serde_json::from_slice(&body)?;

    if !record.is_image() {
        return Err(AppErr::new(
            ErrorKind::UnsupportedMedia,
            &format!(
                "Today's entry is a {} ({}), not an image",
                record.media_type.as_deref().unwrap_or("?"),
                record.url
            ),
        ));
    }

    info!(
        "Picture of the day for {}: {}",
        record.date.as_deref().unwrap_or("today"),
        record.title.as_deref().unwrap_or("(untitled)")
    );
    if let Some(ref copyright) = record.copyright {
        info!("Image credit: {}", copyright.trim());
    }
    if let Some(ref explanation) = record.explanation {
        debug!("{}", explanation);
    }

    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{test_config, FakeTransport, Reply};

    const ENDPOINT_WITH_KEY: &str = "https://api.test/apod?api_key=KEY";

    #[test]
    fn request_carries_key_and_date() {
        let mut config = test_config(std::path::Path::new("out.jpg"));
        assert_eq!(request_url(&config).as_str(), ENDPOINT_WITH_KEY);

        config.date = crate::apod_date::ApodDate::try_parse("2021-12-25");
        assert_eq!(
            request_url(&config).as_str(),
            "https://api.test/apod?api_key=KEY&date=2021-12-25"
        );
    }

    #[test]
    fn parses_a_valid_record() {
        let transport = FakeTransport::new().reply(
            ENDPOINT_WITH_KEY,
            Reply::ok(br#"{"url": "https://example.com/img.jpg", "title": "Pillars", "media_type": "image", "service_version": "v1"}"#),
        );
        let record = fetch_metadata(&transport, &test_config(std::path::Path::new("x"))).unwrap();
        assert_eq!(record.url, "https://example.com/img.jpg");
        assert_eq!(record.title.as_deref(), Some("Pillars"));
        assert_eq!(transport.requests(), vec![ENDPOINT_WITH_KEY.to_string()]);
    }

    #[test]
    fn bad_status_settles_without_reading_the_body() {
        let transport = FakeTransport::new().reply(ENDPOINT_WITH_KEY, Reply::broken(500, b"{\"url\":"));
        let err = fetch_metadata(&transport, &test_config(std::path::Path::new("x"))).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadStatus);
        assert!(err.to_string().contains("500"));
    }

    #[test]
    fn body_cut_short_is_a_transport_error() {
        let transport = FakeTransport::new().reply(ENDPOINT_WITH_KEY, Reply::broken(200, b"{\"url\":"));
        let err = fetch_metadata(&transport, &test_config(std::path::Path::new("x"))).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        for body in &[&b"not json"[..], &b"{\"title\": \"no url\"}"[..], &b""[..]] {
            let transport = FakeTransport::new().reply(ENDPOINT_WITH_KEY, Reply::ok(body));
            let err = fetch_metadata(&transport, &test_config(std::path::Path::new("x"))).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Parse);
        }
    }

    #[test]
    fn unreachable_endpoint_is_a_transport_error() {
        let transport = FakeTransport::new();
        let err = fetch_metadata(&transport, &test_config(std::path::Path::new("x"))).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
    }

    #[test]
    fn video_entries_are_rejected() {
        let transport = FakeTransport::new().reply(
            ENDPOINT_WITH_KEY,
            Reply::ok(br#"{"url": "https://www.youtube.com/embed/x", "media_type": "video"}"#),
        );
        let err = fetch_metadata(&transport, &test_config(std::path::Path::new("x"))).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedMedia);
    }

    #[test]
    fn hd_url_is_only_used_on_request() {
        let record: ApodRecord =
            serde_json::from_str(r#"{"url": "https://a.test/s.jpg", "hdurl": "https://a.test/l.jpg"}"#).unwrap();
        assert_eq!(record.image_url(false), "https://a.test/s.jpg");
        assert_eq!(record.image_url(true), "https://a.test/l.jpg");

        let record: ApodRecord = serde_json::from_str(r#"{"url": "https://a.test/s.jpg"}"#).unwrap();
        assert_eq!(record.image_url(true), "https://a.test/s.jpg");
    }
}
