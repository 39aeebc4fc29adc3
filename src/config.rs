use std::fmt::{Debug, Display, Error as FmtError, Formatter};
use std::path::PathBuf;

use clap::ArgMatches;
use reqwest::Url;

use crate::apod_date::ApodDate;
use crate::error::{AppErr, ErrorKind};

pub const API_KEY_ENV: &str = "NASA_API_KEY";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApiKeySource {
    Argument,
    Environment,
}

impl Display for ApiKeySource {
    fn fmt(&self, f: &mut Formatter) -> Result<(), FmtError> {
        match *self {
            ApiKeySource::Argument => write!(f, "--api-key"),
            ApiKeySource::Environment => write!(f, "${}", API_KEY_ENV),
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey {
    value: String,
    source: ApiKeySource,
}

impl ApiKey {
    /// The command line wins over the environment. Blank values count as absent.
    pub fn resolve(argument: Option<&str>, environment: Option<&str>) -> Result<ApiKey, AppErr> {
        let non_blank = |v: Option<&str>| v.map(str::trim).filter(|v| !v.is_empty()).map(String::from);

        if let Some(value) = non_blank(argument) {
            return Ok(ApiKey { value, source: ApiKeySource::Argument });
        }
        if let Some(value) = non_blank(environment) {
            return Ok(ApiKey { value, source: ApiKeySource::Environment });
        }
        Err(AppErr::new(
            ErrorKind::Config,
            &format!("No API key given, pass --api-key or set {}", API_KEY_ENV),
        ))
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn source(&self) -> ApiKeySource {
        self.source
    }
}

impl Debug for ApiKey {
    fn fmt(&self, f: &mut Formatter) -> Result<(), FmtError> {
        write!(f, "ApiKey(<redacted> from {})", self.source)
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub endpoint: Url,
    pub api_key: ApiKey,
    pub date: Option<ApodDate>,
    pub prefer_hd: bool,
    pub output: PathBuf,
    pub set_wallpaper: bool,
}

impl Config {
    pub fn from_matches(matches: &ArgMatches) -> Result<Config, AppErr> {
        let env_key = std::env::var(API_KEY_ENV).ok();
        let api_key = ApiKey::resolve(
            matches.get_one::<String>("api-key").map(String::as_str),
            env_key.as_deref(),
        )?;

        let endpoint = matches
            .get_one::<String>("endpoint")
            .map(String::as_str)
            .unwrap_or(crate::apod::DEFAULT_ENDPOINT);
        let endpoint = Url::parse(endpoint)
            .map_err(|e| AppErr::with_source(ErrorKind::Config, "Invalid endpoint URL", e))?;

        let output = matches
            .get_one::<PathBuf>("output")
            .cloned()
            .unwrap_or_else(|| PathBuf::from(crate::DEFAULT_IMAGE_PATH));

        Ok(Config {
            endpoint,
            api_key,
            date: matches.get_one::<ApodDate>("date").copied(),
            prefer_hd: matches.get_flag("hd"),
            output,
            set_wallpaper: !matches.get_flag("download-only"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argument_beats_environment() {
        let key = ApiKey::resolve(Some("from-arg"), Some("from-env")).unwrap();
        assert_eq!(key.value(), "from-arg");
        assert_eq!(key.source(), ApiKeySource::Argument);
    }

    #[test]
    fn blank_argument_falls_back_to_environment() {
        let key = ApiKey::resolve(Some("  "), Some("from-env")).unwrap();
        assert_eq!(key.value(), "from-env");
        assert_eq!(key.source(), ApiKeySource::Environment);
    }

    #[test]
    fn missing_key_is_a_config_error() {
        let err = ApiKey::resolve(None, Some("")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn debug_output_hides_the_key() {
        let key = ApiKey::resolve(Some("s3cret"), None).unwrap();
        let printed = format!("{:?}", key);
        assert!(!printed.contains("s3cret"));
        assert!(printed.contains("--api-key"));
    }

    #[test]
    fn builds_from_command_line() {
        let matches = crate::cli::build_command()
            .try_get_matches_from(vec![
                "apod-wallpaper",
                "--api-key",
                "abc",
                "--date",
                "2020-01-01",
                "--hd",
                "-o",
                "out.jpg",
                "--download-only",
            ])
            .unwrap();
        let config = Config::from_matches(&matches).unwrap();
        assert_eq!(config.api_key.value(), "abc");
        assert_eq!(config.endpoint.as_str(), crate::apod::DEFAULT_ENDPOINT);
        assert_eq!(config.date.unwrap().to_string(), "2020-01-01");
        assert!(config.prefer_hd);
        assert_eq!(config.output, PathBuf::from("out.jpg"));
        assert!(!config.set_wallpaper);
    }

    #[test]
    fn defaults_write_the_picture_of_the_day() {
        let matches = crate::cli::build_command()
            .try_get_matches_from(vec!["apod-wallpaper", "--api-key", "abc"])
            .unwrap();
        let config = Config::from_matches(&matches).unwrap();
        assert_eq!(config.output, PathBuf::from("picture-of-the-day.jpg"));
        assert!(config.set_wallpaper);
        assert!(config.date.is_none());
    }
}
