//! The three stages of a run, strictly in order:
//! fetch metadata, download the image, set the wallpaper.

use std::fmt::{Display, Error as FmtError, Formatter};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::apod::{self, ApodRecord};
use crate::config::Config;
use crate::download;
use crate::error::{AppErr, ErrorKind};
use crate::transport::Transport;
use crate::wallpaper::WallpaperSetter;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    FetchingMetadata,
    DownloadingImage,
    SettingWallpaper,
}

impl Display for Stage {
    fn fmt(&self, f: &mut Formatter) -> Result<(), FmtError> {
        let s = match *self {
            Stage::FetchingMetadata => "fetching the picture of the day",
            Stage::DownloadingImage => "downloading the image",
            Stage::SettingWallpaper => "setting the desktop background",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug)]
pub struct StageFailure {
    pub stage: Stage,
    pub error: AppErr,
}

impl StageFailure {
    fn at(stage: Stage) -> impl FnOnce(AppErr) -> StageFailure {
        move |error| StageFailure { stage, error }
    }

    pub fn exit_code(&self) -> u8 {
        match (self.stage, self.error.kind()) {
            (_, ErrorKind::Config) => 2,
            (Stage::FetchingMetadata, ErrorKind::BadStatus) => 10,
            (Stage::FetchingMetadata, ErrorKind::Parse) => 11,
            (Stage::FetchingMetadata, ErrorKind::Transport) => 12,
            (Stage::FetchingMetadata, ErrorKind::UnsupportedMedia) => 13,
            (Stage::DownloadingImage, ErrorKind::BadStatus) => 20,
            (Stage::DownloadingImage, ErrorKind::Transport) => 21,
            (Stage::DownloadingImage, ErrorKind::Parse) => 22,
            (Stage::DownloadingImage, ErrorKind::Io) => 23,
            (Stage::SettingWallpaper, _) => 30,
            _ => 1,
        }
    }
}

impl Display for StageFailure {
    fn fmt(&self, f: &mut Formatter) -> Result<(), FmtError> {
        write!(f, "An error occurred while {}. {}", self.stage, self.error)
    }
}

pub struct Outcome {
    pub record: ApodRecord,
    pub image_path: PathBuf,
    pub bytes: u64,
    pub wallpaper_set: bool,
}

fn say(out: &mut dyn Write, line: &str) {
    if let Err(e) = writeln!(out, "{}", line) {
        warn!("Could not write to the console: {}", e);
    }
}

/// Drops the `\\?\` prefix `canonicalize` adds on Windows; user32 does not
/// accept verbatim paths.
fn strip_verbatim(path: &str) -> Option<String> {
    let rest = path.strip_prefix(r"\\?\")?;
    if let Some(unc) = rest.strip_prefix(r"UNC\") {
        return Some(format!(r"\\{}", unc));
    }
    let bytes = rest.as_bytes();
    if bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' {
        return Some(rest.to_string());
    }
    None
}

fn absolute_image_path(path: &Path) -> std::io::Result<PathBuf> {
    let path = path.canonicalize()?;
    if cfg!(windows) {
        if let Some(plain) = path.to_str().and_then(strip_verbatim) {
            return Ok(PathBuf::from(plain));
        }
    }
    Ok(path)
}

pub fn run<T, W>(transport: &T, setter: &W, config: &Config, out: &mut dyn Write) -> Result<Outcome, StageFailure>
where
    T: Transport,
    W: WallpaperSetter + ?Sized,
{
    info!("Stage: {}", Stage::FetchingMetadata);
    let record = apod::fetch_metadata(transport, config).map_err(StageFailure::at(Stage::FetchingMetadata))?;

    info!("Stage: {}", Stage::DownloadingImage);
    let image_url = record.image_url(config.prefer_hd);
    let bytes = download::download_image(transport, image_url, &config.output)
        .map_err(StageFailure::at(Stage::DownloadingImage))?;
    say(out, "The image was successfully downloaded.");

    if !config.set_wallpaper {
        info!("Leaving the wallpaper unchanged");
        return Ok(Outcome { record, image_path: config.output.clone(), bytes, wallpaper_set: false });
    }

    info!("Stage: {}", Stage::SettingWallpaper);
    let image_path = absolute_image_path(&config.output).map_err(|e| StageFailure {
        stage: Stage::SettingWallpaper,
        error: AppErr::with_source(
            ErrorKind::OsIntegration,
            &format!("Cannot resolve {}", config.output.display()),
            e,
        ),
    })?;
    setter
        .set_wallpaper(&image_path)
        .map_err(StageFailure::at(Stage::SettingWallpaper))?;
    say(out, "The image was set as the desktop background.");

    Ok(Outcome { record, image_path, bytes, wallpaper_set: true })
}
