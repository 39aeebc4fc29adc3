extern crate reqwest;
#[macro_use]
extern crate serde_derive;
extern crate serde;
extern crate serde_json;
extern crate chrono;
#[macro_use]
extern crate log;

mod apod;
mod apod_date;
mod cli;
mod config;
mod download;
mod error;
#[cfg(not(windows))]
mod ffi_unix;
#[cfg(windows)]
mod ffi_windows;
mod pipeline;
#[cfg(test)]
mod test_support;
mod transport;
mod wallpaper;

use std::path::PathBuf;
use std::process::ExitCode;

use log::LevelFilter;

use crate::config::Config;
use crate::transport::ReqwestTransport;
use crate::wallpaper::SystemWallpaper;

pub const DEFAULT_IMAGE_PATH: &str = "picture-of-the-day.jpg";

const EXIT_CONFIG: u8 = 2;
const EXIT_NO_BACKEND: u8 = 30;

fn main() -> ExitCode {
    let matches = cli::build_command().get_matches();

    let level = match matches.get_count("verbose") {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    match matches.get_one::<PathBuf>("log-file") {
        Some(path) => {
            if let Err(e) = simple_logging::log_to_file(path, level) {
                eprintln!("Cannot open log file {}: {}", path.display(), e);
                return ExitCode::from(EXIT_CONFIG);
            }
        }
        None => simple_logging::log_to_stderr(level),
    }

    let setter = SystemWallpaper::detect();

    if matches.get_flag("probe") {
        return probe(&setter);
    }

    let config = match Config::from_matches(&matches) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::from(EXIT_CONFIG);
        }
    };
    debug!("{:?}", config);

    let transport = match ReqwestTransport::new() {
        Ok(transport) => transport,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let stdout = std::io::stdout();
    match pipeline::run(&transport, &setter, &config, &mut stdout.lock()) {
        Ok(outcome) => {
            info!(
                "Done: {} ({} bytes, wallpaper {})",
                outcome.image_path.display(),
                outcome.bytes,
                if outcome.wallpaper_set { "set" } else { "unchanged" }
            );
            if let Some(ref title) = outcome.record.title {
                info!("Today's picture: {}", title);
            }
            ExitCode::SUCCESS
        }
        Err(failure) => {
            debug!("{:?}", failure);
            eprintln!("{}", failure);
            ExitCode::from(failure.exit_code())
        }
    }
}

/// Reports the wallpaper backend without touching the network or disk.
fn probe(setter: &SystemWallpaper) -> ExitCode {
    match setter.backend() {
        Some(backend) => {
            println!("Wallpaper backend: {}", backend);
            ExitCode::SUCCESS
        }
        None => {
            eprintln!("No supported desktop environment detected");
            ExitCode::from(EXIT_NO_BACKEND)
        }
    }
}
