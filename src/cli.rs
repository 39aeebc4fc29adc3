use std::path::PathBuf;

use clap::{value_parser, Arg, ArgAction, Command};

use crate::apod_date::ApodDateValueParser;

pub fn build_command() -> Command {
    Command::new("apod-wallpaper")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Sets NASA's Astronomy Picture of the Day as the desktop wallpaper")
        .arg(
            Arg::new("api-key")
                .long("api-key")
                .value_name("KEY")
                .help("api.nasa.gov key (defaults to $NASA_API_KEY)"),
        )
        .arg(
            Arg::new("date")
                .long("date")
                .value_name("YYYY-MM-DD")
                .value_parser(ApodDateValueParser)
                .help("Fetch the picture for a specific day instead of today"),
        )
        .arg(
            Arg::new("hd")
                .long("hd")
                .action(ArgAction::SetTrue)
                .help("Download the high resolution image when one is available"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("PATH")
                .value_parser(value_parser!(PathBuf))
                .default_value(crate::DEFAULT_IMAGE_PATH)
                .help("Where to save the image (overwritten on every run)"),
        )
        .arg(
            Arg::new("download-only")
                .long("download-only")
                .action(ArgAction::SetTrue)
                .help("Save the image without changing the wallpaper"),
        )
        .arg(
            Arg::new("probe")
                .long("probe")
                .action(ArgAction::SetTrue)
                .help("Print the wallpaper backend that would be used and exit"),
        )
        .arg(
            Arg::new("endpoint")
                .long("endpoint")
                .value_name("URL")
                .hide(true),
        )
        .arg(
            Arg::new("log-file")
                .long("log-file")
                .value_name("PATH")
                .value_parser(value_parser!(PathBuf))
                .help("Write log output to a file instead of stderr"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .help("Increase log verbosity (-v info, -vv debug)"),
        )
}
