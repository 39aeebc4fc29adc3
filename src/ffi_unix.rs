use std::path::Path;
use std::process::Command;

use reqwest::Url;

use crate::error::{AppErr, ErrorKind};

fn path_str(image_path: &Path) -> Result<&str, AppErr> {
    image_path
        .to_str()
        .ok_or_else(|| AppErr::new(ErrorKind::OsIntegration, "Image path is not valid UTF-8"))
}

fn file_uri(image_path: &Path) -> Result<String, AppErr> {
    Url::from_file_path(image_path)
        .map(|url| url.to_string())
        .map_err(|_| {
            AppErr::new(
                ErrorKind::OsIntegration,
                &format!("{} is not an absolute path", image_path.display()),
            )
        })
}

/// Escapes `s` for use inside a script string literal delimited by `quote`.
fn quote_escape(s: &str, quote: char) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if c == '\\' || c == quote {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn kde_script(uri: &str) -> String {
    format!(
        "var allDesktops = desktops();\n\
         for (var i = 0; i < allDesktops.length; i++) {{\n\
           var d = allDesktops[i];\n\
           d.wallpaperPlugin = 'org.kde.image';\n\
           d.currentConfigGroup = ['Wallpaper', 'org.kde.image', 'General'];\n\
           d.writeConfig('Image', '{}');\n\
         }}\n",
        quote_escape(uri, '\'')
    )
}

fn macos_script(path: &str) -> String {
    format!(
        "tell application \"Finder\" to set desktop picture to POSIX file \"{}\"",
        quote_escape(path, '"')
    )
}

fn run(command: &mut Command, what: &str) -> Result<(), AppErr> {
    debug!("Running {:?}", command);
    let output = command.output().map_err(|e| {
        AppErr::with_source(ErrorKind::OsIntegration, &format!("Failed to run {}", what), e)
    })?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(AppErr::new(
            ErrorKind::OsIntegration,
            &format!("{} failed ({}): {}", what, output.status, stderr.trim()),
        ));
    }
    Ok(())
}

pub fn set_gnome(image_path: &Path) -> Result<(), AppErr> {
    info!("Setting GNOME desktop wallpaper");
    let uri = file_uri(image_path)?;
    run(
        Command::new("gsettings").args(&["set", "org.gnome.desktop.background", "picture-uri", &uri]),
        "gsettings (picture-uri)",
    )?;

    // GNOME 42+ keeps a separate key for the dark style; older versions reject it.
    if let Err(e) = run(
        Command::new("gsettings").args(&["set", "org.gnome.desktop.background", "picture-uri-dark", &uri]),
        "gsettings (picture-uri-dark)",
    ) {
        debug!("{}", e);
    }
    Ok(())
}

fn find_qdbus() -> Option<&'static str> {
    // Plasma 6 ships qdbus6, Plasma 5 ships qdbus.
    ["qdbus6", "qdbus"]
        .iter()
        .copied()
        .find(|exe| Command::new(exe).arg("--version").output().is_ok())
}

pub fn set_kde(image_path: &Path) -> Result<(), AppErr> {
    info!("Setting KDE Plasma desktop wallpaper");
    let qdbus = find_qdbus()
        .ok_or_else(|| AppErr::new(ErrorKind::OsIntegration, "qdbus not found (qdbus6/qdbus)"))?;
    let script = kde_script(&file_uri(image_path)?);

    run(
        Command::new(qdbus).args(&[
            "org.kde.plasmashell",
            "/PlasmaShell",
            "org.kde.PlasmaShell.evaluateScript",
            &script,
        ]),
        "qdbus PlasmaShell.evaluateScript",
    )
}

pub fn set_sway(image_path: &Path) -> Result<(), AppErr> {
    info!("Setting sway output background");
    let path = path_str(image_path)?;
    run(
        Command::new("swaymsg").args(&["output", "*", "bg", path, "fill"]),
        "swaymsg",
    )
}

pub fn set_feh(image_path: &Path) -> Result<(), AppErr> {
    info!("Setting X11 root window background with feh");
    run(Command::new("feh").arg("--bg-fill").arg(image_path), "feh")
}

pub fn set_macos(image_path: &Path) -> Result<(), AppErr> {
    info!("Setting macOS desktop picture");
    let script = macos_script(path_str(image_path)?);
    run(Command::new("osascript").arg("-e").arg(&script), "osascript")
}
