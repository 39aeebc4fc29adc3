//! Desktop wallpaper integration.
//!
//! The platform specific work lives in `ffi_windows` and `ffi_unix`; this
//! module picks a backend and exposes it behind [`WallpaperSetter`].

use std::fmt::{Display, Error as FmtError, Formatter};
use std::path::Path;

use crate::error::{AppErr, ErrorKind};

pub trait WallpaperSetter {
    /// `image_path` must point at a complete file.
    fn set_wallpaper(&self, image_path: &Path) -> Result<(), AppErr>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Backend {
    Windows,
    MacOs,
    Gnome,
    Kde,
    Sway,
    Feh,
}

impl Display for Backend {
    fn fmt(&self, f: &mut Formatter) -> Result<(), FmtError> {
        let s = match *self {
            Backend::Windows => "windows (SystemParametersInfoW)",
            Backend::MacOs => "macos (osascript)",
            Backend::Gnome => "gnome (gsettings)",
            Backend::Kde => "kde (qdbus PlasmaShell)",
            Backend::Sway => "sway (swaymsg)",
            Backend::Feh => "x11 (feh)",
        };
        write!(f, "{}", s)
    }
}

/// Works out the backend for the running session. `var` looks up an
/// environment variable.
pub fn detect_backend<F>(var: F) -> Option<Backend>
where
    F: Fn(&str) -> Option<String>,
{
    if cfg!(windows) {
        return Some(Backend::Windows);
    }
    if cfg!(target_os = "macos") {
        return Some(Backend::MacOs);
    }

    let set = |name: &str| var(name).map_or(false, |v| !v.trim().is_empty());

    let desktops = var("XDG_CURRENT_DESKTOP")
        .or_else(|| var("DESKTOP_SESSION"))
        .unwrap_or_default()
        .to_lowercase();
    for desktop in desktops.split(':').map(|d| d.trim()) {
        match desktop {
            "gnome" | "ubuntu" | "unity" | "cinnamon" | "x-cinnamon" | "budgie" | "pantheon" => {
                return Some(Backend::Gnome)
            }
            "kde" | "plasma" => return Some(Backend::Kde),
            "sway" => return Some(Backend::Sway),
            _ => {}
        }
    }

    if set("SWAYSOCK") {
        return Some(Backend::Sway);
    }
    if set("DISPLAY") && !set("WAYLAND_DISPLAY") {
        return Some(Backend::Feh);
    }
    None
}

/// The backend is detected once, up front; a session without one only fails
/// when the wallpaper is actually set.
pub struct SystemWallpaper {
    backend: Option<Backend>,
}

impl SystemWallpaper {
    pub fn detect() -> SystemWallpaper {
        let backend = detect_backend(|name| std::env::var(name).ok());
        match backend {
            Some(b) => debug!("Detected wallpaper backend: {}", b),
            None => debug!("No wallpaper backend detected"),
        }
        SystemWallpaper { backend }
    }

    pub fn backend(&self) -> Option<Backend> {
        self.backend
    }
}

fn no_backend() -> AppErr {
    AppErr::new(ErrorKind::OsIntegration, "No supported desktop environment detected")
}

impl WallpaperSetter for SystemWallpaper {
    #[cfg(windows)]
    fn set_wallpaper(&self, image_path: &Path) -> Result<(), AppErr> {
        match self.backend {
            Some(_) => crate::ffi_windows::set_wallpaper(image_path),
            None => Err(no_backend()),
        }
    }

    #[cfg(not(windows))]
    fn set_wallpaper(&self, image_path: &Path) -> Result<(), AppErr> {
        use crate::ffi_unix;
        let backend = self.backend.ok_or_else(no_backend)?;
        info!("Using wallpaper backend: {}", backend);
        match backend {
            Backend::MacOs => ffi_unix::set_macos(image_path),
            Backend::Gnome => ffi_unix::set_gnome(image_path),
            Backend::Kde => ffi_unix::set_kde(image_path),
            Backend::Sway => ffi_unix::set_sway(image_path),
            Backend::Feh => ffi_unix::set_feh(image_path),
            Backend::Windows => Err(AppErr::new(
                ErrorKind::OsIntegration,
                "Windows backend is not available on this platform",
            )),
        }
    }
}
