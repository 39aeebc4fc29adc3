use std::path::Path;
use crate::error::{AppErr, ErrorKind};

fn os_err(what: &str, err: std::io::Error) -> AppErr {
    AppErr::with_source(ErrorKind::OsIntegration, what, err)
}

pub fn set_wallpaper(image_path: &Path) -> Result<(), AppErr> {
    // Registry flags control how the picture is stretched (6 = fit)
    info!("Setting Windows desktop wallpaper registry keys");

    use winreg::enums::{HKEY_CURRENT_USER, KEY_WRITE};
    use winreg::RegKey;

    let hkcu = RegKey::predef(HKEY_CURRENT_USER);
    let key_desktop = hkcu
        .open_subkey_with_flags("Control Panel\\Desktop", KEY_WRITE)
        .map_err(|e| os_err("Failed to open Control Panel\\Desktop", e))?;
    key_desktop
        .set_value("WallpaperStyle", &"6")
        .map_err(|e| os_err("Failed to set WallpaperStyle", e))?;
    key_desktop
        .set_value("TileWallpaper", &"0")
        .map_err(|e| os_err("Failed to set TileWallpaper", e))?;

    info!("Setting Windows desktop wallpaper");

    use winapi::um::winnt::PVOID;
    use winapi::um::winuser::{SystemParametersInfoW, SPIF_SENDWININICHANGE, SPIF_UPDATEINIFILE, SPI_SETDESKWALLPAPER};

    let wide_path = os_str_to_wchar(image_path.as_os_str());
    let ok = unsafe {
        SystemParametersInfoW(
            SPI_SETDESKWALLPAPER,
            0,
            wide_path.as_ptr() as PVOID,
            SPIF_UPDATEINIFILE | SPIF_SENDWININICHANGE,
        )
    };
    if ok == 0 {
        return Err(os_err("SystemParametersInfoW failed", std::io::Error::last_os_error()));
    }

    Ok(())
}

fn os_str_to_wchar(oss: &std::ffi::OsStr) -> Vec<u16> {
    use std::iter::once;
    use std::os::windows::ffi::OsStrExt;
    // NUL-terminated unicode string
    oss.encode_wide().chain(once(0)).collect()
}
