use std::io::{Read, Write};
use std::path::Path;

use reqwest::Url;
use tempfile::NamedTempFile;

use crate::error::{AppErr, ErrorKind};
use crate::transport::Transport;

/// Streams `url` into `dest`, returning the number of bytes written.
///
/// The body goes to a temporary file next to `dest` which is only renamed
/// over `dest` once everything has been written. On failure the temporary
/// file is dropped (and deleted) and `dest` is left as it was.
pub fn download_image<T: Transport>(transport: &T, url: &str, dest: &Path) -> Result<u64, AppErr> {
    let url = Url::parse(url)
        .map_err(|e| AppErr::with_source(ErrorKind::Parse, &format!("Invalid image URL {:?}", url), e))?;

    info!("Downloading {}", url);
    let response = transport.get(&url)?;
    if !response.is_success() {
        return Err(AppErr::bad_status(response.status));
    }

    let dir = match dest.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut part = tempfile::Builder::new()
        .prefix(".apod-")
        .suffix(".part")
        .tempfile_in(dir)?;

    let written = copy_body(response.body, &mut part)?;
    keep_permissions(&part, dest)?;
    part.as_file().sync_all()?;
    part.persist(dest)?;

    info!("Wrote {} bytes to {}", written, dest.display());
    Ok(written)
}

/// Temp files are created owner-only; the image should stay readable by
/// whoever could read it before (or 0644 on a first download).
#[cfg(unix)]
fn keep_permissions(part: &NamedTempFile, dest: &Path) -> Result<(), AppErr> {
    use std::fs::Permissions;
    use std::os::unix::fs::PermissionsExt;

    let permissions = match std::fs::metadata(dest) {
        Ok(meta) => meta.permissions(),
        Err(_) => Permissions::from_mode(0o644),
    };
    part.as_file().set_permissions(permissions)?;
    Ok(())
}

#[cfg(not(unix))]
fn keep_permissions(_part: &NamedTempFile, _dest: &Path) -> Result<(), AppErr> {
    Ok(())
}

fn copy_body<R: Read>(mut body: R, out: &mut NamedTempFile) -> Result<u64, AppErr> {
    let mut buf = [0u8; 64 * 1024];
    let mut written = 0u64;
    loop {
        let n = match body.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(ref e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => {
                return Err(AppErr::with_source(
                    ErrorKind::Transport,
                    &format!("Download interrupted after {} bytes", written),
                    e,
                ))
            }
        };
        out.write_all(&buf[..n])?;
        written += n as u64;
    }
    out.flush()?;
    Ok(written)
}
