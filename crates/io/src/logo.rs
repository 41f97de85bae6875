use std::path::Path;

use log::warn;

/// Optional branding image.
#[derive(Debug, Clone)]
pub struct Logo {
    pub bytes: Vec<u8>,
    pub mime: &'static str,
}

/// Read the logo if it is there. A missing or unreadable file is logged and
/// yields `None`; the caller renders without it.
pub fn load_logo(path: &Path) -> Option<Logo> {
    match std::fs::read(path) {
        Ok(bytes) => Some(Logo {
            bytes,
            mime: mime_for(path),
        }),
        Err(e) => {
            warn!("logo {} unavailable ({e}), rendering without it", path.display());
            None
        }
    }
}

fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_logo_is_none() {
        assert!(load_logo(Path::new("/no/such/logo.png")).is_none());
    }

    #[test]
    fn logo_mime_from_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Logo.JPG");
        std::fs::write(&path, [0xFF, 0xD8, 0xFF]).unwrap();
        let logo = load_logo(&path).unwrap();
        assert_eq!(logo.mime, "image/jpeg");
        assert_eq!(logo.bytes.len(), 3);
    }
}
