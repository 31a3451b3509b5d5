//! Document loading.
//!
//! Statements are usually local files, but a location may also be an
//! `http://` or `https://` URL, in which case the document is downloaded.

/// Whether `location` should be fetched over HTTP rather than read from
/// disk.
#[must_use]
pub fn is_remote(location: &str) -> bool {
    let lower = location.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Reads the bytes at `location`: a filesystem path or an HTTP(S) URL.
///
/// # Errors
///
/// Returns [`PdfError::Io`](crate::PdfError::Io) if a local file cannot be
/// read, or [`PdfError::Http`](crate::PdfError::Http) if the download fails
/// or the server answers with an error status.
pub async fn load_bytes(location: &str) -> Result<Vec<u8>, crate::PdfError> {
    if is_remote(location) {
        let response = reqwest::Client::new()
            .get(location.trim())
            .send()
            .await?
            .error_for_status()?;
        let bytes = response.bytes().await?;

        log::debug!("Downloaded {} bytes from {location}", bytes.len());

        Ok(bytes.to_vec())
    } else {
        let bytes = tokio::fs::read(location).await?;

        log::debug!("Read {} bytes from {location}", bytes.len());

        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_remote_locations() {
        assert!(is_remote("https://example.com/statement.pdf"));
        assert!(is_remote("HTTP://example.com/statement.pdf"));
        assert!(!is_remote("/home/me/statement.pdf"));
        assert!(!is_remote("statements/https.pdf"));
    }

    #[tokio::test]
    async fn missing_local_file_is_io_error() {
        let err = load_bytes("/nonexistent/statement.pdf").await.unwrap_err();
        assert!(matches!(err, crate::PdfError::Io(_)));
    }
}
