// tfup-net/src/validation.rs
use std::fs::File;
use std::io;
use std::path::Path;

use sha2::{Digest, Sha256};
use tfup_common::error::{Result, TfupError};
use url::Url;

/// Compute the SHA-256 digest of a file as lowercase hex.
pub fn compute_sha256(path: &Path) -> Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let bytes_copied = io::copy(&mut file, &mut hasher)?;
    let digest = hex::encode(hasher.finalize());
    tracing::debug!("Calculated SHA256: {} ({} bytes read)", digest, bytes_copied);
    Ok(digest)
}

/// Verify the SHA-256 checksum of a file against an expected hex digest.
/// The comparison is case-insensitive. Any discrepancy is fatal; there is
/// no partial-trust fallback.
pub fn verify_checksum(path: &Path, expected: &str) -> Result<()> {
    tracing::debug!("Verifying checksum for: {}", path.display());
    let actual = compute_sha256(path)?;
    tracing::debug!("Expected SHA256:   {}", expected);
    if actual.eq_ignore_ascii_case(expected) {
        Ok(())
    } else {
        Err(TfupError::ChecksumMismatch(format!(
            "Checksum mismatch for {}: expected {}, got {}",
            path.display(),
            expected,
            actual
        )))
    }
}

/// Verify that the detected container format of an archive matches the
/// expected extension, before anything attempts to extract it.
pub fn verify_container_format(path: &Path, expected_ext: &str) -> Result<()> {
    let kind_opt = infer::get_from_path(path)?;
    if let Some(kind) = kind_opt {
        let actual_ext = kind.extension();
        if actual_ext.eq_ignore_ascii_case(expected_ext) {
            tracing::debug!(
                "Container format verified: {} matches expected {}",
                actual_ext,
                expected_ext
            );
            Ok(())
        } else {
            Err(TfupError::Placement(format!(
                "Container format mismatch for {}: expected '{}', but detected '{}'",
                path.display(),
                expected_ext,
                actual_ext
            )))
        }
    } else {
        Err(TfupError::Placement(format!(
            "Could not determine container format for {}",
            path.display()
        )))
    }
}

/// Validate a URL, ensuring it uses the HTTPS scheme.
pub fn validate_url(url_str: &str) -> Result<()> {
    let url = Url::parse(url_str)
        .map_err(|e| TfupError::Generic(format!("Failed to parse URL '{url_str}': {e}")))?;
    if url.scheme() == "https" {
        Ok(())
    } else {
        Err(TfupError::Validation(format!(
            "Invalid URL scheme for '{}': Must be https, but got '{}'",
            url_str,
            url.scheme()
        )))
    }
}
