use std::fs;
use std::path::{Path, PathBuf};

use reqwest::header::{HeaderMap, ACCEPT, USER_AGENT};
use reqwest::{Client, StatusCode};
use tfup_common::error::{Result, TfupError};
use tokio::fs::File as TokioFile;
use tokio::io::AsyncWriteExt;
use tracing::debug;

const USER_AGENT_STRING: &str = "tfup artifact installer (Rust; +https://github.com/tfup/tfup)";

/// Build the shared HTTP client. Beyond the User-Agent and a redirect limit
/// this keeps reqwest's defaults: no added timeouts, no retries.
pub fn build_http_client() -> Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, USER_AGENT_STRING.parse().unwrap());
    headers.insert(ACCEPT, "*/*".parse().unwrap());
    Client::builder()
        .default_headers(headers)
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
        .map_err(|e| TfupError::Generic(format!("Failed to build HTTP client: {e}")))
}

/// Fetch a URL and return the response body as text.
pub async fn fetch_text(client: &Client, url: &str) -> Result<String> {
    debug!("Fetching text from {}", url);
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| TfupError::Resolution(format!("HTTP request failed for {url}: {e}")))?;
    let status = response.status();
    if !status.is_success() {
        return Err(status_error(url, status, "metadata"));
    }
    response
        .text()
        .await
        .map_err(|e| TfupError::Resolution(format!("Failed to read response body from {url}: {e}")))
}

/// Download a URL into `final_path`. The body is written to a hidden
/// `.{name}.download` file next to the destination and renamed into place
/// once the write completes.
pub async fn download_to(client: &Client, url: &str, final_path: &Path) -> Result<PathBuf> {
    let temp_filename = format!(
        ".{}.download",
        final_path.file_name().unwrap_or_default().to_string_lossy()
    );
    let temp_path = final_path.with_file_name(temp_filename);
    debug!("Downloading {} to temporary path {}", url, temp_path.display());
    if temp_path.exists() {
        if let Err(e) = fs::remove_file(&temp_path) {
            tracing::warn!(
                "Could not remove existing temporary file {}: {}",
                temp_path.display(),
                e
            );
        }
    }

    let response = client.get(url).send().await.map_err(|e| {
        debug!("HTTP request failed for {url}: {e}");
        TfupError::DownloadError(
            file_name_of(final_path),
            url.to_string(),
            format!("HTTP request failed: {e}"),
        )
    })?;
    let status = response.status();
    debug!("Received HTTP status: {} for {}", status, url);
    if !status.is_success() {
        return Err(status_error(url, status, &file_name_of(final_path)));
    }

    let mut temp_file = TokioFile::create(&temp_path).await.map_err(|e| {
        TfupError::Generic(format!(
            "Failed to create temp file {}: {}",
            temp_path.display(),
            e
        ))
    })?;
    let content = response.bytes().await.map_err(|e| {
        TfupError::DownloadError(
            file_name_of(final_path),
            url.to_string(),
            format!("Failed to read response body bytes: {e}"),
        )
    })?;
    temp_file.write_all(&content).await.map_err(|e| {
        TfupError::Generic(format!(
            "Failed to write download stream to {}: {}",
            temp_path.display(),
            e
        ))
    })?;
    drop(temp_file);
    debug!("Finished writing download stream to temp file.");

    fs::rename(&temp_path, final_path).map_err(|e| {
        TfupError::Generic(format!(
            "Failed to move temp file {} to {}: {}",
            temp_path.display(),
            final_path.display(),
            e
        ))
    })?;
    debug!("Moved downloaded file to {}", final_path.display());
    Ok(final_path.to_path_buf())
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}

fn status_error(url: &str, status: StatusCode, name: &str) -> TfupError {
    match status {
        StatusCode::NOT_FOUND => TfupError::DownloadError(
            name.to_string(),
            url.to_string(),
            "Resource not found (404)".to_string(),
        ),
        StatusCode::FORBIDDEN => TfupError::DownloadError(
            name.to_string(),
            url.to_string(),
            "Access forbidden (403)".to_string(),
        ),
        _ => TfupError::DownloadError(
            name.to_string(),
            url.to_string(),
            format!("HTTP error {status}"),
        ),
    }
}
