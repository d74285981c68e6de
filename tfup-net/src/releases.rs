// tfup-net/src/releases.rs
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tfup_common::error::{Result, TfupError};
use tfup_common::model::{DownloadDescriptor, Platform};
use tracing::debug;

use crate::channel::ReleaseChannel;
use crate::http::{build_http_client, download_to, fetch_text};
use crate::validation::validate_url;

/// Channel backed by the HashiCorp releases index
/// (`<base>/<product>/index.json`).
pub struct HashicorpReleases {
    client: Client,
    base_url: String,
    product: String,
}

#[derive(Debug, Deserialize)]
struct ReleaseIndex {
    versions: HashMap<String, ReleaseEntry>,
}

#[derive(Debug, Deserialize)]
struct ReleaseEntry {
    shasums: String,
    builds: Vec<ReleaseBuild>,
}

#[derive(Debug, Deserialize)]
struct ReleaseBuild {
    os: String,
    arch: String,
    filename: String,
    url: String,
}

impl HashicorpReleases {
    pub fn new(base_url: &str, product: &str) -> Result<Self> {
        Ok(Self {
            client: build_http_client()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            product: product.to_string(),
        })
    }

    fn index_url(&self) -> String {
        format!("{}/{}/index.json", self.base_url, self.product)
    }

    async fn fetch_index(&self) -> Result<ReleaseIndex> {
        let url = self.index_url();
        validate_url(&url)?;
        let body = fetch_text(&self.client, &url).await?;
        let index: ReleaseIndex = serde_json::from_str(&body)?;
        debug!(
            "Releases index for '{}' lists {} versions",
            self.product,
            index.versions.len()
        );
        Ok(index)
    }
}

#[async_trait]
impl ReleaseChannel for HashicorpReleases {
    async fn list_versions(&self) -> Result<Vec<String>> {
        let index = self.fetch_index().await?;
        Ok(index.versions.into_keys().collect())
    }

    async fn download_descriptor(
        &self,
        version: &str,
        platform: &Platform,
    ) -> Result<DownloadDescriptor> {
        let index = self.fetch_index().await?;
        let entry = index.versions.get(version).ok_or_else(|| {
            TfupError::Resolution(format!(
                "Version {} of '{}' is not on the releases index",
                version, self.product
            ))
        })?;
        let build = entry
            .builds
            .iter()
            .find(|b| b.os == platform.os && b.arch == platform.arch)
            .ok_or_else(|| {
                TfupError::Resolution(format!(
                    "Version {} of '{}' has no build for {}",
                    version, self.product, platform
                ))
            })?;
        Ok(DownloadDescriptor {
            url: build.url.clone(),
            shasums_url: format!(
                "{}/{}/{}/{}",
                self.base_url, self.product, version, entry.shasums
            ),
            filename: build.filename.clone(),
        })
    }

    async fn fetch_file(&self, url: &str, dest: &Path) -> Result<PathBuf> {
        validate_url(url)?;
        download_to(&self.client, url, dest).await
    }

    async fn fetch_text(&self, url: &str) -> Result<String> {
        validate_url(url)?;
        fetch_text(&self.client, url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_json_parses() {
        let body = r#"{
            "name": "terraform",
            "versions": {
                "1.7.5": {
                    "version": "1.7.5",
                    "shasums": "terraform_1.7.5_SHA256SUMS",
                    "shasums_signature": "terraform_1.7.5_SHA256SUMS.sig",
                    "builds": [
                        {
                            "os": "linux",
                            "arch": "amd64",
                            "filename": "terraform_1.7.5_linux_amd64.zip",
                            "url": "https://releases.hashicorp.com/terraform/1.7.5/terraform_1.7.5_linux_amd64.zip"
                        }
                    ]
                }
            }
        }"#;
        let index: ReleaseIndex = serde_json::from_str(body).unwrap();
        let entry = &index.versions["1.7.5"];
        assert_eq!(entry.shasums, "terraform_1.7.5_SHA256SUMS");
        assert_eq!(entry.builds[0].arch, "amd64");
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn real_index_lists_terraform_versions() {
        let channel = HashicorpReleases::new("https://releases.hashicorp.com", "terraform").unwrap();
        let versions = channel.list_versions().await.unwrap();
        assert!(versions.iter().any(|v| v == "1.7.5"));
    }
}
