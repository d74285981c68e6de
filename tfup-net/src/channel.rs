// tfup-net/src/channel.rs
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tfup_common::config::Config;
use tfup_common::error::Result;
use tfup_common::model::{ArtifactId, DownloadDescriptor, Platform};

use crate::registry::ProviderRegistry;
use crate::releases::HashicorpReleases;

/// A source of versions and downloadable builds for one artifact.
///
/// The trait is object-safe so the install pipeline can be driven by a fake
/// implementation in tests.
#[async_trait]
pub trait ReleaseChannel: Send + Sync {
    /// List the version strings the channel knows about, unordered.
    async fn list_versions(&self) -> Result<Vec<String>>;

    /// Resolve the download descriptor for one (version, platform).
    async fn download_descriptor(
        &self,
        version: &str,
        platform: &Platform,
    ) -> Result<DownloadDescriptor>;

    /// Download `url` to `dest`.
    async fn fetch_file(&self, url: &str, dest: &Path) -> Result<PathBuf>;

    /// Fetch `url` as text (used for checksum manifests).
    async fn fetch_text(&self, url: &str) -> Result<String>;
}

/// Construct the channel serving an artifact: the HashiCorp releases index
/// for release products, the Terraform registry for providers.
pub fn channel_for(artifact: &ArtifactId, config: &Config) -> Result<Box<dyn ReleaseChannel>> {
    match artifact {
        ArtifactId::Release { product } => Ok(Box::new(HashicorpReleases::new(
            &config.releases_base_url,
            product,
        )?)),
        ArtifactId::Provider { namespace, name } => Ok(Box::new(ProviderRegistry::new(
            &config.registry_base_url,
            namespace,
            name,
        )?)),
    }
}
