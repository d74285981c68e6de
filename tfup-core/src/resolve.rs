// tfup-core/src/resolve.rs
use semver::Version;
use tfup_common::error::{Result, TfupError};
use tfup_common::model::VersionSpec;
use tfup_net::ReleaseChannel;
use tracing::debug;

/// Resolve a version spec to a literal version string.
///
/// A literal spec is validated against the semver grammar and returned
/// exactly as given, with no network call. `latest` queries the channel's
/// version metadata, skips unparseable entries, excludes pre-releases and
/// picks the highest.
pub async fn resolve_version(spec: &VersionSpec, channel: &dyn ReleaseChannel) -> Result<String> {
    match spec {
        VersionSpec::Exact(raw) => {
            Version::parse(raw).map_err(|e| {
                TfupError::Validation(format!(
                    "Invalid version '{raw}': {e} (expected MAJOR.MINOR.PATCH)"
                ))
            })?;
            Ok(raw.clone())
        }
        VersionSpec::Latest => {
            let raw_versions = channel.list_versions().await.map_err(|e| {
                TfupError::Resolution(format!(
                    "Could not query the version metadata endpoint: {e}. \
                     Supply an explicit version with --version as a workaround."
                ))
            })?;
            let mut best: Option<Version> = None;
            for raw in raw_versions {
                match Version::parse(&raw) {
                    Ok(version) => {
                        if !version.pre.is_empty() {
                            debug!("Skipping pre-release version {}", raw);
                            continue;
                        }
                        if best.as_ref().map_or(true, |b| version > *b) {
                            best = Some(version);
                        }
                    }
                    Err(e) => {
                        debug!("Skipping unparseable version entry '{}': {}", raw, e);
                    }
                }
            }
            best.map(|v| v.to_string()).ok_or_else(|| {
                TfupError::Resolution(
                    "The version metadata endpoint returned no usable stable version. \
                     Supply an explicit version with --version as a workaround."
                        .to_string(),
                )
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use tfup_common::model::{DownloadDescriptor, Platform};

    use super::*;

    struct FakeChannel {
        versions: Vec<String>,
        list_calls: AtomicUsize,
    }

    impl FakeChannel {
        fn with_versions(versions: &[&str]) -> Self {
            Self {
                versions: versions.iter().map(|s| s.to_string()).collect(),
                list_calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ReleaseChannel for FakeChannel {
        async fn list_versions(&self) -> Result<Vec<String>> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            if self.versions.is_empty() {
                return Err(TfupError::Resolution("endpoint unreachable".to_string()));
            }
            Ok(self.versions.clone())
        }

        async fn download_descriptor(
            &self,
            _version: &str,
            _platform: &Platform,
        ) -> Result<DownloadDescriptor> {
            unreachable!("resolver must not request descriptors")
        }

        async fn fetch_file(&self, _url: &str, _dest: &Path) -> Result<PathBuf> {
            unreachable!("resolver must not fetch files")
        }

        async fn fetch_text(&self, _url: &str) -> Result<String> {
            unreachable!("resolver must not fetch text")
        }
    }

    #[tokio::test]
    async fn malformed_literal_fails_without_network() {
        let channel = FakeChannel::with_versions(&["1.7.5"]);
        let result = resolve_version(&VersionSpec::parse("1.x.0"), &channel).await;
        assert!(matches!(result, Err(TfupError::Validation(_))));
        assert_eq!(channel.list_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn well_formed_literal_is_returned_unchanged_without_network() {
        let channel = FakeChannel::with_versions(&["9.9.9"]);
        let resolved = resolve_version(&VersionSpec::parse("1.7.5"), &channel)
            .await
            .unwrap();
        assert_eq!(resolved, "1.7.5");
        assert_eq!(channel.list_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn literal_prerelease_is_accepted() {
        let channel = FakeChannel::with_versions(&[]);
        let resolved = resolve_version(&VersionSpec::parse("1.8.0-rc1"), &channel)
            .await
            .unwrap();
        assert_eq!(resolved, "1.8.0-rc1");
    }

    #[tokio::test]
    async fn latest_picks_highest_stable_and_skips_junk() {
        let channel =
            FakeChannel::with_versions(&["1.7.5", "1.8.0-rc1", "not-a-version", "1.7.6", "0.15.0"]);
        let resolved = resolve_version(&VersionSpec::Latest, &channel).await.unwrap();
        assert_eq!(resolved, "1.7.6");
        assert_eq!(channel.list_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn latest_with_unreachable_endpoint_names_the_remediation() {
        let channel = FakeChannel::with_versions(&[]);
        match resolve_version(&VersionSpec::Latest, &channel).await {
            Err(TfupError::Resolution(msg)) => assert!(msg.contains("--version")),
            other => panic!("expected Resolution error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn latest_with_only_prereleases_is_a_resolution_error() {
        let channel = FakeChannel::with_versions(&["1.8.0-rc1", "1.8.0-beta2"]);
        assert!(matches!(
            resolve_version(&VersionSpec::Latest, &channel).await,
            Err(TfupError::Resolution(_))
        ));
    }
}
