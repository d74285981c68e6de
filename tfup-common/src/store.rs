// tfup-common/src/store.rs
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::config::Config;
use super::error::Result;
use super::model::ArtifactId;

/// One installed (artifact, version, platform) found in the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledEntry {
    pub artifact: ArtifactId,
    pub version: String,
    pub os_arch: String,
    pub path: PathBuf,
}

/// Read-only view over the versioned store layout:
///
/// ```text
/// <root>/<product>/<version>/<os>_<arch>/
/// <root>/providers/<registry-host>/<ns>/<name>/<version>/<os>_<arch>/
/// ```
///
/// Unreadable entries are skipped with a warning, never fatal.
#[derive(Debug)]
pub struct StoreRegistry {
    config: Config,
}

impl StoreRegistry {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn installed_entries(&self) -> Result<Vec<InstalledEntry>> {
        let root = self.config.root().to_path_buf();
        let mut entries = Vec::new();
        if !root.is_dir() {
            debug!("Store root {} does not exist yet", root.display());
            return Ok(entries);
        }

        for child in read_dir_names(&root) {
            let name = match child.file_name().and_then(|n| n.to_str()) {
                Some(n) => n.to_string(),
                None => continue,
            };
            if name == "logs" || name == "tmp" {
                continue;
            }
            if name == "providers" {
                self.scan_providers(&child, &mut entries);
            } else {
                let artifact = ArtifactId::Release {
                    product: name.clone(),
                };
                scan_versions(&child, &artifact, &mut entries);
            }
        }

        entries.sort_by(|a, b| {
            a.artifact
                .to_string()
                .cmp(&b.artifact.to_string())
                .then(a.version.cmp(&b.version))
                .then(a.os_arch.cmp(&b.os_arch))
        });
        Ok(entries)
    }

    /// Installed version strings for one artifact, across platforms.
    pub fn installed_versions(&self, artifact: &ArtifactId) -> Vec<String> {
        let artifact_root = self.config.artifact_root(artifact);
        let mut versions: Vec<String> = read_dir_names(&artifact_root)
            .into_iter()
            .filter_map(|p| p.file_name().and_then(|n| n.to_str()).map(str::to_string))
            .collect();
        versions.sort();
        versions.dedup();
        versions
    }

    fn scan_providers(&self, providers_dir: &Path, entries: &mut Vec<InstalledEntry>) {
        for host_dir in read_dir_names(providers_dir) {
            for namespace_dir in read_dir_names(&host_dir) {
                let namespace = match namespace_dir.file_name().and_then(|n| n.to_str()) {
                    Some(n) => n.to_string(),
                    None => continue,
                };
                for name_dir in read_dir_names(&namespace_dir) {
                    let name = match name_dir.file_name().and_then(|n| n.to_str()) {
                        Some(n) => n.to_string(),
                        None => continue,
                    };
                    let artifact = ArtifactId::Provider {
                        namespace: namespace.clone(),
                        name,
                    };
                    scan_versions(&name_dir, &artifact, entries);
                }
            }
        }
    }
}

fn scan_versions(artifact_root: &Path, artifact: &ArtifactId, entries: &mut Vec<InstalledEntry>) {
    for version_dir in read_dir_names(artifact_root) {
        let version = match version_dir.file_name().and_then(|n| n.to_str()) {
            Some(v) => v.to_string(),
            None => continue,
        };
        for platform_dir in read_dir_names(&version_dir) {
            let os_arch = match platform_dir.file_name().and_then(|n| n.to_str()) {
                Some(p) => p.to_string(),
                None => continue,
            };
            entries.push(InstalledEntry {
                artifact: artifact.clone(),
                version: version.clone(),
                os_arch,
                path: platform_dir,
            });
        }
    }
}

/// Subdirectories of `dir`, skipping anything unreadable with a warning.
fn read_dir_names(dir: &Path) -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    if !dir.is_dir() {
        return dirs;
    }
    match fs::read_dir(dir) {
        Ok(entries) => {
            for entry in entries {
                match entry {
                    Ok(entry) => {
                        let path = entry.path();
                        if path.is_dir() {
                            dirs.push(path);
                        }
                    }
                    Err(e) => {
                        warn!(
                            "Skipping unreadable entry in {}: {}",
                            dir.display(),
                            e
                        );
                    }
                }
            }
        }
        Err(e) => {
            warn!("Failed to read directory {}: {}", dir.display(), e);
        }
    }
    dirs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"binary").unwrap();
    }

    #[test]
    fn empty_root_yields_no_entries() {
        let tmp = tempfile::tempdir().unwrap();
        let registry = StoreRegistry::new(Config::from_root(tmp.path()));
        assert!(registry.installed_entries().unwrap().is_empty());
    }

    #[test]
    fn scans_release_and_provider_layouts() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        touch(&root.join("terraform/1.7.5/linux_amd64/terraform_v1.7.5"));
        touch(&root.join("terraform/1.7.6/linux_amd64/terraform_v1.7.6"));
        touch(
            &root.join(
                "providers/registry.terraform.io/databricks/databricks/1.36.1/linux_amd64/terraform-provider-databricks_v1.36.1",
            ),
        );

        let registry = StoreRegistry::new(Config::from_root(root));
        let entries = registry.installed_entries().unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].artifact.to_string(), "databricks/databricks");
        assert_eq!(entries[0].version, "1.36.1");
        assert_eq!(entries[1].artifact.to_string(), "terraform");
        assert_eq!(entries[1].version, "1.7.5");
        assert_eq!(entries[2].version, "1.7.6");
    }

    #[test]
    fn installed_versions_lists_one_artifact() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        touch(&root.join("terraform/1.7.5/linux_amd64/terraform_v1.7.5"));
        touch(&root.join("terraform/1.7.5/darwin_arm64/terraform_v1.7.5"));
        touch(&root.join("terraform/1.7.6/linux_amd64/terraform_v1.7.6"));

        let registry = StoreRegistry::new(Config::from_root(root));
        let artifact = ArtifactId::parse("terraform").unwrap();
        assert_eq!(
            registry.installed_versions(&artifact),
            vec!["1.7.5".to_string(), "1.7.6".to_string()]
        );
    }
}
