// tfup-core/src/uninstall.rs
use std::fs;
use std::path::{Path, PathBuf};

use tfup_common::config::Config;
use tfup_common::error::{Result, TfupError};
use tfup_common::model::{ArtifactId, InstallTarget, Platform};
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct UninstallReport {
    pub path: PathBuf,
    pub files: usize,
    pub bytes: u64,
}

/// Remove one (artifact, version, platform) directory from the store and
/// prune empty parent directories up to the store root.
pub fn uninstall(
    config: &Config,
    artifact: &ArtifactId,
    version: &str,
    platform: &Platform,
) -> Result<UninstallReport> {
    let target = InstallTarget::new(
        config.artifact_root(artifact),
        artifact,
        version,
        platform.clone(),
    );
    let dir = target.dir();
    if !dir.is_dir() {
        return Err(TfupError::NotFound(format!(
            "{artifact} {version} ({platform}) is not installed"
        )));
    }

    let (files, bytes) = count_files_and_size(&dir)?;
    fs::remove_dir_all(&dir)?;
    debug!("Removed {}", dir.display());

    prune_empty_parents(&dir, config.root());

    Ok(UninstallReport {
        path: dir,
        files,
        bytes,
    })
}

/// Remove now-empty ancestors of `removed`, stopping at (and never removing)
/// `root`.
fn prune_empty_parents(removed: &Path, root: &Path) {
    let mut current = removed.parent();
    while let Some(dir) = current {
        if dir == root || !dir.starts_with(root) {
            break;
        }
        let is_empty = match fs::read_dir(dir) {
            Ok(mut entries) => entries.next().is_none(),
            Err(_) => break,
        };
        if !is_empty {
            break;
        }
        if let Err(e) = fs::remove_dir(dir) {
            warn!("Could not prune empty directory {}: {}", dir.display(), e);
            break;
        }
        debug!("Pruned empty directory {}", dir.display());
        current = dir.parent();
    }
}

pub fn count_files_and_size(path: &Path) -> Result<(usize, u64)> {
    let mut file_count = 0;
    let mut total_size = 0;
    for entry in walkdir::WalkDir::new(path) {
        match entry {
            Ok(entry_data) => {
                if entry_data.file_type().is_file() || entry_data.file_type().is_symlink() {
                    match entry_data.metadata() {
                        Ok(metadata) => {
                            file_count += 1;
                            if entry_data.file_type().is_file() {
                                total_size += metadata.len();
                            }
                        }
                        Err(e) => {
                            warn!(
                                "Could not get metadata for {}: {}",
                                entry_data.path().display(),
                                e
                            );
                        }
                    }
                }
            }
            Err(e) => {
                warn!("Error traversing directory {}: {}", path.display(), e);
            }
        }
    }
    Ok((file_count, total_size))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(path: &Path, content: &[u8]) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn removes_version_dir_and_reports_size() {
        let tmp = tempfile::tempdir().unwrap();
        let config = Config::from_root(tmp.path());
        let artifact = ArtifactId::parse("terraform").unwrap();
        let platform = Platform::new("linux", "amd64");
        touch(
            &tmp.path().join("terraform/1.7.5/linux_amd64/terraform_v1.7.5"),
            b"0123456789",
        );
        touch(
            &tmp.path().join("terraform/1.7.6/linux_amd64/terraform_v1.7.6"),
            b"x",
        );

        let report = uninstall(&config, &artifact, "1.7.5", &platform).unwrap();
        assert_eq!(report.files, 1);
        assert_eq!(report.bytes, 10);
        assert!(!tmp.path().join("terraform/1.7.5").exists());
        // The other version is untouched.
        assert!(tmp.path().join("terraform/1.7.6/linux_amd64").is_dir());
    }

    #[test]
    fn prunes_empty_parents_up_to_the_store_root() {
        let tmp = tempfile::tempdir().unwrap();
        let config = Config::from_root(tmp.path());
        let artifact = ArtifactId::parse("databricks/databricks").unwrap();
        let platform = Platform::new("linux", "amd64");
        touch(
            &tmp.path().join(
                "providers/registry.terraform.io/databricks/databricks/1.36.1/linux_amd64/terraform-provider-databricks_v1.36.1",
            ),
            b"binary",
        );

        uninstall(&config, &artifact, "1.36.1", &platform).unwrap();
        assert!(!tmp.path().join("providers").exists());
        assert!(tmp.path().is_dir());
    }

    #[test]
    fn absent_version_is_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let config = Config::from_root(tmp.path());
        let artifact = ArtifactId::parse("terraform").unwrap();
        let platform = Platform::new("linux", "amd64");
        assert!(matches!(
            uninstall(&config, &artifact, "1.7.5", &platform),
            Err(TfupError::NotFound(_))
        ));
    }
}
