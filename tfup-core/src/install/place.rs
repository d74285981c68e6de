// tfup-core/src/install/place.rs
use std::fs;
use std::path::{Path, PathBuf};

use tfup_common::error::{Result, TfupError};
use tfup_common::model::InstallTarget;
use tfup_net::validation::verify_container_format;
use tracing::debug;
use walkdir::WalkDir;

use super::extract::extract_archive;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceOutcome {
    /// The expected binary was already at its target path and force was off.
    AlreadyPresent,
    Placed,
}

/// Position the binary from a verified archive at its deterministic
/// versioned path.
///
/// The archive is extracted into `staging` (inside the run's scratch
/// directory), the binary located, renamed to the versioned filename
/// convention when needed, then copied into the target directory as a hidden
/// partial file and renamed into place. After a successful return exactly
/// one binary file exists at the target path.
pub fn place_binary(
    archive: &Path,
    staging: &Path,
    target: &InstallTarget,
    force: bool,
) -> Result<(PlaceOutcome, PathBuf)> {
    let final_path = target.binary_path();
    if final_path.is_file() && !force {
        debug!("{} already present, skipping extraction", final_path.display());
        return Ok((PlaceOutcome::AlreadyPresent, final_path));
    }

    let target_dir = target.dir();
    if force && target_dir.exists() {
        debug!("Force install: removing existing {}", target_dir.display());
        fs::remove_dir_all(&target_dir)?;
    }

    verify_container_format(archive, expected_container(archive)?)?;
    extract_archive(archive, staging)?;
    let staged = locate_binary(staging, target)?;

    fs::create_dir_all(&target_dir)?;
    let partial_path = target_dir.join(format!(".{}.partial", target.binary_name()));
    let placed = fs::copy(&staged, &partial_path)
        .map(|_| ())
        .and_then(|()| fs::rename(&partial_path, &final_path));
    if let Err(e) = placed {
        let _ = fs::remove_file(&partial_path);
        return Err(e.into());
    }

    #[cfg(unix)]
    if !target.platform.is_windows() {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&final_path, fs::Permissions::from_mode(0o755))?;
    }

    debug!("Placed binary at {}", final_path.display());
    Ok((PlaceOutcome::Placed, final_path))
}

fn expected_container(archive: &Path) -> Result<&'static str> {
    let filename = archive
        .file_name()
        .map(|n| n.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    if filename.ends_with(".zip") {
        Ok("zip")
    } else if filename.ends_with(".tar.gz") || filename.ends_with(".tgz") {
        Ok("gz")
    } else {
        Err(TfupError::Placement(format!(
            "Unsupported archive container for {}",
            archive.display()
        )))
    }
}

/// Find the one binary inside the extracted tree: the expected versioned
/// filename if the archive already uses it, otherwise the unique file whose
/// name starts with the binary base name. Archive-internal naming is not
/// assumed stable across releases.
fn locate_binary(staging: &Path, target: &InstallTarget) -> Result<PathBuf> {
    let expected_name = target.binary_name();
    let mut candidates = Vec::new();

    for entry in WalkDir::new(staging).into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        if name == expected_name {
            return Ok(entry.path().to_path_buf());
        }
        if name.starts_with(&target.binary_base) && !name.ends_with(".partial") {
            candidates.push(entry.path().to_path_buf());
        }
    }

    match candidates.len() {
        1 => Ok(candidates.remove(0)),
        0 => Err(TfupError::Placement(format!(
            "Archive contains no file matching binary base '{}'",
            target.binary_base
        ))),
        n => Err(TfupError::Placement(format!(
            "Archive contains {} files matching binary base '{}', expected exactly one",
            n, target.binary_base
        ))),
    }
}
