// tfup-core/src/install/extract.rs
use std::fs::{self, File};
use std::io;
use std::path::{Component, Path};

use flate2::read::GzDecoder;
use tar::Archive;
use tfup_common::error::{Result, TfupError};
use tracing::debug;
use zip::read::ZipArchive;

/// Extract a verified archive into `dest`, dispatching on the archive
/// filename. Zip and tar.gz containers are supported; entry paths are
/// traversal-checked before anything is written.
pub fn extract_archive(archive: &Path, dest: &Path) -> Result<()> {
    let filename = archive
        .file_name()
        .map(|n| n.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    debug!("Extracting {} into {}", archive.display(), dest.display());
    fs::create_dir_all(dest)?;

    if filename.ends_with(".zip") {
        extract_zip(archive, dest)
    } else if filename.ends_with(".tar.gz") || filename.ends_with(".tgz") {
        extract_tar_gz(archive, dest)
    } else {
        Err(TfupError::Placement(format!(
            "Unsupported archive container for {}",
            archive.display()
        )))
    }
}

fn extract_zip(archive_path: &Path, dest: &Path) -> Result<()> {
    let file = File::open(archive_path)?;
    let mut archive = ZipArchive::new(file).map_err(|e| {
        TfupError::Placement(format!(
            "Failed to open ZIP {}: {}",
            archive_path.display(),
            e
        ))
    })?;

    for index in 0..archive.len() {
        let mut entry = archive.by_index(index).map_err(|e| {
            TfupError::Placement(format!(
                "Error reading ZIP index {} in {}: {}",
                index,
                archive_path.display(),
                e
            ))
        })?;
        let relative = entry.enclosed_name().ok_or_else(|| {
            TfupError::Placement(format!(
                "Refusing to extract unsafe ZIP entry path '{}' from {}",
                entry.name(),
                archive_path.display()
            ))
        })?;
        let out_path = dest.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&out_path)?;
            continue;
        }
        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut out_file = File::create(&out_path)?;
        io::copy(&mut entry, &mut out_file)?;

        #[cfg(unix)]
        if let Some(mode) = entry.unix_mode() {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&out_path, fs::Permissions::from_mode(mode))?;
        }
    }
    Ok(())
}

fn extract_tar_gz(archive_path: &Path, dest: &Path) -> Result<()> {
    let file = File::open(archive_path)?;
    let mut archive = Archive::new(GzDecoder::new(file));

    for entry_result in archive.entries()? {
        let mut entry = entry_result.map_err(|e| {
            TfupError::Placement(format!(
                "Error reading TAR entry from {}: {}",
                archive_path.display(),
                e
            ))
        })?;
        let entry_path = entry
            .path()
            .map_err(|e| {
                TfupError::Placement(format!(
                    "Invalid path in TAR entry from {}: {}",
                    archive_path.display(),
                    e
                ))
            })?
            .into_owned();

        let unsafe_component = entry_path.components().any(|component| {
            matches!(
                component,
                Component::ParentDir | Component::RootDir | Component::Prefix(_)
            )
        });
        if unsafe_component {
            return Err(TfupError::Placement(format!(
                "Refusing to extract unsafe TAR entry path '{}' from {}",
                entry_path.display(),
                archive_path.display()
            )));
        }

        let unpacked = entry.unpack_in(dest).map_err(|e| {
            TfupError::Placement(format!(
                "Failed to unpack '{}' from {}: {}",
                entry_path.display(),
                archive_path.display(),
                e
            ))
        })?;
        if !unpacked {
            return Err(TfupError::Placement(format!(
                "Refusing to extract unsafe TAR entry path '{}' from {}",
                entry_path.display(),
                archive_path.display()
            )));
        }
    }
    Ok(())
}
