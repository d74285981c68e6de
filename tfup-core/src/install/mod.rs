// tfup-core/src/install/mod.rs
use std::fs;
use std::path::PathBuf;

use tfup_common::config::Config;
use tfup_common::error::{Result, TfupError};
use tfup_common::model::{ArtifactId, InstallTarget, Platform, VersionSpec};
use tfup_net::{shasums, validation, ReleaseChannel};
use tracing::debug;

use crate::decide::{decide, InstallDecision};
use crate::env::{EnvMutation, PathUpdate};
use crate::probe::InstalledProbe;
use crate::resolve::resolve_version;

pub mod extract;
pub mod place;

#[derive(Debug, Clone, Copy, Default)]
pub struct InstallOptions {
    pub force: bool,
    pub dry_run: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallAction {
    Installed,
    SkippedUpToDate,
    AlreadyPresent,
    WouldInstall,
}

/// The caller-facing outcome of one install run: the resolved version, what
/// was done, and the deterministic target path.
#[derive(Debug, Clone)]
pub struct InstallReport {
    pub artifact: ArtifactId,
    pub version: String,
    pub action: InstallAction,
    pub binary_path: PathBuf,
}

/// Run the install pipeline: resolve, probe, decide, fetch, verify, place.
///
/// Strictly sequential; any failure is fatal to the run. The scratch
/// directory is uniquely named per run and removed on every exit path by
/// RAII. Dry-run short-circuits before any mutating step or fetch.
#[allow(clippy::too_many_arguments)]
pub async fn run_install(
    channel: &dyn ReleaseChannel,
    probe: &dyn InstalledProbe,
    artifact: &ArtifactId,
    spec: &VersionSpec,
    platform: &Platform,
    options: &InstallOptions,
    config: &Config,
    env: Option<&dyn EnvMutation>,
) -> Result<InstallReport> {
    let version = resolve_version(spec, channel).await?;
    debug!("Resolved {} {} to version {}", artifact, spec, version);

    let target = InstallTarget::new(
        config.artifact_root(artifact),
        artifact,
        &version,
        platform.clone(),
    );
    let installed = probe.query_version(&target);
    debug!("Installed state for {}: {:?}", artifact, installed);

    if decide(&version, installed.as_deref(), options.force) == InstallDecision::Skip {
        debug!("{} {} already up to date, skipping", artifact, version);
        return Ok(InstallReport {
            artifact: artifact.clone(),
            version,
            action: InstallAction::SkippedUpToDate,
            binary_path: target.binary_path(),
        });
    }

    // The probe may look past the store (PATH lookup), so check the
    // deterministic target path too before fetching anything.
    if !options.force && target.binary_path().is_file() {
        debug!(
            "{} {} already present at {}, skipping fetch",
            artifact,
            version,
            target.binary_path().display()
        );
        return Ok(InstallReport {
            artifact: artifact.clone(),
            version,
            action: InstallAction::AlreadyPresent,
            binary_path: target.binary_path(),
        });
    }

    if options.dry_run {
        return Ok(InstallReport {
            artifact: artifact.clone(),
            version,
            action: InstallAction::WouldInstall,
            binary_path: target.binary_path(),
        });
    }

    fs::create_dir_all(config.tmp_dir())?;
    let scratch = tempfile::Builder::new()
        .prefix("tfup-")
        .tempdir_in(config.tmp_dir())?;
    debug!("Using scratch directory {}", scratch.path().display());

    let descriptor = channel.download_descriptor(&version, platform).await?;
    if descriptor.filename.contains('/') || descriptor.filename.contains('\\') {
        return Err(TfupError::Validation(format!(
            "Channel returned a filename with path separators: '{}'",
            descriptor.filename
        )));
    }

    let archive_path = scratch.path().join(&descriptor.filename);
    channel.fetch_file(&descriptor.url, &archive_path).await?;
    debug!("Downloaded archive to {}", archive_path.display());

    let manifest = channel.fetch_text(&descriptor.shasums_url).await?;
    let digest = shasums::find_digest(&manifest, &descriptor.filename).ok_or_else(|| {
        TfupError::ChecksumMissing(format!(
            "'{}' is not listed in the checksum manifest at {}",
            descriptor.filename, descriptor.shasums_url
        ))
    })?;
    validation::verify_checksum(&archive_path, &digest)?;

    let staging = scratch.path().join("extract");
    let (outcome, binary_path) = place::place_binary(&archive_path, &staging, &target, options.force)?;
    let action = match outcome {
        place::PlaceOutcome::AlreadyPresent => InstallAction::AlreadyPresent,
        place::PlaceOutcome::Placed => InstallAction::Installed,
    };

    if action == InstallAction::Installed {
        if let Some(env) = env {
            let update = PathUpdate { dir: target.dir() };
            if !env.verify(&update) {
                env.apply(&update)?;
            }
        }
    }

    Ok(InstallReport {
        artifact: artifact.clone(),
        version,
        action,
        binary_path,
    })
}
