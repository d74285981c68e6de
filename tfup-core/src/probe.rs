// tfup-core/src/probe.rs
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::OnceLock;

use regex::Regex;
use tfup_common::model::InstallTarget;
use tracing::debug;

/// Narrow capability for inspecting the installed state of an artifact.
///
/// Probing failures are absorbed, never surfaced: absence is an expected
/// steady state, so every failure mode collapses to `None`.
pub trait InstalledProbe: Send + Sync {
    fn query_version(&self, target: &InstallTarget) -> Option<String>;
}

/// Probes by invoking a binary with a version argument and parsing the first
/// line of its stdout. Binary absent, not executable, invocation failure and
/// unparseable output all collapse to "not installed". Exit status is
/// ignored; only the output pattern matters.
pub struct BinaryProbe {
    program: Option<PathBuf>,
    version_arg: String,
}

impl BinaryProbe {
    /// Locate `binary_base` on PATH. A missing program is not an error;
    /// the probe will simply report "not installed".
    pub fn lookup(binary_base: &str) -> Self {
        let program = which::which(binary_base).ok();
        debug!("PATH lookup for '{}': {:?}", binary_base, program);
        Self {
            program,
            version_arg: "version".to_string(),
        }
    }

    pub fn at(path: PathBuf) -> Self {
        Self {
            program: Some(path),
            version_arg: "version".to_string(),
        }
    }
}

impl InstalledProbe for BinaryProbe {
    fn query_version(&self, _target: &InstallTarget) -> Option<String> {
        let program = self.program.as_ref()?;
        let output = Command::new(program)
            .arg(&self.version_arg)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .ok()?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        let first_line = stdout.lines().next()?;
        let version = extract_version(first_line);
        debug!(
            "Probe of {} reported '{}' -> {:?}",
            program.display(),
            first_line,
            version
        );
        version
    }
}

/// Probes by checking for the expected binary at its deterministic install
/// path. Used for providers, which cannot be invoked for a version string.
pub struct DirProbe;

impl InstalledProbe for DirProbe {
    fn query_version(&self, target: &InstallTarget) -> Option<String> {
        if target.binary_path().is_file() {
            Some(target.version.clone())
        } else {
            None
        }
    }
}

/// Extract a `MAJOR.MINOR.PATCH[-PRERELEASE]` version from one line of
/// version output (e.g. `Terraform v1.7.5`).
fn extract_version(line: &str) -> Option<String> {
    static VERSION_PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = VERSION_PATTERN.get_or_init(|| {
        Regex::new(r"v?(\d+\.\d+\.\d+(?:-[0-9A-Za-z][0-9A-Za-z.-]*)?)")
            .expect("version pattern is valid")
    });
    pattern
        .captures(line)
        .map(|captures| captures[1].to_string())
}

#[cfg(test)]
mod tests {
    use tfup_common::model::{ArtifactId, Platform};

    use super::*;

    fn target_in(root: &std::path::Path, version: &str) -> InstallTarget {
        let artifact = ArtifactId::parse("terraform").unwrap();
        InstallTarget::new(
            root.to_path_buf(),
            &artifact,
            version,
            Platform::new("linux", "amd64"),
        )
    }

    #[test]
    fn extract_version_parses_terraform_output() {
        assert_eq!(
            extract_version("Terraform v1.7.5").as_deref(),
            Some("1.7.5")
        );
        assert_eq!(
            extract_version("Terraform v1.8.0-rc1").as_deref(),
            Some("1.8.0-rc1")
        );
        assert_eq!(extract_version("no version here"), None);
    }

    #[test]
    fn absent_binary_collapses_to_none() {
        let tmp = tempfile::tempdir().unwrap();
        let probe = BinaryProbe::at(tmp.path().join("does-not-exist"));
        assert_eq!(probe.query_version(&target_in(tmp.path(), "1.7.5")), None);
    }

    #[cfg(unix)]
    #[test]
    fn binary_probe_parses_first_line_of_stdout() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempfile::tempdir().unwrap();
        let script = tmp.path().join("terraform");
        std::fs::write(
            &script,
            "#!/bin/sh\necho 'Terraform v1.7.5'\necho 'on linux_amd64'\n",
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let probe = BinaryProbe::at(script);
        assert_eq!(
            probe.query_version(&target_in(tmp.path(), "1.7.5")).as_deref(),
            Some("1.7.5")
        );
    }

    #[cfg(unix)]
    #[test]
    fn unparseable_output_collapses_to_none() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempfile::tempdir().unwrap();
        let script = tmp.path().join("terraform");
        std::fs::write(&script, "#!/bin/sh\necho 'something unexpected'\n").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let probe = BinaryProbe::at(script);
        assert_eq!(probe.query_version(&target_in(tmp.path(), "1.7.5")), None);
    }

    #[test]
    fn dir_probe_reports_version_iff_binary_exists() {
        let tmp = tempfile::tempdir().unwrap();
        let target = target_in(tmp.path(), "1.36.1");
        assert_eq!(DirProbe.query_version(&target), None);

        std::fs::create_dir_all(target.dir()).unwrap();
        std::fs::write(target.binary_path(), b"binary").unwrap();
        assert_eq!(
            DirProbe.query_version(&target).as_deref(),
            Some("1.36.1")
        );
    }
}
