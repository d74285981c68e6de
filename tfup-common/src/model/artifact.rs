// tfup-common/src/model/artifact.rs
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TfupError};

/// What the user asked for: an explicit version, or "give me the newest".
/// `latest` is matched case-insensitively after trimming and is never
/// persisted anywhere; literal values are validated by the resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionSpec {
    Latest,
    Exact(String),
}

impl VersionSpec {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case("latest") {
            VersionSpec::Latest
        } else {
            VersionSpec::Exact(trimmed.to_string())
        }
    }
}

impl fmt::Display for VersionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionSpec::Latest => write!(f, "latest"),
            VersionSpec::Exact(v) => write!(f, "{v}"),
        }
    }
}

/// Identifies an installable artifact: a product on the HashiCorp releases
/// index (`terraform`) or a provider on the Terraform registry
/// (`databricks/databricks`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArtifactId {
    Release { product: String },
    Provider { namespace: String, name: String },
}

fn valid_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        && segment != "."
        && segment != ".."
}

impl ArtifactId {
    /// Parse the single CLI artifact argument. A bare word is a releases-index
    /// product, a two-segment `namespace/name` form is a registry provider,
    /// anything else is a validation error.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        let segments: Vec<&str> = trimmed.split('/').collect();
        match segments.as_slice() {
            [product] if valid_segment(product) => Ok(ArtifactId::Release {
                product: product.to_string(),
            }),
            [namespace, name] if valid_segment(namespace) && valid_segment(name) => {
                Ok(ArtifactId::Provider {
                    namespace: namespace.to_string(),
                    name: name.to_string(),
                })
            }
            _ => Err(TfupError::Validation(format!(
                "Invalid artifact '{trimmed}': expected a product name (e.g. 'terraform') or \
                 a provider address (e.g. 'databricks/databricks')"
            ))),
        }
    }

    /// Base name of the installed binary, before the version suffix.
    pub fn binary_base(&self) -> String {
        match self {
            ArtifactId::Release { product } => product.clone(),
            ArtifactId::Provider { name, .. } => format!("terraform-provider-{name}"),
        }
    }
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactId::Release { product } => write!(f, "{product}"),
            ArtifactId::Provider { namespace, name } => write!(f, "{namespace}/{name}"),
        }
    }
}

/// Target platform in the releases-index vocabulary (`windows`/`linux`/
/// `darwin` × `amd64`/`arm64`/`386`/`arm`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platform {
    pub os: String,
    pub arch: String,
}

impl Platform {
    pub fn new(os: impl Into<String>, arch: impl Into<String>) -> Self {
        Self {
            os: os.into(),
            arch: arch.into(),
        }
    }

    /// The platform tfup itself is running on.
    pub fn host() -> Self {
        let os = if cfg!(target_os = "windows") {
            "windows"
        } else if cfg!(target_os = "macos") {
            "darwin"
        } else {
            "linux"
        };
        let arch = if cfg!(target_arch = "x86_64") {
            "amd64"
        } else if cfg!(target_arch = "aarch64") {
            "arm64"
        } else if cfg!(target_arch = "x86") {
            "386"
        } else {
            "arm"
        };
        Self::new(os, arch)
    }

    pub fn is_windows(&self) -> bool {
        self.os == "windows"
    }

    pub fn exe_suffix(&self) -> &'static str {
        if self.is_windows() {
            ".exe"
        } else {
            ""
        }
    }

    /// The `<os>_<arch>` path segment used by the store layout.
    pub fn os_arch(&self) -> String {
        format!("{}_{}", self.os, self.arch)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.os, self.arch)
    }
}

/// Where to fetch an artifact from, resolved per (artifact, version,
/// platform) by a release channel. Immutable once resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadDescriptor {
    pub url: String,
    pub shasums_url: String,
    pub filename: String,
}

/// What a probe found on disk. Recomputed on every run, never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledArtifact {
    pub path: PathBuf,
    pub version: String,
}

/// Deterministic placement of one (artifact, version, platform): a pure
/// function of its inputs with no hidden state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallTarget {
    pub artifact_root: PathBuf,
    pub binary_base: String,
    pub version: String,
    pub platform: Platform,
}

impl InstallTarget {
    pub fn new(
        artifact_root: PathBuf,
        artifact: &ArtifactId,
        version: impl Into<String>,
        platform: Platform,
    ) -> Self {
        Self {
            artifact_root,
            binary_base: artifact.binary_base(),
            version: version.into(),
            platform,
        }
    }

    /// `<artifact_root>/<version>/<os>_<arch>/`
    pub fn dir(&self) -> PathBuf {
        self.artifact_root
            .join(&self.version)
            .join(self.platform.os_arch())
    }

    /// `<binary-base>_v<version>[.exe]`
    pub fn binary_name(&self) -> String {
        format!(
            "{}_v{}{}",
            self.binary_base,
            self.version,
            self.platform.exe_suffix()
        )
    }

    pub fn binary_path(&self) -> PathBuf {
        self.dir().join(self.binary_name())
    }
}
