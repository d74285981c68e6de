// tfup-common/src/config.rs
use std::env;
use std::path::{Path, PathBuf};

use directories::UserDirs;
use tracing::debug;
use url::Url;

use super::error::Result;
use super::model::ArtifactId;

const DEFAULT_ROOT_DIR_NAME: &str = ".tfup";
const DEFAULT_RELEASES_URL: &str = "https://releases.hashicorp.com";
const DEFAULT_REGISTRY_URL: &str = "https://registry.terraform.io";
const DEFAULT_REGISTRY_HOST: &str = "registry.terraform.io";

#[derive(Debug, Clone)]
pub struct Config {
    pub root: PathBuf,
    pub releases_base_url: String,
    pub registry_base_url: String,
    pub tmp_parent: PathBuf,
}

impl Config {
    pub fn load() -> Result<Self> {
        debug!("Loading tfup configuration");

        let root = env::var("TFUP_ROOT")
            .ok()
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                let fallback = Self::home_dir().join(DEFAULT_ROOT_DIR_NAME);
                debug!(
                    "TFUP_ROOT environment variable not set or empty, falling back to default: {}",
                    fallback.display()
                );
                fallback
            });
        debug!("Effective TFUP_ROOT set to: {}", root.display());

        let releases_base_url = env::var("TFUP_RELEASES_URL")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_RELEASES_URL.to_string());
        let registry_base_url = env::var("TFUP_REGISTRY_URL")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_REGISTRY_URL.to_string());
        let tmp_parent = env::var("TFUP_TMPDIR")
            .ok()
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(env::temp_dir);

        debug!("Configuration loaded successfully.");
        Ok(Self {
            root,
            releases_base_url,
            registry_base_url,
            tmp_parent,
        })
    }

    /// Construct a config rooted at an explicit directory, with default
    /// endpoints. Used by tests so they never touch the process environment.
    pub fn from_root(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let tmp_parent = root.join("tmp");
        Self {
            root,
            releases_base_url: DEFAULT_RELEASES_URL.to_string(),
            registry_base_url: DEFAULT_REGISTRY_URL.to_string(),
            tmp_parent,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn product_dir(&self, product: &str) -> PathBuf {
        self.root.join(product)
    }

    pub fn terraform_dir(&self) -> PathBuf {
        self.product_dir("terraform")
    }

    pub fn providers_dir(&self) -> PathBuf {
        self.root.join("providers")
    }

    /// Host segment of the provider store layout, derived from the registry
    /// base URL so a mirror registry gets its own subtree.
    pub fn registry_host(&self) -> String {
        Url::parse(&self.registry_base_url)
            .ok()
            .and_then(|u| u.host_str().map(|h| h.to_string()))
            .unwrap_or_else(|| DEFAULT_REGISTRY_HOST.to_string())
    }

    pub fn provider_dir(&self, namespace: &str, name: &str) -> PathBuf {
        self.providers_dir()
            .join(self.registry_host())
            .join(namespace)
            .join(name)
    }

    pub fn artifact_root(&self, artifact: &ArtifactId) -> PathBuf {
        match artifact {
            ArtifactId::Release { product } => self.product_dir(product),
            ArtifactId::Provider { namespace, name } => self.provider_dir(namespace, name),
        }
    }

    pub fn tmp_dir(&self) -> PathBuf {
        self.tmp_parent.clone()
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.root.join("logs")
    }

    pub fn home_dir() -> PathBuf {
        UserDirs::new().map_or_else(|| PathBuf::from("/"), |ud| ud.home_dir().to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_root_derives_paths() {
        let config = Config::from_root("/store");
        assert_eq!(config.terraform_dir(), PathBuf::from("/store/terraform"));
        assert_eq!(config.logs_dir(), PathBuf::from("/store/logs"));
        assert_eq!(config.tmp_dir(), PathBuf::from("/store/tmp"));
    }

    #[test]
    fn provider_dir_includes_registry_host() {
        let config = Config::from_root("/store");
        assert_eq!(
            config.provider_dir("databricks", "databricks"),
            PathBuf::from("/store/providers/registry.terraform.io/databricks/databricks")
        );
    }

    #[test]
    fn artifact_root_dispatches_on_artifact_kind() {
        let config = Config::from_root("/store");
        let release = ArtifactId::Release {
            product: "terraform".to_string(),
        };
        let provider = ArtifactId::Provider {
            namespace: "databricks".to_string(),
            name: "databricks".to_string(),
        };
        assert_eq!(config.artifact_root(&release), config.terraform_dir());
        assert_eq!(
            config.artifact_root(&provider),
            config.provider_dir("databricks", "databricks")
        );
    }
}
