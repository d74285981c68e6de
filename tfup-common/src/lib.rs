// tfup-common/src/lib.rs
pub mod config;
pub mod error;
pub mod model;
pub mod store;

// Re-export key types
pub use config::Config;
pub use error::{Result, TfupError};
pub use model::{ArtifactId, DownloadDescriptor, InstallTarget, Platform, VersionSpec};
