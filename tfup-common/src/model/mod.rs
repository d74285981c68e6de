// tfup-common/src/model/mod.rs
pub mod artifact;

pub use artifact::{
    ArtifactId, DownloadDescriptor, InstallTarget, InstalledArtifact, Platform, VersionSpec,
};
