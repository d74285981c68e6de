// tfup-core/src/lib.rs
pub mod decide;
pub mod env;
pub mod install;
pub mod probe;
pub mod resolve;
pub mod uninstall;

pub use decide::{decide, InstallDecision};
pub use install::{run_install, InstallAction, InstallOptions, InstallReport};
pub use probe::{BinaryProbe, DirProbe, InstalledProbe};
pub use resolve::resolve_version;
