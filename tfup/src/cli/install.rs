// tfup/src/cli/install.rs
use clap::Args;
use colored::Colorize;
use spinners::{Spinner, Spinners};
use tfup_common::config::Config;
use tfup_common::error::Result;
use tfup_common::model::{ArtifactId, Platform, VersionSpec};
use tfup_core::env::{EnvMutation, PathHint};
use tfup_core::install::{run_install, InstallAction, InstallOptions};
use tfup_core::probe::{BinaryProbe, DirProbe, InstalledProbe};
use tfup_net::channel_for;

#[derive(Args, Debug)]
pub struct InstallArgs {
    /// Artifact to install: a product name (terraform) or a provider
    /// address (databricks/databricks)
    #[arg(required = true)]
    pub artifact: String,

    /// Version to install, or 'latest'
    #[arg(long, default_value = "latest")]
    pub version: String,

    /// Target OS (windows, linux, darwin); defaults to the host OS
    #[arg(long)]
    pub os: Option<String>,

    /// Target architecture (amd64, arm64, 386, arm); defaults to the host
    #[arg(long)]
    pub arch: Option<String>,

    /// Reinstall even when the requested version is already present
    #[arg(long)]
    pub force: bool,

    /// Report what would happen without downloading or writing anything
    #[arg(long)]
    pub dry_run: bool,
}

impl InstallArgs {
    pub async fn run(&self, config: &Config) -> Result<()> {
        let artifact = ArtifactId::parse(&self.artifact)?;
        let spec = VersionSpec::parse(&self.version);
        let host = Platform::host();
        let platform = Platform::new(
            self.os.clone().unwrap_or(host.os),
            self.arch.clone().unwrap_or(host.arch),
        );

        let channel = channel_for(&artifact, config)?;
        let path_hint = PathHint;
        let (probe, env): (Box<dyn InstalledProbe>, Option<&dyn EnvMutation>) = match &artifact {
            ArtifactId::Release { product } => {
                (Box::new(BinaryProbe::lookup(product)), Some(&path_hint))
            }
            ArtifactId::Provider { .. } => (Box::new(DirProbe), None),
        };

        let options = InstallOptions {
            force: self.force,
            dry_run: self.dry_run,
        };

        let mut spinner = (!self.dry_run).then(|| {
            Spinner::new(
                Spinners::Dots9,
                format!("Installing {artifact} {spec} for {platform}..."),
            )
        });
        let result = run_install(
            channel.as_ref(),
            probe.as_ref(),
            &artifact,
            &spec,
            &platform,
            &options,
            config,
            env,
        )
        .await;
        if let Some(spinner) = spinner.as_mut() {
            spinner.stop_with_newline();
        }
        let report = result?;

        match report.action {
            InstallAction::Installed => {
                println!(
                    "✓ Installed {} {} -> {}",
                    report.artifact.to_string().green(),
                    report.version,
                    report.binary_path.display()
                );
            }
            InstallAction::SkippedUpToDate => {
                println!(
                    "{} {} is already up to date",
                    report.artifact.to_string().green(),
                    report.version
                );
            }
            InstallAction::AlreadyPresent => {
                println!(
                    "{} {} already present at {}",
                    report.artifact.to_string().green(),
                    report.version,
                    report.binary_path.display()
                );
            }
            InstallAction::WouldInstall => {
                println!(
                    "{} {} {} -> {}",
                    "Would install".yellow(),
                    report.artifact,
                    report.version,
                    report.binary_path.display()
                );
            }
        }
        Ok(())
    }
}
