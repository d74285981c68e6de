// tfup/src/cli/uninstall.rs
use clap::Args;
use colored::Colorize;
use dialoguer::Confirm;
use tfup_common::config::Config;
use tfup_common::error::{Result, TfupError};
use tfup_common::model::{ArtifactId, Platform};
use tfup_core::uninstall as core_uninstall;

#[derive(Args, Debug)]
pub struct UninstallArgs {
    /// Artifact to remove: a product name or a provider address
    #[arg(required = true)]
    pub artifact: String,

    /// Version to remove
    #[arg(long, required = true)]
    pub version: String,

    /// Target OS; defaults to the host OS
    #[arg(long)]
    pub os: Option<String>,

    /// Target architecture; defaults to the host
    #[arg(long)]
    pub arch: Option<String>,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

impl UninstallArgs {
    pub async fn run(&self, config: &Config) -> Result<()> {
        let artifact = ArtifactId::parse(&self.artifact)?;
        let host = Platform::host();
        let platform = Platform::new(
            self.os.clone().unwrap_or(host.os),
            self.arch.clone().unwrap_or(host.arch),
        );

        if !self.yes {
            let confirmed = Confirm::new()
                .with_prompt(format!(
                    "Uninstall {} {} ({})?",
                    artifact, self.version, platform
                ))
                .default(false)
                .interact()
                .map_err(|e| TfupError::Generic(format!("Confirmation prompt failed: {e}")))?;
            if !confirmed {
                println!("Aborted.");
                return Ok(());
            }
        }

        let report = core_uninstall::uninstall(config, &artifact, &self.version, &platform)?;
        println!(
            "✓ Uninstalled {} {} ({} files, {})",
            artifact.to_string().green(),
            self.version,
            report.files,
            format_size(report.bytes)
        );
        Ok(())
    }
}

fn format_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;
    if size >= GB {
        format!("{:.1}GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.1}MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.1}KB", size as f64 / KB as f64)
    } else {
        format!("{size}B")
    }
}
