// tfup/src/cli/versions.rs
use std::collections::HashSet;

use clap::Args;
use colored::Colorize;
use semver::Version;
use tfup_common::config::Config;
use tfup_common::error::Result;
use tfup_common::model::ArtifactId;
use tfup_common::store::StoreRegistry;
use tfup_net::channel_for;
use tracing::debug;

#[derive(Args, Debug)]
pub struct VersionsArgs {
    /// Artifact to query: a product name or a provider address
    #[arg(required = true)]
    pub artifact: String,

    /// Show at most this many versions, newest first
    #[arg(long, default_value_t = 20)]
    pub limit: usize,
}

impl VersionsArgs {
    pub async fn run(&self, config: &Config) -> Result<()> {
        let artifact = ArtifactId::parse(&self.artifact)?;
        let channel = channel_for(&artifact, config)?;
        let raw_versions = channel.list_versions().await?;

        let mut versions: Vec<Version> = Vec::new();
        for raw in raw_versions {
            match Version::parse(&raw) {
                Ok(version) => versions.push(version),
                Err(e) => debug!("Skipping unparseable version entry '{}': {}", raw, e),
            }
        }
        versions.sort();
        versions.reverse();

        let installed: HashSet<String> = StoreRegistry::new(config.clone())
            .installed_versions(&artifact)
            .into_iter()
            .collect();

        println!("{}", artifact.to_string().bold());
        for version in versions.iter().take(self.limit) {
            let rendered = version.to_string();
            if installed.contains(&rendered) {
                println!("  {} {}", rendered, "(installed)".green());
            } else {
                println!("  {rendered}");
            }
        }
        if versions.len() > self.limit {
            println!(
                "{}",
                format!("... and {} more", versions.len() - self.limit).dimmed()
            );
        }
        Ok(())
    }
}
