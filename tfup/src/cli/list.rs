// tfup/src/cli/list.rs
use clap::Args;
use colored::Colorize;
use prettytable::{format, Cell, Row, Table};
use tfup_common::config::Config;
use tfup_common::error::Result;
use tfup_common::model::ArtifactId;
use tfup_common::store::StoreRegistry;

#[derive(Args, Debug)]
pub struct List {}

impl List {
    pub async fn run(&self, config: &Config) -> Result<()> {
        let registry = StoreRegistry::new(config.clone());
        let entries = registry.installed_entries()?;
        if entries.is_empty() {
            println!("{}", "0 artifacts installed".yellow());
            return Ok(());
        }

        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_BORDER_LINE_SEPARATOR);
        table.add_row(Row::new(vec![
            Cell::new("Type").style_spec("b"),
            Cell::new("Artifact").style_spec("b"),
            Cell::new("Version").style_spec("b"),
            Cell::new("Platform").style_spec("b"),
        ]));

        let mut release_count = 0;
        let mut provider_count = 0;
        for entry in &entries {
            let kind = match entry.artifact {
                ArtifactId::Release { .. } => {
                    release_count += 1;
                    Cell::new("Release").style_spec("Fg")
                }
                ArtifactId::Provider { .. } => {
                    provider_count += 1;
                    Cell::new("Provider").style_spec("Fy")
                }
            };
            table.add_row(Row::new(vec![
                kind,
                Cell::new(&entry.artifact.to_string()).style_spec("Fb"),
                Cell::new(&entry.version),
                Cell::new(&entry.os_arch),
            ]));
        }
        table.printstd();

        if release_count > 0 && provider_count > 0 {
            println!(
                "{}",
                format!("{release_count} releases, {provider_count} providers installed").bold()
            );
        } else if release_count > 0 {
            println!("{}", format!("{release_count} releases installed").bold());
        } else {
            println!("{}", format!("{provider_count} providers installed").bold());
        }
        Ok(())
    }
}
