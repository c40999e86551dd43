use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use std::path::PathBuf;

use crate::config::{Config, Overrides};
use crate::output::{self, findings};
use crate::providers::AzureDevOpsProvider;

#[derive(Parser)]
#[command(name = "tasklens")]
#[command(author, version, about = "Deprecated Azure DevOps Task Audit", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Report file (default: deprecated_tasks.json)
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Configuration file (TOML, JSON or YAML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Audit every classic build pipeline of an Azure DevOps organization
    Azure {
        #[arg(long = "org", env = "AZURE_DEVOPS_ORG")]
        organization: Option<String>,

        #[arg(short, long, env = "AZURE_DEVOPS_PAT", hide_env_values = true)]
        token: Option<String>,

        /// Service base URL (default: https://dev.azure.com)
        #[arg(short, long)]
        url: Option<String>,

        /// Per-request timeout in seconds (default: 30)
        #[arg(long)]
        timeout: Option<u64>,
    },
}

impl Cli {
    async fn execute_azure(&self, overrides: Overrides) -> Result<()> {
        let config = Config::load(self.config.as_deref())?.resolve(overrides)?;

        info!(
            "Auditing Azure DevOps organization: {}",
            config.organization
        );

        let provider = AzureDevOpsProvider::new(&config)?;

        let report = provider.audit().await?;

        report
            .write_to(&config.output)
            .with_context(|| format!("Failed to write report: {}", config.output.display()))?;

        output::print_summary(&report);

        let found = format!(
            "Found {} projects ({} pipelines) using deprecated task versions",
            report.affected_projects(),
            report.entries.len()
        );
        println!("{}", findings(report.entries.len(), found));
        println!("Results exported to {}", config.output.display());

        Ok(())
    }

    pub async fn execute(&self) -> Result<()> {
        match &self.command {
            Commands::Azure {
                organization,
                token,
                url,
                timeout,
            } => {
                let overrides = Overrides {
                    organization: organization.clone(),
                    token: token.clone(),
                    base_url: url.clone(),
                    timeout_secs: *timeout,
                    output: self.output.clone(),
                };
                self.execute_azure(overrides).await
            }
        }
    }
}
