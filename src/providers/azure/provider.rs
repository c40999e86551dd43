use log::{debug, info, warn};

use crate::config::AuditConfig;
use crate::error::Result;
use crate::output::PhaseProgress;
use crate::report::{AuditReport, AuditStats, ProjectFindings};

use super::client::AzureDevOpsClient;
use super::deprecation::{filter_deprecated_versions, DeprecatedVersion};
use super::scanner::check_definition;

/// Azure DevOps deprecated-task auditor.
///
/// Walks every classic build definition of every project in an organization
/// and reports the steps that still run a deprecated task version.
pub struct AzureDevOpsProvider {
    pub client: AzureDevOpsClient,
    pub organization: String,
}

impl AzureDevOpsProvider {
    /// Creates a provider for the organization named in `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or the base URL is invalid.
    pub fn new(config: &AuditConfig) -> Result<Self> {
        let client = AzureDevOpsClient::new(config)?;

        Ok(Self {
            client,
            organization: config.organization.clone(),
        })
    }

    /// Runs the audit and returns the accumulated findings.
    ///
    /// Progress is displayed in three phases:
    /// 1. Fetching projects and the task catalog
    /// 2. Identifying deprecated task versions
    /// 3. Scanning every build definition of every project
    ///
    /// Requests are issued strictly one after another.
    ///
    /// # Errors
    ///
    /// Returns an error if the project list or the task catalog cannot be
    /// fetched. Failures while reading a single project's definitions are
    /// logged and skipped.
    pub async fn audit(&self) -> Result<AuditReport> {
        info!(
            "Starting deprecated task audit for organization: {}",
            self.organization
        );

        // Phase 1: Prerequisites
        let progress = PhaseProgress::start_phase_1();

        let projects = self.client.fetch_projects().await?;
        info!("Total projects found: {}", projects.len());

        let catalog = self.client.fetch_task_catalog().await?;
        info!("Total tasks found: {}", catalog.len());

        // Phase 2: Deprecated versions
        let progress = progress.finish_phase_1_start_phase_2(projects.len(), catalog.len());

        let deprecated = filter_deprecated_versions(&catalog);
        info!("Deprecated task versions found: {}", deprecated.len());
        for record in &deprecated {
            debug!(
                "Deprecated: {} ({}) {} - {}",
                record.name,
                record.friendly_name.as_deref().unwrap_or(&record.name),
                record.full_version,
                record.description.as_deref().unwrap_or_default()
            );
        }

        // Phase 3: Scanning
        let progress = progress.finish_phase_2_start_phase_3(deprecated.len(), projects.len());

        let mut report = AuditReport {
            organization: self.organization.clone(),
            entries: Vec::new(),
            stats: AuditStats {
                catalog_entries: catalog.len(),
                deprecated_versions: deprecated.len(),
                ..AuditStats::default()
            },
        };

        for project in &projects {
            if project.name.is_empty() {
                warn!("Skipping project without a name");
            } else {
                progress.set_project(&project.name);
                self.scan_project(&project.name, &deprecated, &mut report).await;
                report.stats.projects += 1;
            }
            progress.advance();
        }

        progress.finish_phase_3(report.entries.len());

        Ok(report)
    }

    async fn scan_project(
        &self,
        project: &str,
        deprecated: &[DeprecatedVersion],
        report: &mut AuditReport,
    ) {
        info!("Checking project: {project}");

        let definitions = self.client.fetch_build_definitions(project).await;
        let mut affected = 0;

        for summary in &definitions {
            let detail = self.client.fetch_build_definition(project, summary.id).await;

            if detail.is_none() {
                debug!(
                    "No detail for definition {} ({})",
                    summary.id,
                    summary.name.as_deref().unwrap_or("Unknown")
                );
            }

            let usages = check_definition(detail.as_ref(), deprecated);
            report.stats.definitions += 1;

            if !usages.is_empty() {
                affected += 1;
                report.entries.push(ProjectFindings {
                    project: project.to_string(),
                    deprecated_tasks: usages,
                });
            }
        }

        info!(
            "{project}: {} definitions checked, {affected} using deprecated tasks",
            definitions.len()
        );
    }
}
