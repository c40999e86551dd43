use serde::Serialize;
use std::collections::HashSet;
use std::path::Path;

use crate::error::Result;

/// A pipeline step that runs a deprecated task version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeprecatedUsage {
    /// Catalog name of the deprecated task release
    pub task_name: String,
    /// Version spec the step pins, as written in the definition
    pub version_used: String,
    pub pipeline_name: String,
}

/// Deprecated usages found in one build definition of a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectFindings {
    pub project: String,
    pub deprecated_tasks: Vec<DeprecatedUsage>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditStats {
    pub projects: usize,
    pub definitions: usize,
    pub catalog_entries: usize,
    pub deprecated_versions: usize,
}

/// Result of a full audit run.
#[derive(Debug, Default)]
pub struct AuditReport {
    pub organization: String,
    /// Findings in traversal order; this is what gets written to disk
    pub entries: Vec<ProjectFindings>,
    pub stats: AuditStats,
}

impl AuditReport {
    pub fn total_usages(&self) -> usize {
        self.entries.iter().map(|entry| entry.deprecated_tasks.len()).sum()
    }

    pub fn affected_projects(&self) -> usize {
        self.entries
            .iter()
            .map(|entry| entry.project.as_str())
            .collect::<HashSet<_>>()
            .len()
    }

    /// Writes the findings as a two-space indented JSON array.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usage(task: &str, version: &str, pipeline: &str) -> DeprecatedUsage {
        DeprecatedUsage {
            task_name: task.to_string(),
            version_used: version.to_string(),
            pipeline_name: pipeline.to_string(),
        }
    }

    fn sample_report() -> AuditReport {
        AuditReport {
            entries: vec![
                ProjectFindings {
                    project: "Web".to_string(),
                    deprecated_tasks: vec![usage("Npm", "1.*", "CI"), usage("NuGet", "0.2.0", "CI")],
                },
                ProjectFindings {
                    project: "Web".to_string(),
                    deprecated_tasks: vec![usage("Npm", "1.0.0", "Nightly")],
                },
                ProjectFindings {
                    project: "Api".to_string(),
                    deprecated_tasks: vec![usage("Docker", "0.*", "Publish")],
                },
            ],
            ..AuditReport::default()
        }
    }

    #[test]
    fn counts_usages_and_projects() {
        let report = sample_report();
        assert_eq!(report.total_usages(), 4);
        assert_eq!(report.affected_projects(), 2);
    }

    #[test]
    fn writes_indented_json_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deprecated_tasks.json");
        let report = AuditReport {
            entries: vec![ProjectFindings {
                project: "P".to_string(),
                deprecated_tasks: vec![usage("Npm", "1.5.2", "Build")],
            }],
            ..AuditReport::default()
        };

        report.write_to(&path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let expected = r#"[
  {
    "project": "P",
    "deprecated_tasks": [
      {
        "task_name": "Npm",
        "version_used": "1.5.2",
        "pipeline_name": "Build"
      }
    ]
  }
]"#;
        assert_eq!(written, expected);
    }

    #[test]
    fn empty_report_writes_empty_array() {
        let file = tempfile::NamedTempFile::new().unwrap();

        AuditReport::default().write_to(file.path()).unwrap();

        assert_eq!(std::fs::read_to_string(file.path()).unwrap(), "[]");
    }
}
