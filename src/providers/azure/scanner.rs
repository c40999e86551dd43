use log::debug;

use super::deprecation::DeprecatedVersion;
use super::types::BuildDefinition;
use crate::report::DeprecatedUsage;

/// Lists every step of a classic build definition that runs a deprecated task version.
///
/// Steps are visited phase by phase in declaration order. A step produces one
/// usage per matching deprecated record. Definitions without classic phases
/// (YAML pipelines) and missing definitions produce nothing.
pub fn check_definition(
    definition: Option<&BuildDefinition>,
    deprecated: &[DeprecatedVersion],
) -> Vec<DeprecatedUsage> {
    let Some(definition) = definition else {
        return Vec::new();
    };

    if definition.process.is_none() {
        debug!(
            "Definition {} ({}) has no classic phases, skipping",
            definition.id,
            definition.display_name()
        );
        return Vec::new();
    }

    let mut usages = Vec::new();

    for phase in definition.phases() {
        for step in &phase.steps {
            let Some(task) = &step.task else {
                continue;
            };

            for record in deprecated.iter().filter(|record| record.matches(task)) {
                debug!(
                    "{}: phase '{}' step '{}' uses deprecated {} {}",
                    definition.display_name(),
                    phase.name.as_deref().unwrap_or_default(),
                    step.display_name.as_deref().unwrap_or_default(),
                    record.name,
                    record.full_version
                );

                usages.push(DeprecatedUsage {
                    task_name: record.name.clone(),
                    version_used: task.version_spec().to_string(),
                    pipeline_name: definition.display_name().to_string(),
                });
            }
        }
    }

    usages
}
