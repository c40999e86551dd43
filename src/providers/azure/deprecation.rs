use indexmap::IndexMap;

use super::types::{TaskReference, TaskVersion};

/// A catalog release that has been superseded or explicitly deprecated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeprecatedVersion {
    pub id: String,
    pub name: String,
    pub friendly_name: Option<String>,
    pub description: Option<String>,
    /// Major version of this release, compared as a string against step version specs
    pub major_version: String,
    /// `major.minor.patch` of this release
    pub full_version: String,
}

impl DeprecatedVersion {
    fn from_task(task: &TaskVersion) -> Self {
        Self {
            id: task.id.clone(),
            name: task.name.clone(),
            friendly_name: task.friendly_name.clone(),
            description: task.description.clone(),
            major_version: task.version.major.to_string(),
            full_version: task.version.to_string(),
        }
    }

    /// A step uses this release when it references the same task and its
    /// version spec starts with the same major version. Minor and patch are ignored.
    pub fn matches(&self, task: &TaskReference) -> bool {
        task.id.as_deref() == Some(self.id.as_str()) && task.major_version() == self.major_version
    }
}

/// Groups catalog entries by task id, preserving first-seen order.
fn group_by_task(tasks: &[TaskVersion]) -> IndexMap<&str, Vec<&TaskVersion>> {
    let mut families: IndexMap<&str, Vec<&TaskVersion>> = IndexMap::new();
    for task in tasks {
        families.entry(task.id.as_str()).or_default().push(task);
    }
    families
}

/// Returns every catalog entry that is deprecated.
///
/// An entry is deprecated when the catalog flags it, or when its major version
/// is lower than the highest major version in its task family. Each deprecated
/// entry yields its own record, so a family may contribute several.
pub fn filter_deprecated_versions(tasks: &[TaskVersion]) -> Vec<DeprecatedVersion> {
    group_by_task(tasks)
        .into_values()
        .flat_map(|family| {
            let latest_major = family
                .iter()
                .map(|task| task.version.major)
                .max()
                .unwrap_or_default();

            family
                .into_iter()
                .filter(move |task| task.deprecated || task.version.major < latest_major)
                .map(DeprecatedVersion::from_task)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::azure::types::TaskVersionNumber;

    fn task(id: &str, name: &str, major: u32, deprecated: bool) -> TaskVersion {
        TaskVersion {
            id: id.to_string(),
            name: name.to_string(),
            friendly_name: Some(format!("{name} (friendly)")),
            description: None,
            version: TaskVersionNumber { major, minor: 1, patch: 3 },
            deprecated,
        }
    }

    fn step(id: &str, version_spec: &str) -> TaskReference {
        TaskReference {
            id: Some(id.to_string()),
            version_spec: Some(version_spec.to_string()),
        }
    }

    mod filter_deprecated_versions {
        use super::*;

        #[test]
        fn older_majors_are_deprecated() {
            let tasks = vec![task("T1", "Npm@1", 1, false), task("T1", "Npm@2", 2, false)];

            let deprecated = filter_deprecated_versions(&tasks);

            assert_eq!(deprecated.len(), 1);
            assert_eq!(deprecated[0].id, "T1");
            assert_eq!(deprecated[0].name, "Npm@1");
            assert_eq!(deprecated[0].major_version, "1");
            assert_eq!(deprecated[0].full_version, "1.1.3");
        }

        #[test]
        fn uses_true_family_maximum_regardless_of_order() {
            let tasks = vec![
                task("T1", "a", 2, false),
                task("T1", "b", 5, false),
                task("T1", "c", 3, false),
                task("T1", "d", 1, false),
            ];

            let mut majors: Vec<_> = filter_deprecated_versions(&tasks)
                .into_iter()
                .map(|record| record.major_version)
                .collect();
            majors.sort();

            assert_eq!(majors, vec!["1", "2", "3"]);
        }

        #[test]
        fn flagged_latest_major_is_deprecated() {
            let tasks = vec![task("T1", "old", 1, false), task("T1", "latest", 2, true)];

            let deprecated = filter_deprecated_versions(&tasks);

            assert_eq!(deprecated.len(), 2);
            assert!(deprecated.iter().any(|record| record.major_version == "2"));
        }

        #[test]
        fn unflagged_latest_major_is_kept() {
            let tasks = vec![task("T1", "only", 4, false)];
            assert!(filter_deprecated_versions(&tasks).is_empty());
        }

        #[test]
        fn families_are_independent() {
            let tasks = vec![
                task("T1", "first@1", 1, false),
                task("T2", "second@3", 3, false),
                task("T1", "first@2", 2, false),
                task("T2", "second@7", 7, false),
            ];

            let deprecated = filter_deprecated_versions(&tasks);

            assert_eq!(deprecated.len(), 2);
            assert_eq!(deprecated[0].name, "first@1");
            assert_eq!(deprecated[1].name, "second@3");
        }

        #[test]
        fn duplicate_majors_are_not_collapsed() {
            let tasks = vec![
                task("T1", "legacy-a", 1, false),
                task("T1", "legacy-b", 1, false),
                task("T1", "current", 2, false),
            ];

            let deprecated = filter_deprecated_versions(&tasks);

            assert_eq!(deprecated.len(), 2);
            assert!(deprecated.iter().all(|record| record.major_version == "1"));
        }

        #[test]
        fn empty_catalog_yields_nothing() {
            assert!(filter_deprecated_versions(&[]).is_empty());
        }
    }

    mod matches {
        use super::*;

        fn record(id: &str, major: &str) -> DeprecatedVersion {
            DeprecatedVersion {
                id: id.to_string(),
                name: "Task".to_string(),
                friendly_name: None,
                description: None,
                major_version: major.to_string(),
                full_version: format!("{major}.0.0"),
            }
        }

        #[test]
        fn matches_on_id_and_major() {
            assert!(record("X", "2").matches(&step("X", "2.1.0")));
            assert!(record("X", "2").matches(&step("X", "2.*")));
            assert!(record("X", "2").matches(&step("X", "2")));
        }

        #[test]
        fn rejects_other_major() {
            assert!(!record("X", "3").matches(&step("X", "2.1.0")));
        }

        #[test]
        fn rejects_other_task() {
            assert!(!record("Y", "2").matches(&step("X", "2.1.0")));
        }

        #[test]
        fn compares_major_as_string() {
            assert!(!record("X", "2").matches(&step("X", "02.0.0")));
        }

        #[test]
        fn unknown_spec_never_matches_catalog_record() {
            let missing = TaskReference {
                id: Some("X".to_string()),
                version_spec: None,
            };
            assert!(!record("X", "0").matches(&missing));
        }

        #[test]
        fn step_without_task_id_never_matches() {
            let anonymous = TaskReference {
                id: None,
                version_spec: Some("1.0.0".to_string()),
            };
            assert!(!record("", "1").matches(&anonymous));
        }
    }
}
