use log::warn;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Envelope used by every Azure DevOps list endpoint.
#[derive(Debug, Deserialize)]
pub struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    pub value: Vec<T>,
}

/// An Azure DevOps project.
#[derive(Debug, Clone, Deserialize)]
pub struct Project {
    /// Project name, used as a path segment in project-scoped URLs
    #[serde(default)]
    pub name: String,
}

/// One release of a build task as listed by the distributed task catalog.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskVersion {
    /// Task identifier (a GUID) shared by every release of the task
    #[serde(default)]
    pub id: String,
    /// Catalog name (e.g. "NuGetInstaller")
    #[serde(default)]
    pub name: String,
    pub friendly_name: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub version: TaskVersionNumber,
    /// Set by the catalog when the task author marked this release deprecated
    #[serde(default)]
    pub deprecated: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct TaskVersionNumber {
    #[serde(default)]
    pub major: u32,
    #[serde(default)]
    pub minor: u32,
    #[serde(default)]
    pub patch: u32,
}

impl std::fmt::Display for TaskVersionNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Build definition as returned by the list endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct BuildDefinitionRef {
    pub id: i64,
    pub name: Option<String>,
}

/// Full build definition as returned by the detail endpoint.
///
/// Only the classic designer `process` shape is modelled. Any other shape of
/// `process` (YAML pipelines, non-object values) decodes as `None`. Inside a
/// classic process, malformed phases and steps are dropped one by one.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BuildDefinition {
    #[serde(default)]
    pub id: i64,
    pub name: Option<String>,
    #[serde(default, deserialize_with = "classic_process")]
    pub process: Option<ClassicProcess>,
}

impl BuildDefinition {
    /// Definition name, or `"Unknown"` when the service omitted it.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Unknown")
    }

    /// Phases of a classic pipeline in declaration order; empty for anything else.
    pub fn phases(&self) -> &[Phase] {
        self.process
            .as_ref()
            .map(|process| process.phases.as_slice())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClassicProcess {
    #[serde(default, deserialize_with = "lenient_list")]
    pub phases: Vec<Phase>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Phase {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    pub display_name: Option<String>,
    pub task: Option<TaskReference>,
}

/// The task a classic step invokes.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskReference {
    pub id: Option<String>,
    pub version_spec: Option<String>,
}

impl TaskReference {
    /// Version spec with an empty or missing value replaced by `"unknown"`.
    pub fn version_spec(&self) -> &str {
        self.version_spec
            .as_deref()
            .filter(|spec| !spec.is_empty())
            .unwrap_or("unknown")
    }

    /// First `.`-separated segment of the version spec, e.g. `"2"` for `"2.*"`.
    pub fn major_version(&self) -> &str {
        self.version_spec().split('.').next().unwrap_or_default()
    }
}

/// Decodes `process` leniently: only an object carrying `phases` is a classic
/// process, anything else becomes `None` instead of failing the definition.
fn classic_process<'de, D>(deserializer: D) -> Result<Option<ClassicProcess>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;

    let Some(process) = value.filter(|process| {
        process
            .get("phases")
            .is_some_and(|phases| !phases.is_null())
    }) else {
        return Ok(None);
    };

    match serde_json::from_value(process) {
        Ok(process) => Ok(Some(process)),
        Err(e) => {
            warn!("Ignoring undecodable classic process: {e}");
            Ok(None)
        }
    }
}

/// Decodes a list element by element. Elements that do not fit `T` are
/// skipped with a warning; `null` or a non-list value yields an empty list.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let items = match Option::<Value>::deserialize(deserializer)? {
        None => return Ok(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(other) => {
            warn!("Expected a list but found {other}, ignoring it");
            return Ok(Vec::new());
        }
    };

    Ok(items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                warn!("Skipping malformed pipeline entry: {e}");
                None
            }
        })
        .collect())
}
