/// Project type definitions
///
/// A project is a named document owning a map of pipeline name -> pipeline URL.
/// Pipelines have no identity of their own outside the project that holds them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Pipeline name -> pipeline URL
///
/// Ordered so that JSON responses and listings are deterministic.
pub type Pipelines = BTreeMap<String, String>;

/// A project document as stored by the persistence service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Unique, immutable project name (e.g., "alpha")
    pub project_name: String,
    /// Pipelines registered under this project
    #[serde(default)]
    pub pipelines: Pipelines,
}

impl Project {
    /// Create a project holding a single pipeline
    ///
    /// Projects are never created empty; new projects start from here.
    pub fn with_pipeline(project_name: &str, pipeline_name: &str, url: &str) -> Self {
        let mut pipelines = Pipelines::new();
        pipelines.insert(pipeline_name.to_string(), url.to_string());
        Self {
            project_name: project_name.to_string(),
            pipelines,
        }
    }

    /// Flatten this project into (project, pipeline, url) entries
    pub fn entries(&self) -> impl Iterator<Item = PipelineEntry> + '_ {
        self.pipelines.iter().map(|(name, url)| PipelineEntry {
            project_name: self.project_name.clone(),
            pipeline_name: name.clone(),
            url: url.clone(),
        })
    }
}

/// Flattened view of one pipeline across all projects
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineEntry {
    pub project_name: String,
    pub pipeline_name: String,
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_serializes_with_camel_case_names() {
        let project = Project::with_pipeline("alpha", "build", "http://x/build");
        let json = serde_json::to_value(&project).unwrap();

        assert_eq!(json["projectName"], "alpha");
        assert_eq!(json["pipelines"]["build"], "http://x/build");
    }

    #[test]
    fn entries_flatten_every_pipeline() {
        let mut project = Project::with_pipeline("alpha", "deploy", "http://x/deploy");
        project
            .pipelines
            .insert("build".to_string(), "http://x/build".to_string());

        let entries: Vec<PipelineEntry> = project.entries().collect();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].pipeline_name, "build");
        assert_eq!(entries[1].pipeline_name, "deploy");
        assert!(entries.iter().all(|e| e.project_name == "alpha"));
    }
}
