/// Persistence service contract for project documents
///
/// The store is written against this find/insert/update contract so the
/// backing database can be swapped (SQLite in production, memory in tests).
/// Every mutating method must be atomic per project document.

use crate::project::types::{Pipelines, Project};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

/// Find/insert/update operations over project documents
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Names of every stored project, ascending
    async fn project_names(&self) -> Result<Vec<String>>;

    /// Pipelines of a project, or `None` if the project does not exist
    async fn find_pipelines(&self, project_name: &str) -> Result<Option<Pipelines>>;

    /// Every project with its pipelines, ordered by project name
    async fn find_all(&self) -> Result<Vec<Project>>;

    /// Insert the project with this single pipeline, or set the pipeline field
    /// on the existing project. Returns the resulting pipelines.
    async fn upsert_pipeline(&self, project_name: &str, pipeline_name: &str, url: &str) -> Result<Pipelines>;

    /// Set the pipeline field on an existing project
    ///
    /// Returns `None` without writing anything when the project does not exist.
    async fn set_pipeline(&self, project_name: &str, pipeline_name: &str, url: &str) -> Result<Option<Pipelines>>;

    /// Remove a pipeline field
    ///
    /// Returns `false` when either the project or the pipeline does not exist.
    async fn remove_pipeline(&self, project_name: &str, pipeline_name: &str) -> Result<bool>;
}

/// In-memory repository
///
/// Each mutation runs under a single write lock, so concurrent writes to the
/// same project are serialized the same way a document store would.
#[derive(Debug, Default)]
pub struct MemoryProjectRepository {
    projects: RwLock<BTreeMap<String, Project>>,
}

impl MemoryProjectRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProjectRepository for MemoryProjectRepository {
    async fn project_names(&self) -> Result<Vec<String>> {
        Ok(self.projects.read().await.keys().cloned().collect())
    }

    async fn find_pipelines(&self, project_name: &str) -> Result<Option<Pipelines>> {
        Ok(self
            .projects
            .read()
            .await
            .get(project_name)
            .map(|project| project.pipelines.clone()))
    }

    async fn find_all(&self) -> Result<Vec<Project>> {
        Ok(self.projects.read().await.values().cloned().collect())
    }

    async fn upsert_pipeline(&self, project_name: &str, pipeline_name: &str, url: &str) -> Result<Pipelines> {
        let mut projects = self.projects.write().await;
        match projects.get_mut(project_name) {
            Some(project) => {
                project.pipelines.insert(pipeline_name.to_string(), url.to_string());
                Ok(project.pipelines.clone())
            }
            None => {
                let project = Project::with_pipeline(project_name, pipeline_name, url);
                let pipelines = project.pipelines.clone();
                projects.insert(project_name.to_string(), project);
                Ok(pipelines)
            }
        }
    }

    async fn set_pipeline(&self, project_name: &str, pipeline_name: &str, url: &str) -> Result<Option<Pipelines>> {
        let mut projects = self.projects.write().await;
        Ok(projects.get_mut(project_name).map(|project| {
            project.pipelines.insert(pipeline_name.to_string(), url.to_string());
            project.pipelines.clone()
        }))
    }

    async fn remove_pipeline(&self, project_name: &str, pipeline_name: &str) -> Result<bool> {
        let mut projects = self.projects.write().await;
        Ok(projects
            .get_mut(project_name)
            .map(|project| project.pipelines.remove(pipeline_name).is_some())
            .unwrap_or(false))
    }
}
