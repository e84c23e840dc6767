/// Project store: the operations the API exposes over projects and pipelines
///
/// Validates inputs at the boundary, turns repository results into
/// existence/uniqueness semantics, and surfaces every persistence failure as
/// [`StoreError::StoreUnavailable`] with the cause attached. No retries.

use crate::project::{
    repository::ProjectRepository,
    types::{PipelineEntry, Pipelines},
};
use std::sync::Arc;
use thiserror::Error;

/// Errors returned by [`ProjectStore`]
#[derive(Debug, Error)]
pub enum StoreError {
    /// A required input was missing or blank
    #[error("{0}")]
    InvalidArgument(String),

    /// The project, or the pipeline within it, does not exist
    #[error("{0}")]
    NotFound(String),

    /// The persistence service failed or could not be reached
    #[error("persistence service unavailable")]
    StoreUnavailable(#[source] anyhow::Error),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

impl From<anyhow::Error> for StoreError {
    fn from(err: anyhow::Error) -> Self {
        Self::StoreUnavailable(err)
    }
}

/// Returns true when the value is absent for validation purposes
fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Store over an injected persistence service
#[derive(Clone)]
pub struct ProjectStore {
    repository: Arc<dyn ProjectRepository>,
}

impl ProjectStore {
    pub fn new(repository: Arc<dyn ProjectRepository>) -> Self {
        Self { repository }
    }

    /// Names of every stored project
    pub async fn list_project_names(&self) -> StoreResult<Vec<String>> {
        Ok(self.repository.project_names().await?)
    }

    /// All pipelines registered under a project
    ///
    /// Blank names are never stored, so they are simply not found.
    pub async fn get_pipelines(&self, project_name: &str) -> StoreResult<Pipelines> {
        if is_blank(project_name) {
            return Err(StoreError::NotFound("Project not found".to_string()));
        }

        self.repository
            .find_pipelines(project_name)
            .await?
            .ok_or_else(|| StoreError::NotFound("Project not found".to_string()))
    }

    /// URL of one pipeline
    ///
    /// A missing project and a missing pipeline are reported the same way.
    pub async fn get_pipeline_url(&self, project_name: &str, pipeline_name: &str) -> StoreResult<String> {
        if is_blank(project_name) || is_blank(pipeline_name) {
            return Err(StoreError::InvalidArgument(
                "Both projectName and pipelineName are required".to_string(),
            ));
        }

        let url = self
            .repository
            .find_pipelines(project_name)
            .await?
            .and_then(|mut pipelines| pipelines.remove(pipeline_name));

        tracing::debug!("🔍 Pipeline lookup {}/{}: found={}", project_name, pipeline_name, url.is_some());

        url.ok_or_else(|| StoreError::NotFound("Pipeline not found".to_string()))
    }

    /// Create the project if needed and set the pipeline URL
    pub async fn upsert_pipeline(&self, project_name: &str, pipeline_name: &str, url: &str) -> StoreResult<Pipelines> {
        validate_triple(project_name, pipeline_name, url)?;

        let pipelines = self
            .repository
            .upsert_pipeline(project_name, pipeline_name, url)
            .await?;

        tracing::info!("📌 Upserted pipeline {}/{} -> {}", project_name, pipeline_name, url);

        Ok(pipelines)
    }

    /// Set the pipeline URL in an existing project
    ///
    /// The pipeline itself does not need to exist yet; the project does.
    pub async fn update_pipeline(&self, project_name: &str, pipeline_name: &str, url: &str) -> StoreResult<Pipelines> {
        validate_triple(project_name, pipeline_name, url)?;

        let pipelines = self
            .repository
            .set_pipeline(project_name, pipeline_name, url)
            .await?
            .ok_or_else(|| StoreError::NotFound("Project not found".to_string()))?;

        tracing::info!("✏️ Updated pipeline {}/{} -> {}", project_name, pipeline_name, url);

        Ok(pipelines)
    }

    /// Remove a pipeline from its project
    pub async fn delete_pipeline(&self, project_name: &str, pipeline_name: &str) -> StoreResult<()> {
        if is_blank(project_name) || is_blank(pipeline_name) {
            return Err(StoreError::InvalidArgument(
                "Project name and pipeline name are required".to_string(),
            ));
        }

        if !self.repository.remove_pipeline(project_name, pipeline_name).await? {
            return Err(StoreError::NotFound("Pipeline not found".to_string()));
        }

        tracing::info!("🗑️ Deleted pipeline {}/{}", project_name, pipeline_name);

        Ok(())
    }

    /// Every pipeline of every project as flat entries
    pub async fn list_all_pipelines(&self) -> StoreResult<Vec<PipelineEntry>> {
        let projects = self.repository.find_all().await?;

        let entries: Vec<PipelineEntry> = projects.iter().flat_map(|p| p.entries()).collect();
        for entry in &entries {
            tracing::debug!("{} / {} -> {}", entry.project_name, entry.pipeline_name, entry.url);
        }

        Ok(entries)
    }
}

fn validate_triple(project_name: &str, pipeline_name: &str, url: &str) -> StoreResult<()> {
    if is_blank(project_name) || is_blank(pipeline_name) || is_blank(url) {
        return Err(StoreError::InvalidArgument("All fields are required".to_string()));
    }
    Ok(())
}
