/// SQLite persistence for project documents
///
/// One row per project. The pipeline map is stored as a JSON object column and
/// every mutation is a single statement that merges into that column with
/// `json_patch`, so concurrent writers to the same project never overwrite each
/// other's pipelines.

use crate::project::{
    repository::ProjectRepository,
    types::{Pipelines, Project},
};
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePool, SqliteRow},
    Row,
};
use std::path::Path;

/// SQLite-backed project repository
#[derive(Debug, Clone)]
pub struct SqliteProjectRepository {
    /// SQLite connection pool for the project database
    pool: SqlitePool,
}

impl SqliteProjectRepository {
    /// Open (or create) the database file at `path` and initialize the schema
    pub async fn connect(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create database directory '{}'", parent.display()))?;
        }

        tracing::info!("🗄️ Opening project database: {}", path.display());

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePool::connect_with(options)
            .await
            .with_context(|| format!("Failed to open project database '{}'", path.display()))?;

        let repo = Self::new(pool);
        repo.init_schema().await?;

        tracing::info!("✅ Project database ready: {}", path.display());

        Ok(repo)
    }

    /// Wrap an existing pool. The schema is not touched.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create the projects table
    ///
    /// Safe to call multiple times (uses IF NOT EXISTS).
    pub async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS projects (
                project_name TEXT PRIMARY KEY NOT NULL,
                pipelines TEXT NOT NULL DEFAULT '{}',
                created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
                updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

/// Decode the JSON pipelines column
fn pipelines_from_row(row: &SqliteRow) -> Result<Pipelines> {
    let json: String = row.try_get("pipelines")?;
    serde_json::from_str(&json).context("Malformed pipelines column")
}

#[async_trait]
impl ProjectRepository for SqliteProjectRepository {
    async fn project_names(&self) -> Result<Vec<String>> {
        let rows = sqlx::query("SELECT project_name FROM projects ORDER BY project_name")
            .fetch_all(&self.pool)
            .await?;

        let mut names = Vec::with_capacity(rows.len());
        for row in &rows {
            names.push(row.try_get::<String, _>("project_name")?);
        }

        Ok(names)
    }

    async fn find_pipelines(&self, project_name: &str) -> Result<Option<Pipelines>> {
        let row = sqlx::query("SELECT pipelines FROM projects WHERE project_name = ?")
            .bind(project_name)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(pipelines_from_row).transpose()
    }

    async fn find_all(&self) -> Result<Vec<Project>> {
        let rows = sqlx::query("SELECT project_name, pipelines FROM projects ORDER BY project_name")
            .fetch_all(&self.pool)
            .await?;

        let mut projects = Vec::with_capacity(rows.len());
        for row in &rows {
            projects.push(Project {
                project_name: row.try_get("project_name")?,
                pipelines: pipelines_from_row(row)?,
            });
        }

        Ok(projects)
    }

    async fn upsert_pipeline(&self, project_name: &str, pipeline_name: &str, url: &str) -> Result<Pipelines> {
        let row = sqlx::query(
            r#"
            INSERT INTO projects (project_name, pipelines, updated_at)
            VALUES (?, json_object(?, ?), CURRENT_TIMESTAMP)
            ON CONFLICT(project_name) DO UPDATE SET
                pipelines = json_patch(projects.pipelines, excluded.pipelines),
                updated_at = CURRENT_TIMESTAMP
            RETURNING pipelines
            "#,
        )
        .bind(project_name)
        .bind(pipeline_name)
        .bind(url)
        .fetch_one(&self.pool)
        .await?;

        pipelines_from_row(&row)
    }

    async fn set_pipeline(&self, project_name: &str, pipeline_name: &str, url: &str) -> Result<Option<Pipelines>> {
        let row = sqlx::query(
            r#"
            UPDATE projects SET
                pipelines = json_patch(pipelines, json_object(?, ?)),
                updated_at = CURRENT_TIMESTAMP
            WHERE project_name = ?
            RETURNING pipelines
            "#,
        )
        .bind(pipeline_name)
        .bind(url)
        .bind(project_name)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(pipelines_from_row).transpose()
    }

    async fn remove_pipeline(&self, project_name: &str, pipeline_name: &str) -> Result<bool> {
        // A null member in a merge patch deletes that key
        let result = sqlx::query(
            r#"
            UPDATE projects SET
                pipelines = json_patch(pipelines, json_object(?, NULL)),
                updated_at = CURRENT_TIMESTAMP
            WHERE project_name = ?
              AND EXISTS (SELECT 1 FROM json_each(projects.pipelines) WHERE json_each.key = ?)
            "#,
        )
        .bind(pipeline_name)
        .bind(project_name)
        .bind(pipeline_name)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    async fn open_repo(dir: &tempfile::TempDir) -> SqliteProjectRepository {
        SqliteProjectRepository::connect(dir.path().join("nested").join("pipelines.db"))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn upsert_creates_then_merges() {
        let dir = tempfile::tempdir().unwrap();
        let repo = open_repo(&dir).await;

        let first = repo.upsert_pipeline("alpha", "build", "http://x/build").await.unwrap();
        assert_eq!(first.len(), 1);

        let second = repo.upsert_pipeline("alpha", "deploy", "http://x/deploy").await.unwrap();
        assert_eq!(second.get("build").map(String::as_str), Some("http://x/build"));
        assert_eq!(second.get("deploy").map(String::as_str), Some("http://x/deploy"));

        let overwritten = repo.upsert_pipeline("alpha", "build", "http://y/build").await.unwrap();
        assert_eq!(overwritten.get("build").map(String::as_str), Some("http://y/build"));
        assert_eq!(overwritten.len(), 2);

        assert_eq!(repo.project_names().await.unwrap(), vec!["alpha".to_string()]);
    }

    #[tokio::test]
    async fn set_pipeline_requires_existing_project() {
        let dir = tempfile::tempdir().unwrap();
        let repo = open_repo(&dir).await;

        assert!(repo.set_pipeline("ghost", "build", "http://x").await.unwrap().is_none());
        assert!(repo.find_pipelines("ghost").await.unwrap().is_none());

        repo.upsert_pipeline("alpha", "build", "http://x/build").await.unwrap();
        let pipelines = repo
            .set_pipeline("alpha", "lint", "http://x/lint")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(pipelines.len(), 2);
    }

    #[tokio::test]
    async fn remove_pipeline_reports_missing_entries() {
        let dir = tempfile::tempdir().unwrap();
        let repo = open_repo(&dir).await;
        repo.upsert_pipeline("alpha", "build", "http://x/build").await.unwrap();

        assert!(!repo.remove_pipeline("ghost", "build").await.unwrap());
        assert!(!repo.remove_pipeline("alpha", "deploy").await.unwrap());
        assert!(repo.remove_pipeline("alpha", "build").await.unwrap());

        // Project outlives its last pipeline
        assert_eq!(repo.find_pipelines("alpha").await.unwrap(), Some(Pipelines::new()));
    }

    #[tokio::test]
    async fn pipeline_names_with_json_path_characters() {
        let dir = tempfile::tempdir().unwrap();
        let repo = open_repo(&dir).await;

        let name = r#"weird."name"[0]"#;
        repo.upsert_pipeline("alpha", name, "http://x/weird").await.unwrap();
        assert!(repo.remove_pipeline("alpha", name).await.unwrap());
        assert!(repo.find_pipelines("alpha").await.unwrap().unwrap().is_empty());
    }

    #[tokio::test]
    async fn find_all_returns_projects_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        let repo = open_repo(&dir).await;
        repo.upsert_pipeline("beta", "test", "http://b/test").await.unwrap();
        repo.upsert_pipeline("alpha", "build", "http://a/build").await.unwrap();

        let projects = repo.find_all().await.unwrap();

        assert_eq!(projects.len(), 2);
        assert_eq!(projects[0], Project::with_pipeline("alpha", "build", "http://a/build"));
        assert_eq!(projects[1], Project::with_pipeline("beta", "test", "http://b/test"));
    }

    #[tokio::test]
    async fn concurrent_upserts_to_one_project_are_not_lost() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Arc::new(open_repo(&dir).await);

        let mut handles = Vec::new();
        for i in 0..16 {
            let repo = Arc::clone(&repo);
            handles.push(tokio::spawn(async move {
                repo.upsert_pipeline("shared", &format!("p{i}"), &format!("http://x/{i}"))
                    .await
                    .unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let pipelines = repo.find_pipelines("shared").await.unwrap().unwrap();
        assert_eq!(pipelines.len(), 16);
    }

    #[tokio::test]
    async fn reopening_keeps_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pipelines.db");

        {
            let repo = SqliteProjectRepository::connect(&path).await.unwrap();
            repo.upsert_pipeline("alpha", "build", "http://x/build").await.unwrap();
            repo.pool.close().await;
        }

        let repo = SqliteProjectRepository::connect(&path).await.unwrap();
        let pipelines = repo.find_pipelines("alpha").await.unwrap().unwrap();
        assert_eq!(pipelines.get("build").map(String::as_str), Some("http://x/build"));
    }
}
