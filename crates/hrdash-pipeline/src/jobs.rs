//! Job description store
//!
//! The open positions live in a JSON array. Edits are written back
//! immediately.

use std::path::{Path, PathBuf};

use hrdash_core::{JobDescription, Result};
use tokio::sync::RwLock;
use tracing::info;

use crate::store::{load_json_or_default, write_json};

/// Editable list of job descriptions backed by a JSON file
pub struct JobStore {
    path: PathBuf,
    jobs: RwLock<Vec<JobDescription>>,
}

impl JobStore {
    /// Open the store; a missing or corrupt file gives an empty list
    pub async fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let jobs: Vec<JobDescription> = load_json_or_default(&path).await;

        Self {
            path,
            jobs: RwLock::new(jobs),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All jobs in file order
    pub async fn list(&self) -> Vec<JobDescription> {
        self.jobs.read().await.clone()
    }

    pub async fn get(&self, id: u32) -> Option<JobDescription> {
        self.jobs.read().await.iter().find(|j| j.id == id).cloned()
    }

    /// Replace a job's description and skills, then save
    ///
    /// Returns `None` when no job has this id.
    pub async fn update(
        &self,
        id: u32,
        description: impl Into<String>,
        skills: Vec<String>,
    ) -> Result<Option<JobDescription>> {
        let mut jobs = self.jobs.write().await;
        let Some(job) = jobs.iter_mut().find(|j| j.id == id) else {
            return Ok(None);
        };

        job.description = description.into();
        job.skills = skills;
        let updated = job.clone();

        write_json(&self.path, &*jobs).await?;
        info!(job_id = id, "Job description updated");
        Ok(Some(updated))
    }

    /// Replace every job, then save
    pub async fn replace_all(&self, jobs: Vec<JobDescription>) -> Result<()> {
        let mut current = self.jobs.write().await;
        *current = jobs;
        write_json(&self.path, &*current).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<JobDescription> {
        vec![
            JobDescription::new(1, "Senior Software Engineer", "Rust and AWS"),
            JobDescription::new(2, "UX Designer Intern", "Figma"),
        ]
    }

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JobStore::open(dir.path().join("jobs.json")).await;
        assert!(store.list().await.is_empty());
    }

    #[tokio::test]
    async fn test_object_instead_of_array_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jobs.json");
        std::fs::write(&path, "{}").unwrap();

        assert!(JobStore::open(&path).await.list().await.is_empty());
    }

    #[tokio::test]
    async fn test_update_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jobs.json");

        let store = JobStore::open(&path).await;
        store.replace_all(sample()).await.unwrap();

        let updated = store
            .update(2, "Figma and user research", vec!["Figma".to_string()])
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.title, "UX Designer Intern");
        assert_eq!(updated.skills, vec!["Figma"]);

        let reopened = JobStore::open(&path).await;
        assert_eq!(reopened.get(2).await.unwrap().description, "Figma and user research");
        assert_eq!(reopened.list().await.len(), 2);
    }

    #[tokio::test]
    async fn test_update_unknown_id() {
        let dir = tempfile::tempdir().unwrap();
        let store = JobStore::open(dir.path().join("jobs.json")).await;
        store.replace_all(sample()).await.unwrap();

        assert!(store.update(9, "x", Vec::new()).await.unwrap().is_none());
    }
}
