use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::dto::profile_dto::ResumeUpload;
use crate::error::Result;

const RESUME_DIR: &str = "resumes";

/// Resume files on local disk, addressed by paths relative to the uploads root.
#[derive(Clone, Debug)]
pub struct ResumeStore {
    root: PathBuf,
}

impl ResumeStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writes the upload under a fresh name and returns its relative path.
    pub async fn save(&self, upload: &ResumeUpload) -> Result<String> {
        let dir = self.root.join(RESUME_DIR);
        tokio::fs::create_dir_all(&dir).await?;

        let relative = format!("{}/{}.pdf", RESUME_DIR, Uuid::new_v4());
        tokio::fs::write(self.root.join(&relative), &upload.data).await?;

        tracing::info!(
            original_name = %upload.file_name,
            stored_as = %relative,
            bytes = upload.data.len(),
            "resume stored"
        );
        Ok(relative)
    }

    /// Best effort; a missing file is only logged.
    pub async fn remove(&self, relative: &str) {
        if relative.is_empty() || relative.contains("..") {
            return;
        }
        if let Err(err) = tokio::fs::remove_file(self.root.join(relative)).await {
            tracing::warn!(error = %err, path = %relative, "failed to remove resume file");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn upload() -> ResumeUpload {
        ResumeUpload {
            file_name: "cv.pdf".into(),
            content_type: Some("application/pdf".into()),
            data: Bytes::from_static(b"%PDF-1.4 test"),
        }
    }

    #[tokio::test]
    async fn saved_resume_lands_under_resumes_dir_and_can_be_removed() {
        let root = std::env::temp_dir().join(format!("resume-store-{}", Uuid::new_v4()));
        let store = ResumeStore::new(&root);

        let relative = store.save(&upload()).await.unwrap();
        assert!(relative.starts_with("resumes/"));
        assert!(relative.ends_with(".pdf"));

        let on_disk = tokio::fs::read(root.join(&relative)).await.unwrap();
        assert_eq!(on_disk, b"%PDF-1.4 test");

        store.remove(&relative).await;
        assert!(!root.join(&relative).exists());

        let _ = tokio::fs::remove_dir_all(&root).await;
    }

    #[tokio::test]
    async fn two_saves_never_collide() {
        let root = std::env::temp_dir().join(format!("resume-store-{}", Uuid::new_v4()));
        let store = ResumeStore::new(&root);
        let first = store.save(&upload()).await.unwrap();
        let second = store.save(&upload()).await.unwrap();
        assert_ne!(first, second);
        let _ = tokio::fs::remove_dir_all(&root).await;
    }
}
