//! Filesystem document roster backend.
//!
//! Stores each student and quiz result as one JSON document:
//! `{base}/students/{id}.json` and `{base}/results/{id}.json`.
//! Writes go to a temp file first, then rename, so a crashed write never
//! leaves a truncated document behind.

use crate::store::RosterStore;
use crate::student::{QuizResult, Student, StudentSummary, summarize};
use chalkboard_error::{ChalkboardResult, RosterError, RosterErrorKind, SchemaError, SchemaErrorKind};
use chrono::Utc;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};
use uuid::Uuid;

const PLACEHOLDER_AVATAR: &str = "https://placehold.co/100x100.png";

/// Filesystem-backed roster store.
pub struct DocumentRoster {
    base_path: PathBuf,
}

impl DocumentRoster {
    /// Create a document roster rooted at `base_path`.
    ///
    /// Creates the directory layout if it doesn't exist.
    #[instrument(skip(base_path))]
    pub fn new(base_path: impl Into<PathBuf>) -> ChalkboardResult<Self> {
        let base_path = base_path.into();

        for dir in ["students", "results"] {
            let path = base_path.join(dir);
            std::fs::create_dir_all(&path).map_err(|e| {
                RosterError::new(RosterErrorKind::DirectoryCreation(format!(
                    "{}: {}",
                    path.display(),
                    e
                )))
            })?;
        }

        tracing::info!(path = %base_path.display(), "Created document roster");
        Ok(Self { base_path })
    }

    fn student_path(&self, id: &str) -> PathBuf {
        self.base_path.join("students").join(format!("{}.json", id))
    }

    fn result_path(&self, id: &str) -> PathBuf {
        self.base_path.join("results").join(format!("{}.json", id))
    }

    /// Write a document atomically: temp file first, then rename.
    async fn write_document<T: serde::Serialize>(
        path: &Path,
        document: &T,
    ) -> ChalkboardResult<()> {
        let json = serde_json::to_vec_pretty(document).map_err(|e| {
            RosterError::new(RosterErrorKind::DocumentWrite(format!(
                "serialize {}: {}",
                path.display(),
                e
            )))
        })?;

        let temp_path = path.with_extension("tmp");
        tokio::fs::write(&temp_path, &json).await.map_err(|e| {
            RosterError::new(RosterErrorKind::DocumentWrite(format!(
                "{}: {}",
                temp_path.display(),
                e
            )))
        })?;

        tokio::fs::rename(&temp_path, path).await.map_err(|e| {
            RosterError::new(RosterErrorKind::DocumentWrite(format!(
                "rename {} to {}: {}",
                temp_path.display(),
                path.display(),
                e
            )))
        })?;

        Ok(())
    }

    async fn read_document<T: serde::de::DeserializeOwned>(path: &Path) -> ChalkboardResult<T> {
        let data = tokio::fs::read(path).await.map_err(|e| {
            RosterError::new(RosterErrorKind::DocumentRead(format!(
                "{}: {}",
                path.display(),
                e
            )))
        })?;

        serde_json::from_slice(&data).map_err(|e| {
            RosterError::new(RosterErrorKind::MalformedDocument(format!(
                "{}: {}",
                path.display(),
                e
            )))
            .into()
        })
    }

    /// Load every JSON document in a directory.
    async fn read_collection<T: serde::de::DeserializeOwned>(
        &self,
        dir: &str,
    ) -> ChalkboardResult<Vec<T>> {
        let path = self.base_path.join(dir);
        let mut entries = tokio::fs::read_dir(&path).await.map_err(|e| {
            RosterError::new(RosterErrorKind::DocumentRead(format!(
                "{}: {}",
                path.display(),
                e
            )))
        })?;

        let mut documents = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(|e| {
            RosterError::new(RosterErrorKind::DocumentRead(format!(
                "{}: {}",
                path.display(),
                e
            )))
        })? {
            let entry_path = entry.path();
            if entry_path.extension().is_some_and(|ext| ext == "json") {
                documents.push(Self::read_document(&entry_path).await?);
            }
        }

        Ok(documents)
    }
}

#[async_trait::async_trait]
impl RosterStore for DocumentRoster {
    async fn add_student(&self, name: &str, class_name: &str) -> ChalkboardResult<Student> {
        let student = Student {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            class_name: class_name.to_string(),
            created_at: Utc::now(),
            avatar: PLACEHOLDER_AVATAR.to_string(),
        };

        Self::write_document(&self.student_path(&student.id), &student).await?;
        debug!(id = %student.id, name, "Stored student document");
        Ok(student)
    }

    async fn students(&self) -> ChalkboardResult<Vec<StudentSummary>> {
        let students: Vec<Student> = self.read_collection("students").await?;
        let results: Vec<QuizResult> = self.read_collection("results").await?;

        let mut summaries: Vec<StudentSummary> = students
            .iter()
            .map(|student| {
                let theirs: Vec<QuizResult> = results
                    .iter()
                    .filter(|r| r.student_id == student.id)
                    .cloned()
                    .collect();
                summarize(student, &theirs)
            })
            .collect();

        summaries.sort_by(|a, b| a.student.id.cmp(&b.student.id));
        Ok(summaries)
    }

    async fn save_quiz_result(
        &self,
        student_id: &str,
        quiz_name: &str,
        quiz: serde_json::Value,
        score_percent: u32,
    ) -> ChalkboardResult<QuizResult> {
        if score_percent > 100 {
            return Err(SchemaError::new(SchemaErrorKind::OutOfRange {
                field: "score_percent",
                min: 0,
                max: 100,
                value: i64::from(score_percent),
            })
            .into());
        }

        let student_path = self.student_path(student_id);
        if !tokio::fs::try_exists(&student_path).await.unwrap_or(false) {
            return Err(
                RosterError::new(RosterErrorKind::StudentNotFound(student_id.to_string())).into(),
            );
        }

        let result = QuizResult {
            id: Uuid::new_v4().to_string(),
            student_id: student_id.to_string(),
            quiz_name: quiz_name.to_string(),
            quiz,
            score_percent,
            saved_at: Utc::now(),
        };

        Self::write_document(&self.result_path(&result.id), &result).await?;
        debug!(id = %result.id, student_id, "Stored quiz result document");
        Ok(result)
    }

    async fn results_for(&self, student_id: &str) -> ChalkboardResult<Vec<QuizResult>> {
        let results: Vec<QuizResult> = self.read_collection("results").await?;
        let mut theirs: Vec<QuizResult> = results
            .into_iter()
            .filter(|r| r.student_id == student_id)
            .collect();
        theirs.sort_by_key(|r| r.saved_at);
        Ok(theirs)
    }
}
