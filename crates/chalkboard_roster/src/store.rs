//! Storage capability trait and backend selection.

use crate::{DocumentRoster, MemoryRoster, QuizResult, Student, StudentSummary};
use chalkboard_error::{ChalkboardResult, RosterError, RosterErrorKind};
use chalkboard_rate_limit::ChalkboardConfig;

/// Default base directory for the document backend.
const DEFAULT_DOCUMENT_PATH: &str = "./chalkboard-roster";

/// Capability trait for roster storage backends.
///
/// Implementations persist students and quiz results; summaries with
/// computed metrics are derived on read. Students are never deleted.
#[async_trait::async_trait]
pub trait RosterStore: Send + Sync {
    /// Add a student, returning the stored record.
    async fn add_student(&self, name: &str, class_name: &str) -> ChalkboardResult<Student>;

    /// All students with computed metrics.
    async fn students(&self) -> ChalkboardResult<Vec<StudentSummary>>;

    /// Record a quiz result for a student.
    ///
    /// # Errors
    ///
    /// Returns an error if the student does not exist or the score is not
    /// a percentage.
    async fn save_quiz_result(
        &self,
        student_id: &str,
        quiz_name: &str,
        quiz: serde_json::Value,
        score_percent: u32,
    ) -> ChalkboardResult<QuizResult>;

    /// All recorded results for a student, oldest first.
    async fn results_for(&self, student_id: &str) -> ChalkboardResult<Vec<QuizResult>>;
}

/// Open the roster backend named in configuration.
///
/// `roster.backend` selects the implementation once; callers only ever see
/// the trait. Absent configuration falls back to the seeded memory
/// backend.
///
/// # Errors
///
/// Returns an error for an unrecognized backend name, or if the document
/// backend's base directory cannot be created.
pub fn open_roster(config: &ChalkboardConfig) -> ChalkboardResult<Box<dyn RosterStore>> {
    let (backend, path) = match &config.roster {
        Some(roster) => (roster.backend.as_str(), roster.path.clone()),
        None => ("memory", None),
    };

    match backend {
        "memory" => {
            tracing::info!("Opening seeded in-memory roster");
            Ok(Box::new(MemoryRoster::with_sample_data()))
        }
        "document" => {
            let base = path.unwrap_or_else(|| DEFAULT_DOCUMENT_PATH.to_string());
            tracing::info!(path = %base, "Opening document roster");
            Ok(Box::new(DocumentRoster::new(base)?))
        }
        other => Err(RosterError::new(RosterErrorKind::UnknownBackend(other.to_string())).into()),
    }
}
