//! Roster entities and metric aggregation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A student on the roster.
///
/// Students are created via form submission and never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// Store-assigned identifier
    pub id: String,
    /// The student's name
    pub name: String,
    /// The class the student belongs to
    pub class_name: String,
    /// When the record was created
    pub created_at: DateTime<Utc>,
    /// Avatar image URL
    pub avatar: String,
}

/// One recorded quiz attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizResult {
    /// Store-assigned identifier
    pub id: String,
    /// The student this result belongs to
    pub student_id: String,
    /// Display name of the quiz
    pub quiz_name: String,
    /// The quiz content as saved
    pub quiz: serde_json::Value,
    /// Score as an integer percentage (0 to 100)
    pub score_percent: u32,
    /// When the result was recorded
    pub saved_at: DateTime<Utc>,
}

/// Performance bucket derived from the average score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StudentStatus {
    /// Average below 60
    NeedsAttention,
    /// Average between 60 and 85
    OnTrack,
    /// Average above 85
    Excelling,
}

/// A student with computed performance metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentSummary {
    /// The underlying student record
    #[serde(flatten)]
    pub student: Student,
    /// How many quizzes the student has completed
    pub quizzes_completed: usize,
    /// Average score as an integer percentage; 0 with no activity
    pub average_score: u32,
    /// Performance bucket
    pub status: StudentStatus,
    /// When the student last recorded a result
    pub last_activity: Option<DateTime<Utc>>,
}

/// Compute a student's summary from their recorded results.
///
/// A student with no results reports zero completed quizzes, a zero
/// average, and `NeedsAttention`. The average rounds half-up to an
/// integer percent.
pub fn summarize(student: &Student, results: &[QuizResult]) -> StudentSummary {
    if results.is_empty() {
        return StudentSummary {
            student: student.clone(),
            quizzes_completed: 0,
            average_score: 0,
            status: StudentStatus::NeedsAttention,
            last_activity: None,
        };
    }

    let total: u64 = results.iter().map(|r| u64::from(r.score_percent)).sum();
    let count = results.len() as u64;
    let average_score = ((total + count / 2) / count) as u32;

    let status = if average_score < 60 {
        StudentStatus::NeedsAttention
    } else if average_score > 85 {
        StudentStatus::Excelling
    } else {
        StudentStatus::OnTrack
    };

    let last_activity = results.iter().map(|r| r.saved_at).max();

    StudentSummary {
        student: student.clone(),
        quizzes_completed: results.len(),
        average_score,
        status,
        last_activity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn student() -> Student {
        Student {
            id: "1".to_string(),
            name: "Alice Johnson".to_string(),
            class_name: "Grade 5 Math".to_string(),
            created_at: Utc::now(),
            avatar: "https://placehold.co/100x100.png".to_string(),
        }
    }

    fn result(score: u32, saved_at: DateTime<Utc>) -> QuizResult {
        QuizResult {
            id: format!("qr-{}", score),
            student_id: "1".to_string(),
            quiz_name: "Fractions".to_string(),
            quiz: json!({"questions": []}),
            score_percent: score,
            saved_at,
        }
    }

    #[test]
    fn no_activity_needs_attention() {
        let summary = summarize(&student(), &[]);
        assert_eq!(summary.quizzes_completed, 0);
        assert_eq!(summary.average_score, 0);
        assert_eq!(summary.status, StudentStatus::NeedsAttention);
        assert_eq!(summary.last_activity, None);
    }

    #[test]
    fn average_rounds_half_up() {
        let now = Utc::now();
        // (80 + 85) / 2 = 82.5 → 83
        let summary = summarize(&student(), &[result(80, now), result(85, now)]);
        assert_eq!(summary.average_score, 83);
        assert_eq!(summary.status, StudentStatus::OnTrack);
    }

    #[test]
    fn thresholds_assign_status_buckets() {
        let now = Utc::now();
        assert_eq!(
            summarize(&student(), &[result(59, now)]).status,
            StudentStatus::NeedsAttention
        );
        assert_eq!(
            summarize(&student(), &[result(60, now)]).status,
            StudentStatus::OnTrack
        );
        assert_eq!(
            summarize(&student(), &[result(85, now)]).status,
            StudentStatus::OnTrack
        );
        assert_eq!(
            summarize(&student(), &[result(86, now)]).status,
            StudentStatus::Excelling
        );
    }

    #[test]
    fn last_activity_is_the_latest_result() {
        let older = Utc::now() - chrono::Duration::days(3);
        let newer = Utc::now();
        let summary = summarize(&student(), &[result(70, older), result(90, newer)]);
        assert_eq!(summary.last_activity, Some(newer));
    }
}
