//! In-memory roster backend.
//!
//! Simulates a persistent roster without any configured database. Seeded
//! with a small sample class for prototyping.

use crate::store::RosterStore;
use crate::student::{QuizResult, Student, StudentSummary, summarize};
use chalkboard_error::{ChalkboardResult, RosterError, RosterErrorKind, SchemaError, SchemaErrorKind};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

const PLACEHOLDER_AVATAR: &str = "https://placehold.co/100x100.png";

/// In-memory roster store.
#[derive(Default)]
pub struct MemoryRoster {
    students: Mutex<HashMap<String, Student>>,
    results: Mutex<Vec<QuizResult>>,
}

impl MemoryRoster {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with a sample class and some quiz history.
    pub fn with_sample_data() -> Self {
        let roster = Self::new();

        let sample_students = [
            ("1", "Alice Johnson", "Grade 5 Math"),
            ("2", "Bob Williams", "Grade 5 Math"),
            ("3", "Charlie Brown", "Grade 6 Science"),
            ("4", "Diana Prince", "Grade 6 Science"),
            ("5", "Ethan Hunt", "Grade 5 Math"),
            ("6", "Fiona Glenanne", "Grade 5 Math"),
        ];

        {
            let mut students = roster.students.lock().unwrap();
            for (id, name, class_name) in sample_students {
                students.insert(
                    id.to_string(),
                    Student {
                        id: id.to_string(),
                        name: name.to_string(),
                        class_name: class_name.to_string(),
                        created_at: Utc::now(),
                        avatar: PLACEHOLDER_AVATAR.to_string(),
                    },
                );
            }
        }

        let sample_results = [
            ("qr-1", "1", "Fractions", 90),
            ("qr-2", "1", "Decimals", 90),
            ("qr-3", "2", "Photosynthesis", 60),
            ("qr-4", "3", "The Solar System", 50),
            ("qr-5", "3", "Gravity", 50),
            ("qr-6", "4", "The Solar System", 95),
        ];

        {
            let mut results = roster.results.lock().unwrap();
            for (id, student_id, quiz_name, score) in sample_results {
                results.push(QuizResult {
                    id: id.to_string(),
                    student_id: student_id.to_string(),
                    quiz_name: quiz_name.to_string(),
                    quiz: serde_json::json!({ "questions": [] }),
                    score_percent: score,
                    saved_at: Utc::now(),
                });
            }
        }

        roster
    }
}

#[async_trait::async_trait]
impl RosterStore for MemoryRoster {
    async fn add_student(&self, name: &str, class_name: &str) -> ChalkboardResult<Student> {
        let student = Student {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            class_name: class_name.to_string(),
            created_at: Utc::now(),
            avatar: PLACEHOLDER_AVATAR.to_string(),
        };

        debug!(id = %student.id, name, "Adding student");
        self.students
            .lock()
            .unwrap()
            .insert(student.id.clone(), student.clone());
        Ok(student)
    }

    async fn students(&self) -> ChalkboardResult<Vec<StudentSummary>> {
        let students = self.students.lock().unwrap();
        let results = self.results.lock().unwrap();

        let mut summaries: Vec<StudentSummary> = students
            .values()
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

        if !self.students.lock().unwrap().contains_key(student_id) {
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

        debug!(id = %result.id, student_id, "Recording quiz result");
        self.results.lock().unwrap().push(result.clone());
        Ok(result)
    }

    async fn results_for(&self, student_id: &str) -> ChalkboardResult<Vec<QuizResult>> {
        let mut theirs: Vec<QuizResult> = self
            .results
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.student_id == student_id)
            .cloned()
            .collect();
        theirs.sort_by_key(|r| r.saved_at);
        Ok(theirs)
    }
}
