//! Both roster backends must agree on observable behavior.

use chalkboard_error::ChalkboardErrorKind;
use chalkboard_roster::{DocumentRoster, MemoryRoster, RosterStore, StudentStatus};
use serde_json::json;

async fn exercises_crud(store: &dyn RosterStore) {
    let student = store.add_student("Grace Hopper", "Grade 6 Science").await.unwrap();
    assert_eq!(student.name, "Grace Hopper");

    // Fresh student: no activity
    let summaries = store.students().await.unwrap();
    let summary = summaries
        .iter()
        .find(|s| s.student.id == student.id)
        .expect("student should be listed");
    assert_eq!(summary.quizzes_completed, 0);
    assert_eq!(summary.average_score, 0);
    assert_eq!(summary.status, StudentStatus::NeedsAttention);
    assert_eq!(summary.last_activity, None);

    // Record two results and watch the metrics move
    store
        .save_quiz_result(&student.id, "The Solar System", json!({"questions": []}), 90)
        .await
        .unwrap();
    store
        .save_quiz_result(&student.id, "Gravity", json!({"questions": []}), 86)
        .await
        .unwrap();

    let summaries = store.students().await.unwrap();
    let summary = summaries
        .iter()
        .find(|s| s.student.id == student.id)
        .unwrap();
    assert_eq!(summary.quizzes_completed, 2);
    assert_eq!(summary.average_score, 88);
    assert_eq!(summary.status, StudentStatus::Excelling);
    assert!(summary.last_activity.is_some());

    let results = store.results_for(&student.id).await.unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].quiz_name, "The Solar System");

    // Unknown student and out-of-range score are rejected
    let err = store
        .save_quiz_result("no-such-student", "Quiz", json!({}), 50)
        .await
        .unwrap_err();
    assert!(matches!(err.kind(), ChalkboardErrorKind::Roster(_)));

    let err = store
        .save_quiz_result(&student.id, "Quiz", json!({}), 150)
        .await
        .unwrap_err();
    assert!(matches!(err.kind(), ChalkboardErrorKind::Schema(_)));
}

#[tokio::test]
async fn memory_backend_behaves() {
    let store = MemoryRoster::new();
    exercises_crud(&store).await;
}

#[tokio::test]
async fn document_backend_behaves() {
    let dir = tempfile::tempdir().unwrap();
    let store = DocumentRoster::new(dir.path()).unwrap();
    exercises_crud(&store).await;
}

#[tokio::test]
async fn seeded_memory_roster_matches_the_sample_class() {
    let store = MemoryRoster::with_sample_data();
    let summaries = store.students().await.unwrap();

    assert_eq!(summaries.len(), 6);

    let alice = &summaries[0];
    assert_eq!(alice.student.name, "Alice Johnson");
    assert_eq!(alice.quizzes_completed, 2);
    assert_eq!(alice.average_score, 90);
    assert_eq!(alice.status, StudentStatus::Excelling);

    // Ethan and Fiona have no recorded quizzes yet
    let ethan = &summaries[4];
    assert_eq!(ethan.quizzes_completed, 0);
    assert_eq!(ethan.status, StudentStatus::NeedsAttention);
}

#[tokio::test]
async fn document_backend_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();

    let student_id = {
        let store = DocumentRoster::new(dir.path()).unwrap();
        let student = store.add_student("Ada Lovelace", "Grade 5 Math").await.unwrap();
        store
            .save_quiz_result(&student.id, "Decimals", json!({"questions": []}), 75)
            .await
            .unwrap();
        student.id
    };

    // A fresh handle over the same directory sees the same documents
    let reopened = DocumentRoster::new(dir.path()).unwrap();
    let results = reopened.results_for(&student_id).await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].score_percent, 75);
}
