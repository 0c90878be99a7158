mod common;

use chalkboard_error::ChalkboardErrorKind;
use chalkboard_flows::{QuizRequest, generate_quiz};
use common::ScriptedDriver;
use serde_json::json;
use std::sync::atomic::Ordering;

fn water_cycle_quiz() -> serde_json::Value {
    json!({
        "questions": [
            {
                "question": "What is evaporation?",
                "options": ["Water turning to vapor", "Rain falling", "Clouds forming"],
                "answer": "Water turning to vapor"
            },
            {
                "question": "What forms clouds?",
                "options": ["Condensation", "Runoff", "Wind"],
                "answer": "Condensation"
            },
            {
                "question": "What is precipitation?",
                "options": ["Snow or rain falling", "Water soaking into soil", "Fog"],
                "answer": "Snow or rain falling"
            }
        ]
    })
}

#[tokio::test]
async fn returns_the_requested_number_of_questions_with_valid_answers() {
    let driver = ScriptedDriver::with_json_outputs(vec![water_cycle_quiz()]);
    let request = QuizRequest {
        topic: "Water Cycle".to_string(),
        grade_level: Some("Grade 4".to_string()),
        subject: Some("Science".to_string()),
        number_of_questions: 3,
    };

    let quiz = generate_quiz(&driver, &request).await.unwrap();

    assert_eq!(quiz.questions.len(), 3);
    for question in &quiz.questions {
        assert!(!question.question.is_empty());
        assert!(!question.options.is_empty());
        assert!(question.options.contains(&question.answer));
    }
}

#[tokio::test]
async fn wrong_question_count_is_a_missing_structured_output() {
    let driver = ScriptedDriver::with_json_outputs(vec![water_cycle_quiz()]);
    let request = QuizRequest {
        topic: "Water Cycle".to_string(),
        grade_level: Some("Grade 4".to_string()),
        subject: Some("Science".to_string()),
        number_of_questions: 5,
    };

    let err = generate_quiz(&driver, &request).await.unwrap_err();
    assert!(matches!(err.kind(), ChalkboardErrorKind::Flow(_)));
}

#[tokio::test]
async fn answer_outside_options_is_a_missing_structured_output() {
    let driver = ScriptedDriver::with_json_outputs(vec![json!({
        "questions": [
            {
                "question": "What is evaporation?",
                "options": ["Rain falling", "Clouds forming"],
                "answer": "Water turning to vapor"
            }
        ]
    })]);
    let request = QuizRequest {
        topic: "Water Cycle".to_string(),
        grade_level: None,
        subject: None,
        number_of_questions: 1,
    };

    let err = generate_quiz(&driver, &request).await.unwrap_err();
    assert!(matches!(err.kind(), ChalkboardErrorKind::Flow(_)));
}

#[tokio::test]
async fn invalid_input_never_reaches_the_driver() {
    let driver = ScriptedDriver::with_json_outputs(vec![water_cycle_quiz()]);
    let request = QuizRequest {
        topic: "Water Cycle".to_string(),
        grade_level: None,
        subject: None,
        number_of_questions: 0,
    };

    let err = generate_quiz(&driver, &request).await.unwrap_err();

    assert!(matches!(err.kind(), ChalkboardErrorKind::Schema(_)));
    assert_eq!(driver.json_calls.load(Ordering::SeqCst), 0);
}
