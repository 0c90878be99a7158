mod common;

use chalkboard_flows::{LessonPlanRequest, create_lesson_plan};
use common::ScriptedDriver;
use serde_json::json;
use std::sync::atomic::Ordering;

#[tokio::test]
async fn delegates_to_all_three_flows_and_synthesizes() {
    let driver = ScriptedDriver::with_json_outputs(vec![json!({
        "questions": [
            {
                "question": "Which gas do plants absorb?",
                "options": ["Carbon dioxide", "Oxygen", "Nitrogen"],
                "answer": "Carbon dioxide"
            },
            {
                "question": "Where does photosynthesis happen?",
                "options": ["Leaves", "Roots", "Bark"],
                "answer": "Leaves"
            },
            {
                "question": "What do plants release?",
                "options": ["Oxygen", "Methane", "Helium"],
                "answer": "Oxygen"
            }
        ]
    })]);

    let request = LessonPlanRequest {
        topic: "Photosynthesis".to_string(),
        grade: "Grade 6".to_string(),
        subject: "Science".to_string(),
    };

    let plan = create_lesson_plan(&driver, &request).await.unwrap();

    assert!(!plan.lesson_plan.is_empty());
    assert!(plan.image_url.starts_with("data:image/png;base64,"));

    // One structured quiz call, three concept images, and two plain
    // generations (teaching methods + synthesis)
    assert_eq!(driver.json_calls.load(Ordering::SeqCst), 1);
    assert_eq!(driver.image_calls.load(Ordering::SeqCst), 3);
    assert_eq!(driver.generate_calls.load(Ordering::SeqCst), 2);
}
