mod common;

use chalkboard_error::ChalkboardErrorKind;
use chalkboard_flows::{Poller, StorybookRequest, generate_storybook};
use common::{FAIL_AUDIO, FAIL_VIDEO, ScriptedDriver, analysis_json};
use std::sync::atomic::Ordering;
use std::time::Duration;

fn request() -> StorybookRequest {
    StorybookRequest {
        story: "Leo the fox found a lantern in the quiet autumn forest.".to_string(),
        grade: "Grade 3".to_string(),
    }
}

fn fast_poller() -> Poller {
    Poller::new(Duration::from_millis(1), Duration::from_secs(5), 100)
}

#[tokio::test]
async fn scene_order_and_length_are_preserved() {
    let driver = ScriptedDriver::with_json_outputs(vec![analysis_json(&[
        ("Scene one narration", "fox by a stream"),
        ("Scene two narration", "fox under the moon"),
        ("Scene three narration", "fox goes home"),
    ])]);

    let storybook = generate_storybook(&driver, &request(), &fast_poller())
        .await
        .unwrap();

    assert_eq!(storybook.title, "Leo the Fox");
    assert_eq!(storybook.scenes.len(), 3);
    assert_eq!(storybook.scenes[0].narration_text, "Scene one narration");
    assert_eq!(storybook.scenes[1].narration_text, "Scene two narration");
    assert_eq!(storybook.scenes[2].narration_text, "Scene three narration");

    for scene in &storybook.scenes {
        assert!(scene.narration_audio.starts_with("data:audio/wav;base64,"));
        assert!(scene.video_url.starts_with("data:video/mp4;base64,"));
    }

    // One video job per scene, submitted sequentially
    assert_eq!(driver.start_video_calls.load(Ordering::SeqCst), 3);
    assert_eq!(driver.synthesize_calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn character_sheet_failure_is_not_fatal() {
    let driver = ScriptedDriver {
        fail_images: true,
        ..ScriptedDriver::with_json_outputs(vec![analysis_json(&[(
            "Only scene",
            "fox in the rain",
        )])])
    };

    let storybook = generate_storybook(&driver, &request(), &fast_poller())
        .await
        .unwrap();

    assert_eq!(storybook.scenes.len(), 1);
    assert_eq!(driver.image_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn audio_failure_names_the_scene() {
    let failing_narration = format!("Scene two {}", FAIL_AUDIO);
    let driver = ScriptedDriver::with_json_outputs(vec![analysis_json(&[
        ("Scene one narration", "fox by a stream"),
        (failing_narration.as_str(), "fox under the moon"),
    ])]);

    let err = generate_storybook(&driver, &request(), &fast_poller())
        .await
        .unwrap_err();

    let message = err.to_string();
    assert!(message.contains("audio"), "unexpected error: {}", message);
    assert!(message.contains("scene 2"), "unexpected error: {}", message);
}

#[tokio::test]
async fn video_failure_names_the_scene_and_aborts() {
    let failing_prompt = format!("moonlight {}", FAIL_VIDEO);
    let driver = ScriptedDriver::with_json_outputs(vec![analysis_json(&[
        ("Scene one narration", "fox by a stream"),
        ("Scene two narration", failing_prompt.as_str()),
        ("Scene three narration", "fox goes home"),
    ])]);

    let err = generate_storybook(&driver, &request(), &fast_poller())
        .await
        .unwrap_err();

    let message = err.to_string();
    assert!(message.contains("video"), "unexpected error: {}", message);
    assert!(message.contains("scene 2"), "unexpected error: {}", message);

    // Scene one's job was submitted; the flow stopped before scene three
    assert_eq!(driver.start_video_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn missing_analysis_aborts_before_any_media_stage() {
    let driver = ScriptedDriver::with_json_outputs(vec![]);

    let err = generate_storybook(&driver, &request(), &fast_poller())
        .await
        .unwrap_err();

    assert!(matches!(err.kind(), ChalkboardErrorKind::Gemini(_)));
    assert_eq!(driver.image_calls.load(Ordering::SeqCst), 0);
    assert_eq!(driver.synthesize_calls.load(Ordering::SeqCst), 0);
    assert_eq!(driver.start_video_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn short_story_is_rejected_without_driver_calls() {
    let driver = ScriptedDriver::default();
    let bad_request = StorybookRequest {
        story: "Too short".to_string(),
        grade: "Grade 3".to_string(),
    };

    let err = generate_storybook(&driver, &bad_request, &fast_poller())
        .await
        .unwrap_err();

    assert!(matches!(err.kind(), ChalkboardErrorKind::Schema(_)));
    assert_eq!(driver.json_calls.load(Ordering::SeqCst), 0);
}
