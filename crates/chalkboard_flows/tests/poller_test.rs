mod common;

use chalkboard_error::ChalkboardErrorKind;
use chalkboard_flows::Poller;
use chalkboard_interface::{Driver, OperationHandle, OperationStatus, VideoGeneration};
use common::ScriptedDriver;
use std::sync::atomic::Ordering;
use std::time::Duration;

fn handle() -> OperationHandle {
    OperationHandle {
        name: "operations/test-0".to_string(),
    }
}

fn poller() -> Poller {
    Poller::new(Duration::from_secs(5), Duration::from_secs(600), 120)
}

#[tokio::test(start_paused = true)]
async fn exits_exactly_when_the_completion_flag_becomes_true() {
    let driver = ScriptedDriver::default();
    {
        let mut statuses = driver.operation_statuses.lock().unwrap();
        statuses.push_back(ScriptedDriver::pending_status());
        statuses.push_back(ScriptedDriver::pending_status());
        statuses.push_back(ScriptedDriver::done_status());
    }

    let started = tokio::time::Instant::now();
    let video = poller().wait(&driver, &handle()).await.unwrap();

    assert_eq!(video.mime, "video/mp4");
    // Three status checks, one per interval, no early exit
    assert_eq!(driver.check_calls.load(Ordering::SeqCst), 3);
    assert_eq!(started.elapsed(), Duration::from_secs(15));
}

#[tokio::test(start_paused = true)]
async fn exits_exactly_when_the_error_field_is_populated() {
    let driver = ScriptedDriver::default();
    {
        let mut statuses = driver.operation_statuses.lock().unwrap();
        statuses.push_back(ScriptedDriver::pending_status());
        statuses.push_back(OperationStatus {
            done: true,
            error: Some("internal rendering failure".to_string()),
            video: None,
        });
        // Never reached
        statuses.push_back(ScriptedDriver::done_status());
    }

    let err = poller().wait(&driver, &handle()).await.unwrap_err();

    assert!(err.to_string().contains("internal rendering failure"));
    assert_eq!(driver.check_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn a_job_that_never_finishes_times_out() {
    // The scripted driver reports done when its status queue runs dry, so
    // implement an always-pending driver inline.
    struct NeverDone(ScriptedDriver);

    #[async_trait::async_trait]
    impl Driver for NeverDone {
        async fn generate(
            &self,
            req: &chalkboard_core::GenerateRequest,
        ) -> chalkboard_error::ChalkboardResult<chalkboard_core::GenerateResponse> {
            self.0.generate(req).await
        }

        fn provider_name(&self) -> &'static str {
            "scripted"
        }

        fn model_name(&self) -> &str {
            "scripted-model"
        }
    }

    #[async_trait::async_trait]
    impl VideoGeneration for NeverDone {
        async fn start_video(
            &self,
            job: &chalkboard_interface::VideoJobRequest,
        ) -> chalkboard_error::ChalkboardResult<OperationHandle> {
            self.0.start_video(job).await
        }

        async fn check_operation(
            &self,
            _handle: &OperationHandle,
        ) -> chalkboard_error::ChalkboardResult<OperationStatus> {
            self.0.check_calls.fetch_add(1, Ordering::SeqCst);
            Ok(OperationStatus::default())
        }
    }

    let driver = NeverDone(ScriptedDriver::default());
    let bounded = Poller::new(Duration::from_secs(5), Duration::from_secs(600), 4);

    let err = bounded.wait(&driver, &handle()).await.unwrap_err();

    assert!(matches!(err.kind(), ChalkboardErrorKind::Flow(_)));
    assert!(err.to_string().contains("timed out"));
    assert_eq!(driver.0.check_calls.load(Ordering::SeqCst), 4);
}
