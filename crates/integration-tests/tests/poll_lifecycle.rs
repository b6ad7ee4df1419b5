// Poll lifecycle: terminal absorption, non-terminal persistence, happy path

use reportrack_core::application::ReportSession;
use reportrack_core::domain::ReportJob;
use reportrack_core::port::report_backend::mocks::{ScriptedBackend, ScriptedResponse};
use reportrack_core::port::time_provider::mocks::FixedTimeProvider;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

const TICK: Duration = Duration::from_millis(10);

fn session(backend: Arc<ScriptedBackend>) -> ReportSession {
    ReportSession::with_poll_interval(backend, Arc::new(FixedTimeProvider::new(0)), TICK)
}

async fn wait_settled(session: &ReportSession, job_id: &str) {
    for _ in 0..100 {
        if session.is_settled(job_id) {
            return;
        }
        sleep(TICK).await;
    }
    panic!("job {job_id} never settled");
}

#[tokio::test]
async fn happy_path_submit_poll_download() {
    let backend = Arc::new(ScriptedBackend::new());
    backend.script_submission(ScriptedResponse::Job(ReportJob::new("42")));
    backend.script_polls(
        "42",
        vec![
            ScriptedResponse::Job(ReportJob::new("42").with_status("running").with_progress(10.0)),
            ScriptedResponse::Job(
                ReportJob::new("42")
                    .with_status("completed")
                    .with_download_url("https://x/42.csv"),
            ),
        ],
    );

    let session = session(backend.clone());
    let job = session
        .submit("enrollment_export", Some(json!({"start": "2024-01-01"})))
        .await
        .unwrap();
    assert_eq!(job.job_id, "42");

    wait_settled(&session, "42").await;
    let snapshot = session.job("42").unwrap();
    assert_eq!(snapshot.status.as_deref(), Some("completed"));
    assert_eq!(snapshot.download_url.as_deref(), Some("https://x/42.csv"));

    // Terminal absorption: no further poll is ever scheduled
    let settled_count = backend.poll_calls("42");
    sleep(TICK * 10).await;
    assert_eq!(backend.poll_calls("42"), settled_count);

    session.shutdown();
}

#[tokio::test]
async fn non_terminal_statuses_keep_polling_until_torn_down() {
    let backend = Arc::new(ScriptedBackend::new());
    backend.set_history(vec![ReportJob::new("7").with_report_type("grade_export")]);
    backend.script_polls(
        "7",
        vec![ScriptedResponse::Job(
            ReportJob::new("7").with_status("pending"),
        )],
    );
    // A job with no status at all is also non-terminal
    backend.script_submission(ScriptedResponse::Job(ReportJob::new("8")));
    backend.script_polls("8", vec![ScriptedResponse::Job(ReportJob::new("8"))]);

    let session = session(backend.clone());
    let tracked = session.tracked_jobs().await.unwrap();
    assert_eq!(tracked.len(), 1);
    session.submit("enrollment_export", None).await.unwrap();

    sleep(TICK * 8).await;
    assert!(backend.poll_calls("7") >= 3, "pending job must keep polling");
    assert!(backend.poll_calls("8") >= 3, "status-less job must keep polling");

    session.shutdown();
    let stopped = backend.poll_calls("7");
    sleep(TICK * 5).await;
    assert_eq!(backend.poll_calls("7"), stopped, "teardown must stop polling");
}

#[tokio::test]
async fn history_and_active_jobs_poll_independently() {
    let backend = Arc::new(ScriptedBackend::new());
    backend.set_history(vec![
        ReportJob::new("h1").with_status("running"),
        ReportJob::new("h2").with_status("completed"),
    ]);
    backend.script_polls(
        "h1",
        vec![
            ScriptedResponse::Job(ReportJob::new("h1").with_status("running")),
            ScriptedResponse::Job(ReportJob::new("h1").with_status("completed")),
        ],
    );

    let session = session(backend.clone());
    let tracked = session.tracked_jobs().await.unwrap();
    assert_eq!(tracked.len(), 2);

    wait_settled(&session, "h1").await;
    // h2 settles on its first fetch (history fallback reports completed)
    wait_settled(&session, "h2").await;
    assert_eq!(backend.poll_calls("h2"), 1);
}

#[tokio::test]
async fn manual_refresh_is_an_out_of_band_poll() {
    let backend = Arc::new(ScriptedBackend::new());
    backend.script_polls(
        "42",
        vec![ScriptedResponse::Job(
            ReportJob::new("42").with_status("running").with_progress(60.0),
        )],
    );

    let session = session(backend.clone());
    let job = session.refresh("42").await.unwrap();
    assert_eq!(job.progress, Some(60.0));
    assert_eq!(session.job("42").unwrap().progress, Some(60.0));
    assert_eq!(backend.poll_calls("42"), 1);
}
