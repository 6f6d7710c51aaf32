use std::sync::Arc;
use std::time::Duration;

use exam_core::model::{ExamDefinition, Question, QuestionId, SubmitReason};
use exam_core::time::fixed_now;
use services::{
    Clock, ExamLoopService, ExamSession, SessionError, SessionIntent, SessionRunner,
    SessionStatus, ShuffleOptions, Shuffler,
};
use storage::InMemoryExamSource;

fn build_exam(minutes: u32) -> ExamDefinition {
    let questions = (1..=3)
        .map(|id| {
            Question::new(
                QuestionId::from(id),
                format!("Q{id}"),
                vec!["a".into(), "b".into()],
                0,
                1.0,
            )
            .unwrap()
        })
        .collect();
    ExamDefinition::new("Runner", minutes, questions).unwrap()
}

fn started_session(minutes: u32) -> ExamSession {
    let mut session = ExamSession::new(Clock::fixed(fixed_now()));
    session.start(build_exam(minutes));
    session
}

#[tokio::test(start_paused = true)]
async fn expiry_submits_without_answers() {
    let handle = SessionRunner::new(started_session(1)).spawn();
    assert_eq!(handle.snapshot().remaining_secs, 60);

    let summary = handle.finished().await.unwrap();

    assert_eq!(summary.reason, SubmitReason::Expired);
    assert_eq!(summary.remaining_secs, 0);
    assert_eq!(summary.result.answered_count, 0);
    assert_eq!(summary.result.total_questions, 3);
}

#[tokio::test(start_paused = true)]
async fn pause_freezes_remaining_time() {
    let handle = SessionRunner::new(started_session(1)).spawn();

    tokio::time::sleep(Duration::from_millis(5_500)).await;
    assert_eq!(handle.snapshot().remaining_secs, 55);

    handle.send(SessionIntent::Pause).await.unwrap();
    tokio::time::sleep(Duration::from_secs(10)).await;
    let paused = handle.snapshot();
    assert_eq!(paused.status, SessionStatus::Paused);
    assert_eq!(paused.remaining_secs, 55);

    handle.send(SessionIntent::Resume).await.unwrap();
    tokio::time::sleep(Duration::from_millis(2_500)).await;
    assert_eq!(handle.snapshot().remaining_secs, 53);

    let summary = handle.submit().await.unwrap();
    assert_eq!(summary.reason, SubmitReason::Manual);
    assert_eq!(summary.remaining_secs, 53);
}

#[tokio::test(start_paused = true)]
async fn intents_are_applied_and_published() {
    let handle = SessionRunner::new(started_session(5)).spawn();
    let mut updates = handle.subscribe();

    handle.send(SessionIntent::GoTo(2)).await.unwrap();
    handle.send(SessionIntent::SelectAnswer(0)).await.unwrap();
    updates.changed().await.unwrap();

    let snapshot = handle.snapshot();
    assert_eq!(snapshot.current_index, 2);
    assert_eq!(snapshot.answers, vec![None, None, Some(0)]);
    assert!(snapshot.grid[2].answered && snapshot.grid[2].current);

    let err = handle.send(SessionIntent::GoTo(9)).await.unwrap_err();
    assert!(matches!(err, SessionError::InvalidIndex { index: 9, len: 3 }));

    let summary = handle.submit().await.unwrap();
    assert_eq!(summary.result.score, 1.0);
    assert_eq!(summary.result.answered_count, 1);
}

#[tokio::test(start_paused = true)]
async fn runner_rejects_intents_after_completion() {
    let handle = SessionRunner::new(started_session(5)).spawn();
    handle.send(SessionIntent::Submit).await.unwrap();

    let err = handle.send(SessionIntent::Next).await.unwrap_err();
    assert!(matches!(err, SessionError::Closed));
    assert_eq!(handle.snapshot().status, SessionStatus::Completed);
}

#[tokio::test(start_paused = true)]
async fn abandoning_a_paused_attempt_closes_the_runner() {
    let handle = SessionRunner::new(started_session(5)).spawn();
    handle.send(SessionIntent::Pause).await.unwrap();

    let err = handle.finished().await.unwrap_err();
    assert!(matches!(err, SessionError::Closed));
}

#[tokio::test(start_paused = true)]
async fn custom_tick_period_scales_the_countdown() {
    let handle = SessionRunner::new(started_session(1))
        .with_tick_period(Duration::from_millis(100))
        .spawn();

    tokio::time::sleep(Duration::from_millis(550)).await;
    assert_eq!(handle.snapshot().remaining_secs, 55);

    let summary = handle.finished().await.unwrap();
    assert_eq!(summary.reason, SubmitReason::Expired);
}

#[tokio::test(start_paused = true)]
async fn zero_tick_period_is_clamped_and_still_expires() {
    let runner = SessionRunner::new(started_session(1)).with_tick_period(Duration::ZERO);
    assert_eq!(runner.tick_period(), Duration::from_millis(1));

    let summary = runner.spawn().finished().await.unwrap();
    assert_eq!(summary.reason, SubmitReason::Expired);
    assert_eq!(summary.remaining_secs, 0);
}

#[tokio::test(start_paused = true)]
async fn loop_service_spawns_running_attempt() {
    let loop_svc = ExamLoopService::new(
        Clock::fixed(fixed_now()),
        Arc::new(InMemoryExamSource::new(build_exam(1))),
    )
    .with_shuffler(Shuffler::new().with_options(ShuffleOptions::none()));

    let handle = loop_svc.spawn_attempt().await.unwrap();
    assert_eq!(handle.snapshot().status, SessionStatus::InProgress);
    assert_eq!(handle.snapshot().title, "Runner");

    let summary = handle.finished().await.unwrap();
    assert_eq!(summary.reason, SubmitReason::Expired);
}
