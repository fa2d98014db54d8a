use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use notify::event::CreateKind;
use notify::EventKind;
use tokio::sync::mpsc;
use tokio::time::sleep;

use prefix::engine::{Debouncer, Runtime, RuntimeEvent};
use prefix::fs::mock::MockFileSystem;
use prefix::fs::FileSystem;
use prefix::organize::{OrganizeOutcome, Organizer};
use prefix::organize_and_report;
use prefix_test_utils::builders::ConfigFileBuilder;
use prefix_test_utils::{debounce_deadline, init_tracing, with_timeout};

type TestResult = Result<(), Box<dyn Error>>;

const WINDOW: Duration = Duration::from_secs(5);

fn created(path: &str) -> RuntimeEvent {
    RuntimeEvent::PathsChanged {
        kind: EventKind::Create(CreateKind::File),
        paths: vec![PathBuf::from(path)],
    }
}

/// Runtime over a mock dump directory; each organize pass reports its
/// outcome on the returned channel.
fn reporting_runtime(
    fs: &MockFileSystem,
) -> (
    Runtime,
    mpsc::Sender<RuntimeEvent>,
    mpsc::UnboundedReceiver<Option<OrganizeOutcome>>,
) {
    let cfg = ConfigFileBuilder::new("/dump")
        .with_prefix_rule("/out/reports", "report_")
        .build();
    let organizer = Organizer::new(Arc::new(fs.clone()), Arc::new(cfg));

    let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
    let debouncer = Debouncer::new(WINDOW, move || {
        let _ = outcome_tx.send(organize_and_report(&organizer));
    });

    let (rt_tx, rt_rx) = mpsc::channel(16);
    (Runtime::new(debouncer, rt_rx), rt_tx, outcome_rx)
}

#[tokio::test(start_paused = true)]
async fn burst_of_events_leads_to_one_organize_pass() -> TestResult {
    init_tracing();
    let fs = MockFileSystem::new();
    fs.add_dir("/dump");
    let (runtime, tx, mut outcomes) = reporting_runtime(&fs);
    let handle = tokio::spawn(runtime.run());

    fs.add_file("/dump/report_a.pdf", b"a");
    tx.send(created("/dump/report_a.pdf")).await?;
    fs.add_file("/dump/report_b.pdf", b"b");
    tx.send(created("/dump/report_b.pdf")).await?;
    fs.add_file("/dump/todo.txt", b"t");
    tx.send(created("/dump/todo.txt")).await?;

    let outcome = with_timeout(debounce_deadline(WINDOW, 2), outcomes.recv())
        .await
        .ok_or("outcome channel closed")?;
    assert_eq!(outcome, Some(OrganizeOutcome { moved: 2, skipped: 1 }));
    assert!(fs.exists(Path::new("/out/reports/report_a.pdf")));
    assert!(fs.exists(Path::new("/out/reports/report_b.pdf")));

    sleep(WINDOW * 2).await;
    assert!(outcomes.try_recv().is_err(), "more than one pass ran");

    tx.send(RuntimeEvent::ShutdownRequested).await?;
    with_timeout(debounce_deadline(WINDOW, 1), handle).await??;
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn watch_errors_are_logged_and_do_not_stop_the_loop() -> TestResult {
    init_tracing();
    let fs = MockFileSystem::new();
    fs.add_dir("/dump");
    let (runtime, tx, mut outcomes) = reporting_runtime(&fs);
    let handle = tokio::spawn(runtime.run());

    tx.send(RuntimeEvent::WatchError("queue overflow".into())).await?;
    fs.add_file("/dump/report_x.pdf", b"x");
    tx.send(created("/dump/report_x.pdf")).await?;

    let outcome = with_timeout(debounce_deadline(WINDOW, 2), outcomes.recv())
        .await
        .ok_or("outcome channel closed")?;
    assert_eq!(outcome, Some(OrganizeOutcome { moved: 1, skipped: 0 }));

    tx.send(RuntimeEvent::ShutdownRequested).await?;
    with_timeout(debounce_deadline(WINDOW, 1), handle).await??;
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn shutdown_cancels_pending_pass() -> TestResult {
    init_tracing();
    let fs = MockFileSystem::new();
    fs.add_dir("/dump");
    let (runtime, tx, mut outcomes) = reporting_runtime(&fs);
    let handle = tokio::spawn(runtime.run());

    fs.add_file("/dump/report_late.pdf", b"late");
    tx.send(created("/dump/report_late.pdf")).await?;
    tx.send(RuntimeEvent::ShutdownRequested).await?;
    with_timeout(debounce_deadline(WINDOW, 1), handle).await??;

    sleep(WINDOW * 3).await;
    assert!(outcomes.try_recv().is_err(), "pass ran after shutdown");
    assert!(fs.exists(Path::new("/dump/report_late.pdf")));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn failing_pass_keeps_the_runtime_alive() -> TestResult {
    init_tracing();
    // No /dump at all: every pass fails to list the directory.
    let fs = MockFileSystem::new();
    let (runtime, tx, mut outcomes) = reporting_runtime(&fs);
    let handle = tokio::spawn(runtime.run());

    tx.send(created("/dump/whatever")).await?;
    let first = with_timeout(debounce_deadline(WINDOW, 2), outcomes.recv())
        .await
        .ok_or("outcome channel closed")?;
    assert_eq!(first, None);

    // Directory shows up; the next trigger retries and succeeds.
    fs.add_file("/dump/report_ok.pdf", b"ok");
    tx.send(created("/dump/report_ok.pdf")).await?;
    let second = with_timeout(debounce_deadline(WINDOW, 2), outcomes.recv())
        .await
        .ok_or("outcome channel closed")?;
    assert_eq!(second, Some(OrganizeOutcome { moved: 1, skipped: 0 }));

    tx.send(RuntimeEvent::ShutdownRequested).await?;
    with_timeout(debounce_deadline(WINDOW, 1), handle).await??;
    Ok(())
}

#[tokio::test]
async fn runtime_exits_when_all_senders_are_dropped() -> TestResult {
    init_tracing();
    let fs = MockFileSystem::new();
    fs.add_dir("/dump");
    let (runtime, tx, _outcomes) = reporting_runtime(&fs);

    drop(tx);
    with_timeout(debounce_deadline(WINDOW, 1), runtime.run()).await?;
    Ok(())
}
