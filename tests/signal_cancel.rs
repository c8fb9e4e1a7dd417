mod common;

use std::time::{Duration, Instant};

use muffle::render::NoopProgress;
use muffle::supervise::{Invocation, SignalLatch, StreamKind, Supervisor, WAIT_POLL};

const SIGTERM: i32 = 15;

fn sleeper() -> Invocation {
    Invocation {
        command: vec!["sleep".to_string(), "5".to_string()],
        shell_commands: None,
        shell_env: None,
    }
}

#[test]
fn latch_records_only_the_first_signal() {
    let latch = SignalLatch::new();
    assert!(latch.get().is_none());

    latch.set(SIGTERM);
    latch.set(2);

    assert_eq!(latch.get(), Some(SIGTERM));
    assert!(latch.is_set());
}

#[tokio::test]
async fn latched_signal_cancels_a_running_child() {
    common::init_tracing();

    let latch = SignalLatch::new();
    let supervisor = Supervisor::new(latch.clone());
    let handle = tokio::spawn(async move { supervisor.run(sleeper(), &mut NoopProgress).await });

    // Let the child spawn and the wait loop settle into polling.
    tokio::time::sleep(Duration::from_millis(600)).await;
    let fired = Instant::now();
    latch.set(SIGTERM);

    let result = tokio::time::timeout(Duration::from_secs(3), handle)
        .await
        .expect("supervisor returned promptly after the latch fired")
        .expect("supervisor task completed");

    // Bounded latency: within a poll interval or so, not the child's
    // full five seconds.
    assert!(fired.elapsed() < WAIT_POLL * 3);

    assert_eq!(result.exit_code, -SIGTERM);
    assert!(result.errored);
    let noted = result
        .lines
        .iter()
        .any(|r| r.kind == StreamKind::Stderr && r.bytes.ends_with(b"SIGTERM"));
    assert!(noted, "a stderr record mentions the received signal");
}

#[tokio::test]
async fn latch_set_before_the_wait_loop_still_cancels() {
    common::init_tracing();

    let latch = SignalLatch::new();
    latch.set(SIGTERM);

    let started = Instant::now();
    let result = Supervisor::new(latch)
        .run(sleeper(), &mut NoopProgress)
        .await;

    assert_eq!(result.exit_code, -SIGTERM);
    assert!(started.elapsed() < Duration::from_secs(3));
}

#[tokio::test]
async fn output_before_the_signal_is_kept() {
    common::init_tracing();

    let latch = SignalLatch::new();
    let supervisor = Supervisor::new(latch.clone());
    let invocation = Invocation {
        command: vec![
            "sh".to_string(),
            "-c".to_string(),
            "echo early; sleep 5".to_string(),
        ],
        shell_commands: None,
        shell_env: None,
    };
    let handle = tokio::spawn(async move { supervisor.run(invocation, &mut NoopProgress).await });

    tokio::time::sleep(Duration::from_millis(600)).await;
    latch.set(SIGTERM);

    let result = tokio::time::timeout(Duration::from_secs(3), handle)
        .await
        .expect("bounded")
        .expect("join");

    assert!(
        result
            .lines
            .iter()
            .any(|r| r.kind == StreamKind::Stdout && r.bytes == b"early")
    );
    assert_eq!(result.exit_code, -SIGTERM);
}
