use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use storegate::GateError;
use storegate::service::readiness::wait_until_ready;

const PROBE_INTERVAL: Duration = Duration::from_millis(5);

#[tokio::test]
async fn probe_stops_as_soon_as_the_dependency_is_ready() {
    let attempts = AtomicUsize::new(0);
    let result = wait_until_ready(
        || {
            let n = attempts.fetch_add(1, Ordering::SeqCst) + 1;
            async move {
                if n >= 3 {
                    Ok(())
                } else {
                    Err("connection refused")
                }
            }
        },
        PROBE_INTERVAL,
        60,
    )
    .await;

    assert!(result.is_ok());
    assert_eq!(attempts.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn immediate_readiness_probes_exactly_once() {
    let attempts = AtomicUsize::new(0);
    let result = wait_until_ready(
        || {
            attempts.fetch_add(1, Ordering::SeqCst);
            async { Ok::<(), &str>(()) }
        },
        PROBE_INTERVAL,
        60,
    )
    .await;

    assert!(result.is_ok());
    assert_eq!(attempts.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn exhausted_budget_reports_not_ready_after_every_attempt() {
    let attempts = AtomicUsize::new(0);
    let result = wait_until_ready(
        || {
            attempts.fetch_add(1, Ordering::SeqCst);
            async { Err::<(), &str>("connection refused") }
        },
        PROBE_INTERVAL,
        5,
    )
    .await;

    assert_eq!(attempts.load(Ordering::SeqCst), 5);
    match result {
        Err(GateError::NotReady { attempts }) => assert_eq!(attempts, 5),
        other => panic!("expected NotReady, got {other:?}"),
    }
}

#[tokio::test]
async fn zero_budget_still_probes_once() {
    let attempts = AtomicUsize::new(0);
    let result = wait_until_ready(
        || {
            attempts.fetch_add(1, Ordering::SeqCst);
            async { Err::<(), &str>("connection refused") }
        },
        PROBE_INTERVAL,
        0,
    )
    .await;

    assert_eq!(attempts.load(Ordering::SeqCst), 1);
    assert!(matches!(result, Err(GateError::NotReady { attempts: 1 })));
}
