use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use taleweaver_rate_limit::{
    AdmissionGate, BackoffSchedule, RequestThrottle, TaleweaverConfig, ThrottleSet,
};

#[test]
fn backoff_doubles_until_cap() {
    let schedule = BackoffSchedule::new(Duration::from_millis(500), Duration::from_millis(8000));
    let delays: Vec<u64> = (0..7).map(|n| schedule.delay(n).as_millis() as u64).collect();
    assert_eq!(delays, vec![500, 1000, 2000, 4000, 8000, 8000, 8000]);
}

#[test]
fn backoff_survives_huge_exponents() {
    let schedule = BackoffSchedule::new(Duration::from_secs(1), Duration::from_secs(30));
    assert_eq!(schedule.delay(200), Duration::from_secs(30));
    assert_eq!(BackoffSchedule::none().delay(3), Duration::ZERO);
}

#[test]
fn cap_below_base_is_raised() {
    let schedule = BackoffSchedule::new(Duration::from_secs(2), Duration::from_secs(1));
    assert_eq!(schedule.cap(), Duration::from_secs(2));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn gate_bounds_concurrent_holders() {
    let gate = AdmissionGate::new(2);
    let in_flight = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));

    let mut tasks = tokio::task::JoinSet::new();
    for _ in 0..10 {
        let gate = gate.clone();
        let in_flight = in_flight.clone();
        let peak = peak.clone();
        tasks.spawn(async move {
            let _permit = gate.acquire().await;
            let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(10)).await;
            in_flight.fetch_sub(1, Ordering::SeqCst);
        });
    }
    while tasks.join_next().await.is_some() {}

    assert!(peak.load(Ordering::SeqCst) <= 2);
    assert_eq!(gate.available(), 2);
}

#[tokio::test]
async fn closed_gate_refuses_admission() {
    let gate = AdmissionGate::new(1);
    let held = gate.try_acquire();
    assert!(held.is_some());
    assert!(gate.try_acquire().is_none());

    gate.close();
    assert!(gate.acquire().await.is_none());
}

#[test]
fn zero_capacity_gate_admits_one() {
    assert_eq!(AdmissionGate::new(0).capacity(), 1);
}

#[test]
fn throttle_allows_burst_then_blocks() {
    let throttle = RequestThrottle::per_minute(2).unwrap();
    assert!(throttle.try_acquire());
    assert!(throttle.try_acquire());
    assert!(!throttle.try_acquire());
    assert!(RequestThrottle::per_minute(0).is_none());
}

#[tokio::test]
async fn throttle_set_follows_provider_config() -> anyhow::Result<()> {
    let config = TaleweaverConfig::bundled()?;
    let throttles = ThrottleSet::from_config(&config);

    assert_eq!(throttles.len(), 1);
    assert_eq!(throttles.get("stability").map(|t| t.rpm()), Some(150));
    assert!(throttles.get("openai").is_none());

    throttles.until_ready("openai").await;
    throttles.until_ready("stability").await;
    Ok(())
}
