use std::sync::Arc;
use std::time::Duration;
use taleweaver_core::{FailureKind, RequestClass};
use taleweaver_delegation::{Candidate, DelegationPlan, DelegationPolicy, NextStep};
use taleweaver_interface::ProviderRegistry;
use taleweaver_rate_limit::{BackoffSchedule, TaleweaverConfig};

mod test_utils;
use test_utils::{Reply, ScriptedProvider};

fn backoff() -> BackoffSchedule {
    BackoffSchedule::new(Duration::from_millis(500), Duration::from_millis(2000))
}

fn plan(candidates: Vec<Candidate>, limit: u32) -> DelegationPlan {
    DelegationPlan::new(RequestClass::SceneText, candidates, limit, backoff())
}

fn attempt(plan: &mut DelegationPlan) -> (String, Duration) {
    match plan.next() {
        NextStep::Attempt { provider, delay } => (provider, delay),
        NextStep::Exhausted => panic!("plan exhausted early"),
    }
}

#[test]
fn three_candidates_with_budget_two_allow_six_attempts() {
    let mut plan = plan(
        vec![
            Candidate::new("a", 2),
            Candidate::new("b", 2),
            Candidate::new("c", 2),
        ],
        8,
    );

    let mut providers = Vec::new();
    while let NextStep::Attempt { provider, .. } = plan.next() {
        providers.push(provider);
        plan.record_failure(FailureKind::InvalidResponse);
    }

    assert_eq!(providers, vec!["a", "a", "b", "b", "c", "c"]);
    assert_eq!(plan.total_attempts(), 6);
}

#[test]
fn rate_limits_back_off_exponentially_and_carry_over() {
    let mut plan = plan(vec![Candidate::new("a", 3), Candidate::new("b", 3)], 8);

    assert_eq!(attempt(&mut plan), ("a".to_string(), Duration::ZERO));
    plan.record_failure(FailureKind::RateLimited);
    assert_eq!(attempt(&mut plan), ("a".to_string(), Duration::from_millis(500)));
    plan.record_failure(FailureKind::RateLimited);
    assert_eq!(attempt(&mut plan), ("a".to_string(), Duration::from_millis(1000)));
    plan.record_failure(FailureKind::RateLimited);

    // Budget spent: the delay still applies before the next candidate, and
    // the new candidate starts its own backoff sequence.
    assert_eq!(attempt(&mut plan), ("b".to_string(), Duration::from_millis(2000)));
    plan.record_failure(FailureKind::RateLimited);
    assert_eq!(attempt(&mut plan), ("b".to_string(), Duration::from_millis(500)));
}

#[test]
fn backoff_is_capped() {
    let mut plan = plan(vec![Candidate::new("a", 6)], 8);
    let mut delays = Vec::new();
    while let NextStep::Attempt { delay, .. } = plan.next() {
        delays.push(delay.as_millis() as u64);
        plan.record_failure(FailureKind::RateLimited);
    }
    assert_eq!(delays, vec![0, 500, 1000, 2000, 2000, 2000]);
}

#[test]
fn timeouts_retry_once_per_candidate() {
    let mut plan = plan(vec![Candidate::new("a", 5), Candidate::new("b", 5)], 8);

    assert_eq!(attempt(&mut plan).0, "a");
    plan.record_failure(FailureKind::Timeout);
    assert_eq!(attempt(&mut plan).0, "a");
    plan.record_failure(FailureKind::Timeout);
    assert_eq!(attempt(&mut plan).0, "b");
}

#[test]
fn unavailable_advances_immediately_without_delay() {
    let mut plan = plan(vec![Candidate::new("a", 3), Candidate::new("b", 3)], 8);

    attempt(&mut plan);
    plan.record_failure(FailureKind::ProviderUnavailable);
    assert_eq!(attempt(&mut plan), ("b".to_string(), Duration::ZERO));
}

#[test]
fn invalid_response_has_no_delay() {
    let mut plan = plan(vec![Candidate::new("a", 3)], 8);

    attempt(&mut plan);
    plan.record_failure(FailureKind::RateLimited);
    attempt(&mut plan);
    plan.record_failure(FailureKind::InvalidResponse);
    assert_eq!(attempt(&mut plan), ("a".to_string(), Duration::ZERO));
}

#[test]
fn attempt_limit_caps_total_attempts() {
    let mut plan = plan(vec![Candidate::new("a", 5), Candidate::new("b", 5)], 3);
    let mut count = 0;
    while let NextStep::Attempt { .. } = plan.next() {
        count += 1;
        plan.record_failure(FailureKind::InvalidResponse);
    }
    assert_eq!(count, 3);
}

#[test]
fn policy_skips_unregistered_and_unsupported_candidates() {
    let registry = ProviderRegistry::new()
        .with(Arc::new(ScriptedProvider::text("writer", Reply::Invalid)))
        .with(Arc::new(ScriptedProvider::new(
            "painter",
            vec![RequestClass::Image],
            Reply::Image,
        )));
    let policy = DelegationPolicy::new(8, backoff()).with_candidates(
        RequestClass::SceneText,
        vec![
            Candidate::new("ghost", 2),
            Candidate::new("painter", 2),
            Candidate::new("writer", 2),
            Candidate::new("writer", 4),
        ],
    );

    let mut plan = policy.plan(RequestClass::SceneText, &registry, 8);
    assert_eq!(plan.current().map(|c| c.budget), Some(2));

    let mut providers = Vec::new();
    while let NextStep::Attempt { provider, .. } = plan.next() {
        providers.push(provider);
        plan.record_failure(FailureKind::InvalidResponse);
    }
    assert_eq!(providers, vec!["writer", "writer"]);
}

#[test]
fn request_budget_lowers_the_ceiling() {
    let registry =
        ProviderRegistry::new().with(Arc::new(ScriptedProvider::text("writer", Reply::Invalid)));
    let policy = DelegationPolicy::new(8, backoff())
        .with_candidates(RequestClass::SceneText, vec![Candidate::new("writer", 5)]);

    let mut plan = policy.plan(RequestClass::SceneText, &registry, 1);
    assert!(matches!(plan.next(), NextStep::Attempt { .. }));
    plan.record_failure(FailureKind::InvalidResponse);
    assert_eq!(plan.next(), NextStep::Exhausted);
}

#[test]
fn policy_reads_budgets_from_config() -> anyhow::Result<()> {
    let config = TaleweaverConfig::from_toml_str(
        "[providers.anthropic]\nkind = \"anthropic\"\nclasses = [\"scene_text\"]\nretry_budget = 3\n",
    )?;
    let policy = DelegationPolicy::from_config(&config);

    let text = policy.candidates(RequestClass::SceneText);
    assert_eq!(text[0], Candidate::new("openai", 2));
    assert_eq!(text[1], Candidate::new("anthropic", 3));
    assert_eq!(policy.ceiling(), 8);
    Ok(())
}
