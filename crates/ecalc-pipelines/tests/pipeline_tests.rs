//! End-to-end tests for the four operator pipelines.
//!
//! Latency is disabled everywhere except the pacing test, which runs on
//! tokio's paused clock.

use ecalc_codecs::dna::transcribe;
use ecalc_codecs::{Codec, DnaCodec, RnaCodec};
use ecalc_core::{CalcError, EventKind, PipelineState, RunConfig, RunReport};
use ecalc_pipelines::division::division_cost;
use ecalc_pipelines::{Calculator, Operator};
use proptest::prelude::*;

fn calculator() -> Calculator {
    Calculator::new(RunConfig::instant())
}

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
        .block_on(future)
}

fn messages(report: &RunReport) -> Vec<&str> {
    report.events.iter().map(|e| e.message.as_str()).collect()
}

fn assert_stage_order(calc: &Calculator, op: Operator, report: &RunReport) {
    let states = calc.pipeline(op).states();

    let transitions: Vec<PipelineState> = report
        .events
        .iter()
        .filter(|e| e.message.split(':').next() == Some(e.stage.as_str()))
        .map(|e| e.stage)
        .collect();
    assert_eq!(transitions, states, "{:?} transitions", op);

    let positions: Vec<usize> = report
        .events
        .iter()
        .map(|e| states.iter().position(|s| *s == e.stage).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] <= w[1]), "{:?} went backwards", op);

    for pair in report.events.windows(2) {
        assert!(pair[0].timestamp < pair[1].timestamp);
        assert!(pair[0].seq < pair[1].seq);
    }
}

// =============================================================================
// Example scenarios
// =============================================================================

#[tokio::test]
async fn test_addition_three_plus_four() {
    let calc = calculator();
    let report = calc.run(Operator::Add, 3, 4).await.unwrap();

    assert_eq!(report.result, 7);
    assert_eq!(report.warnings().count(), 0);

    let log = messages(&report).join("\n");
    assert!(log.contains("DNA Sequence A → AAGT"));
    assert!(log.contains("DNA Sequence B → ATAA"));
    assert!(log.contains("RNA Sequence A → AAGU"));
    assert!(log.contains("RNA Sequence B → AUAA"));
    assert!(log.contains("Result DNA → ATGT"));
}

#[tokio::test]
async fn test_division_seven_by_two() {
    let calc = calculator();
    let report = calc.run(Operator::Divide, 7, 2).await.unwrap();

    assert_eq!(report.result, 3);
    let beeps: Vec<_> = report.events.iter().filter(|e| e.kind == EventKind::Beep).collect();
    assert_eq!(beeps.len(), 6);
    assert!(beeps.iter().all(|e| e.stage == PipelineState::Processing));
    assert_eq!(beeps[0].message, "BEEP .");
    assert_eq!(beeps[1].message, "BEEP -");
    assert!(report.events.iter().all(|e| e.kind != EventKind::Error));

    let finalizing = report.events_in(PipelineState::Finalizing).next().unwrap();
    let transmission = finalizing.payload.as_ref().unwrap()["transmission"].as_str().unwrap();
    assert_eq!(transmission, "--... / ..... / ...--");
}

#[tokio::test]
async fn test_division_by_zero_is_fatal_before_codecs() {
    let calc = calculator();
    let err = calc.divide(5, 0).await.unwrap_err();
    assert_eq!(err, CalcError::DivisionByZero { dividend: 5 });

    let events = calc.drain();
    assert!(!events.is_empty());
    assert!(events.iter().all(|e| e.stage == PipelineState::Initializing));
    assert_eq!(events.last().unwrap().kind, EventKind::Error);
}

#[tokio::test]
async fn test_multiplication_negative_times_positive() {
    let calc = calculator();
    assert_eq!(calc.multiply(-3, 4).await.unwrap(), -12);
    assert_eq!(calc.multiply(-3, -4).await.unwrap(), 12);
    assert_eq!(calc.multiply(0, -4).await.unwrap(), 0);
}

#[tokio::test]
async fn test_subtraction_ten_minus_fifteen() {
    let calc = calculator();
    let report = calc.run(Operator::Subtract, 10, 15).await.unwrap();
    assert_eq!(report.result, -5);

    let plays: Vec<_> = report
        .events
        .iter()
        .filter(|e| e.message.starts_with("Playing:"))
        .collect();
    assert_eq!(plays.len(), 3);
    assert_eq!(plays[2].payload.as_ref().unwrap()["note"], "A4");
}

// =============================================================================
// Trace contract
// =============================================================================

#[tokio::test]
async fn test_every_pipeline_walks_its_states_in_order() {
    let calc = calculator();
    for op in Operator::ALL {
        let report = calc.run(op, 12, -5).await.unwrap();
        assert_stage_order(&calc, op, &report);
    }
}

#[tokio::test]
async fn test_emitter_keeps_only_latest_window() {
    let calc = Calculator::new(RunConfig::instant().with_trace_capacity(10));
    let report = calc.run(Operator::Divide, 40, 3).await.unwrap();
    assert!(report.events.len() > 10);

    let drained = calc.drain();
    assert_eq!(drained.len(), 10);
    let tail: Vec<u64> = report.events[report.events.len() - 10..].iter().map(|e| e.seq).collect();
    let drained_seq: Vec<u64> = drained.iter().map(|e| e.seq).collect();
    assert_eq!(drained_seq, tail);
    assert!(calc.drain().is_empty());
}

#[tokio::test]
async fn test_report_carries_complexity() {
    let calc = calculator();
    let small = calc.run(Operator::Add, 1, 1).await.unwrap();
    let large = calc.run(Operator::Multiply, 40, 40).await.unwrap();
    assert!(small.steps < large.steps);
    assert_eq!(large.complexity.notation, "O(2ⁿ)");
}

// =============================================================================
// Failure policy
// =============================================================================

#[tokio::test]
async fn test_long_division_hits_step_budget() {
    let calc = Calculator::new(RunConfig::instant().with_max_steps(1_000));
    let err = calc.divide(1_000_000, 1).await.unwrap_err();
    assert!(matches!(err, CalcError::StepBudgetExceeded { operation: "division", .. }));

    let events = calc.drain();
    assert!(events.iter().all(|e| e.kind != EventKind::Beep));
    assert_eq!(events.last().unwrap().kind, EventKind::Error);
}

#[tokio::test]
async fn test_division_within_budget_runs_to_completion() {
    let cost = division_cost(500, 1);
    assert_eq!(cost, 514);

    let calc = Calculator::new(RunConfig::instant().with_max_steps(cost));
    let report = calc.run(Operator::Divide, 500, 1).await.unwrap();
    assert_eq!(report.result, 500);
    assert_eq!(report.steps, cost);

    let calc = Calculator::new(RunConfig::instant().with_max_steps(cost - 1));
    let err = calc.divide(500, 1).await.unwrap_err();
    assert!(matches!(err, CalcError::StepBudgetExceeded { operation: "division", .. }));
    assert!(calc.drain().iter().all(|e| e.kind != EventKind::Beep));
}

#[tokio::test]
async fn test_default_budget_allows_long_division() {
    let calc = calculator();
    assert_eq!(calc.divide(20_000, 1).await.unwrap(), 20_000);
    assert_eq!(calc.divide(-20_000, 3).await.unwrap(), -6_666);
}

#[tokio::test]
async fn test_large_matrix_hits_step_budget() {
    let calc = Calculator::new(RunConfig::instant().with_max_steps(5_000));
    let err = calc.multiply(1_000, 1_000).await.unwrap_err();
    assert!(matches!(err, CalcError::StepBudgetExceeded { .. }));
}

#[tokio::test]
async fn test_huge_roman_numeral_is_refused() {
    let calc = calculator();
    let err = calc.multiply(i64::MAX, 1).await.unwrap_err();
    assert!(matches!(err, CalcError::StepBudgetExceeded { operation: "roman encoding", .. }));
}

#[tokio::test]
async fn test_addition_overflow_is_reported() {
    let calc = calculator();
    let err = calc.add(i64::MAX, 1).await.unwrap_err();
    assert_eq!(err, CalcError::Overflow { operation: "addition" });
}

#[tokio::test(start_paused = true)]
async fn test_realtime_profile_paces_stages() {
    let calc = Calculator::new(RunConfig::realtime());
    let start = tokio::time::Instant::now();
    assert_eq!(calc.add(2, 2).await.unwrap(), 4);
    assert!(start.elapsed() >= std::time::Duration::from_millis(300));
}

// =============================================================================
// Arithmetic properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn addition_returns_round_tripped_sum(
        a in -1_000_000i64..=1_000_000,
        b in -1_000_000i64..=1_000_000,
    ) {
        let expected = RnaCodec.decode(&transcribe(&DnaCodec.encode(a)))
            + RnaCodec.decode(&transcribe(&DnaCodec.encode(b)));
        prop_assert_eq!(block_on(calculator().add(a, b)).unwrap(), expected);
    }

    #[test]
    fn subtraction_is_exact(
        a in -1_000_000_000i64..=1_000_000_000,
        b in -1_000_000_000i64..=1_000_000_000,
    ) {
        prop_assert_eq!(block_on(calculator().subtract(a, b)).unwrap(), a - b);
    }

    #[test]
    fn multiplication_matches_product(a in -60i64..=60, b in -60i64..=60) {
        prop_assert_eq!(block_on(calculator().multiply(a, b)).unwrap(), a * b);
    }

    #[test]
    fn division_truncates_toward_zero(
        a in -400i64..=400,
        b in (-25i64..=25).prop_filter("non-zero", |b| *b != 0),
    ) {
        prop_assert_eq!(block_on(calculator().divide(a, b)).unwrap(), a / b);
    }

    #[test]
    fn division_spends_exactly_its_cost(
        a in -2_000i64..=2_000,
        b in (-40i64..=40).prop_filter("non-zero", |b| *b != 0),
    ) {
        let calc = Calculator::new(RunConfig::instant().with_max_steps(division_cost(a, b)));
        let report = block_on(calc.run(Operator::Divide, a, b)).unwrap();
        prop_assert_eq!(report.steps, division_cost(a, b));
    }

    #[test]
    fn division_by_zero_always_fatal(a in any::<i64>()) {
        let err = block_on(calculator().divide(a, 0)).unwrap_err();
        prop_assert_eq!(err, CalcError::DivisionByZero { dividend: a });
    }
}
