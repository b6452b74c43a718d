use gasprobe_estimator::{
    EstimateError, Estimator, EstimatorConfig, Gas, Oracle, OracleError, Priming, PrimingStrategy,
    ProbeOutcome, ProbeRecorder, ProbeStatus, TableEntry, TableOracle, Violation,
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::cell::Cell;

const CEILING: Gas = 15_000_000;

fn single(used: Gas, required: Gas) -> TableOracle {
    TableOracle::new(vec![TableEntry::new("contract", used, required)]).unwrap()
}

fn estimate_single(used: Gas, required: Gas) -> gasprobe_estimator::EstimationResult {
    let oracle = single(used, required);
    let estimator = Estimator::new(&oracle, EstimatorConfig::default()).unwrap();
    estimator.estimate(&0).unwrap()
}

/// Ratio check without floats: (limit - required) / limit <= percent / 100.
fn within_tolerance(limit: Gas, required: Gas, percent: u64) -> bool {
    limit >= required && (limit - required) * 100 <= limit * percent
}

#[test]
fn test_used_equals_required() {
    let result = estimate_single(24_000, 24_000);

    assert_eq!(result.status, ProbeStatus::Success);
    assert!(within_tolerance(result.limit, 24_000, 10));
    assert_eq!(result.limit, 25_500);
    assert_eq!(result.iterations, 7);
}

#[test]
fn test_required_far_above_used() {
    let result = estimate_single(30_000, 100_000);

    assert_eq!(result.status, ProbeStatus::Success);
    assert!(result.limit >= 100_000);
    assert!(result.limit <= 110_000);
    assert_eq!(result.limit, 104_560);
}

#[test]
fn test_small_gap_between_used_and_required() {
    let result = estimate_single(23_000, 28_000);

    assert_eq!(result.status, ProbeStatus::Success);
    assert_eq!(result.limit, 28_750);
}

#[test]
fn test_large_contract() {
    let result = estimate_single(1_400_000, 1_750_000);

    assert_eq!(result.status, ProbeStatus::Success);
    assert!((1_750_000..=1_925_000).contains(&result.limit));
    assert_eq!(result.iterations, 6);
}

#[test]
fn test_required_above_ceiling() {
    let result = estimate_single(20_000_000, 20_000_000);

    assert_eq!(result.status, ProbeStatus::Exhausted);
    assert_eq!(result.limit, CEILING);
    assert_eq!(result.iterations, 1);
}

#[test]
fn test_reference_table() {
    let oracle = TableOracle::reference();
    let estimator = Estimator::new(&oracle, EstimatorConfig::default()).unwrap();

    let limits: Vec<Gas> = (0..oracle.len())
        .map(|work| estimator.estimate(&work).unwrap().limit)
        .collect();

    assert_eq!(limits, vec![25_500, 104_560, 28_750, 1_750_000]);
}

#[test]
fn test_unknown_work_propagates() {
    let oracle = TableOracle::reference();
    let estimator = Estimator::new(&oracle, EstimatorConfig::default()).unwrap();

    let err = estimator.estimate(&42).unwrap_err();
    assert!(matches!(err, EstimateError::Oracle(OracleError::UnknownWork(_))));
}

/// Succeeds once at the ceiling, then starts reporting more gas burned than it
/// was given: the work "succeeds" at a low limit it cannot actually fit in.
struct DriftingOracle {
    calls: Cell<u32>,
}

impl Oracle for DriftingOracle {
    type Work = str;

    fn probe(&self, _work: &str, limit: Gas) -> Result<ProbeOutcome, OracleError> {
        let calls = self.calls.get() + 1;
        self.calls.set(calls);

        if calls == 1 {
            Ok(ProbeOutcome::Success { consumed: 30_000 })
        } else if limit < 500_000 {
            Ok(ProbeOutcome::Success { consumed: 500_000 })
        } else {
            Ok(ProbeOutcome::Exhausted { consumed: limit })
        }
    }
}

#[test]
fn test_inconsistent_oracle_aborts() {
    let oracle = DriftingOracle {
        calls: Cell::new(0),
    };
    let estimator = Estimator::new(oracle, EstimatorConfig::default()).unwrap();

    let err = estimator.estimate("drifting").unwrap_err();
    assert!(matches!(
        err,
        EstimateError::InvariantViolation(Violation::OverConsumption {
            limit: 90_000,
            consumed: 500_000
        })
    ));
    assert!(err.to_string().starts_with("invariant violated"));
}

/// Sends the search straight back to the limit that just succeeded.
struct RetryCeiling;

impl PrimingStrategy for RetryCeiling {
    fn next_limit(&self, _consumed: Gas, _low: Gas, high: Gas) -> Gas {
        high
    }
}

/// Succeeds on the first call only.
struct FlakyOracle {
    calls: Cell<u32>,
}

impl Oracle for FlakyOracle {
    type Work = str;

    fn probe(&self, _work: &str, limit: Gas) -> Result<ProbeOutcome, OracleError> {
        let calls = self.calls.get() + 1;
        self.calls.set(calls);

        if calls == 1 {
            Ok(ProbeOutcome::Success { consumed: 30_000 })
        } else {
            Ok(ProbeOutcome::Exhausted { consumed: limit })
        }
    }
}

#[test]
fn test_failure_at_proven_limit_aborts() {
    let oracle = FlakyOracle {
        calls: Cell::new(0),
    };
    let estimator =
        Estimator::with_priming(oracle, EstimatorConfig::default(), RetryCeiling).unwrap();
    let mut recorder = ProbeRecorder::new();

    let err = estimator.estimate_traced("flaky", &mut recorder).unwrap_err();
    assert!(matches!(
        err,
        EstimateError::InvariantViolation(Violation::CollapsedBracket { limit: CEILING })
    ));

    let mids: Vec<Gas> = recorder.records().iter().map(|r| r.mid).collect();
    assert_eq!(mids, vec![CEILING, CEILING]);
}

/// Reports running out of gas after burning only half of it.
struct HalfBurnOracle;

impl Oracle for HalfBurnOracle {
    type Work = str;

    fn probe(&self, _work: &str, limit: Gas) -> Result<ProbeOutcome, OracleError> {
        Ok(ProbeOutcome::Exhausted {
            consumed: limit / 2,
        })
    }
}

#[test]
fn test_exhaustion_below_limit_aborts() {
    let estimator = Estimator::new(HalfBurnOracle, EstimatorConfig::default()).unwrap();

    let err = estimator.estimate("half").unwrap_err();
    assert!(matches!(
        err,
        EstimateError::InvariantViolation(Violation::PartialExhaustion {
            limit: CEILING,
            consumed: 7_500_000
        })
    ));
}

#[test]
fn test_empty_table_rejects_every_work_unit() {
    let oracle = TableOracle::new(Vec::new()).unwrap();
    assert!(oracle.is_empty());

    let estimator = Estimator::new(&oracle, EstimatorConfig::default()).unwrap();
    let err = estimator.estimate(&0).unwrap_err();
    assert!(matches!(err, EstimateError::Oracle(OracleError::UnknownWork(_))));
}

#[test]
fn test_bounds_tighten_monotonically() {
    let oracle = TableOracle::reference();
    let estimator = Estimator::new(&oracle, EstimatorConfig::default()).unwrap();

    for work in 0..oracle.len() {
        let mut recorder = ProbeRecorder::new();
        let result = estimator.estimate_traced(&work, &mut recorder).unwrap();
        let records = recorder.records();

        assert_eq!(records.len() as u32, result.iterations);
        for record in records {
            assert!(record.low <= record.mid && record.mid <= record.high);
            assert!(record.high <= CEILING);
        }
        for pair in records.windows(2) {
            assert!(pair[1].high <= pair[0].high, "high widened: {:?}", pair);
            assert!(pair[1].low >= pair[0].low, "low widened: {:?}", pair);
        }
    }
}

#[test]
fn test_first_probe_at_ceiling() {
    let oracle = TableOracle::reference();
    let estimator = Estimator::new(&oracle, EstimatorConfig::default()).unwrap();
    let mut recorder = ProbeRecorder::new();

    estimator.estimate_traced(&1, &mut recorder).unwrap();

    let first = recorder.records()[0];
    assert_eq!(first.mid, CEILING);
    assert_eq!(first.outcome, ProbeOutcome::Success { consumed: 30_000 });

    // Priming jumps to 3x the consumed gas.
    assert_eq!(recorder.records()[1].mid, 90_000);
}

#[test]
fn test_repeat_estimates_agree() {
    let oracle = TableOracle::reference();
    let estimator = Estimator::new(&oracle, EstimatorConfig::default()).unwrap();

    for work in 0..oracle.len() {
        let first = estimator.estimate(&work).unwrap();
        let second = estimator.estimate(&work).unwrap();
        assert_eq!(first, second);
    }
}

#[test]
fn test_bisect_priming_takes_more_probes() {
    let oracle = single(24_000, 24_000);
    let estimator =
        Estimator::with_priming(&oracle, EstimatorConfig::default(), Priming::Bisect).unwrap();
    let primed = Estimator::new(&oracle, EstimatorConfig::default()).unwrap();

    let plain = estimator.estimate(&0).unwrap();
    let fast = primed.estimate(&0).unwrap();

    assert!(plain.is_success());
    assert!(within_tolerance(plain.limit, 24_000, 10));
    assert!(fast.iterations < plain.iterations);
}

#[test]
fn test_tighter_tolerance() {
    let oracle = single(30_000, 100_000);
    let config = EstimatorConfig::default().with_tolerance(1);
    let estimator = Estimator::new(&oracle, config).unwrap();
    assert_eq!(estimator.config().tolerance_percent, 1);

    let result = estimator.estimate(&0).unwrap();
    assert!(within_tolerance(result.limit, 100_000, 1));
}

#[test]
fn test_zero_tolerance_finds_exact_requirement() {
    let oracle = single(30_000, 100_000);
    let config = EstimatorConfig::default().with_tolerance(0);
    let estimator = Estimator::new(&oracle, config).unwrap();

    let result = estimator.estimate(&0).unwrap();
    assert!(result.limit == 100_000 || result.limit == 100_001);
}

#[test]
fn test_random_tables_within_tolerance() {
    let mut rng = StdRng::seed_from_u64(0x6a5);
    let config = EstimatorConfig::default();

    for _ in 0..500 {
        let required = rng.gen_range(config.min_limit..=config.max_limit);
        let used = rng.gen_range(0..=required);
        let oracle = single(used, required);
        let estimator = Estimator::new(&oracle, config.clone()).unwrap();

        let mut recorder = ProbeRecorder::new();
        let result = estimator.estimate_traced(&0, &mut recorder).unwrap();

        assert!(result.is_success(), "used {} required {}", used, required);
        assert!(
            within_tolerance(result.limit, required, config.tolerance_percent),
            "limit {} for required {}",
            result.limit,
            required
        );
        // log2(15M) is under 24, plus priming.
        assert!(result.iterations <= 32, "{} iterations", result.iterations);

        for pair in recorder.records().windows(2) {
            assert!(pair[1].high <= pair[0].high);
            assert!(pair[1].low >= pair[0].low);
        }
    }
}

#[test]
fn test_random_unsatisfiable() {
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..50 {
        let required = rng.gen_range(CEILING + 1..=CEILING * 4);
        let result = estimate_single(required / 2, required);
        assert_eq!(result.status, ProbeStatus::Exhausted);
        assert_eq!(result.limit, CEILING);
    }
}

#[test]
fn test_result_serializes() {
    let result = estimate_single(1_400_000, 1_750_000);
    let json = serde_json::to_value(result).unwrap();

    assert_eq!(json["limit"], 1_750_000);
    assert_eq!(json["iterations"], 6);
    assert_eq!(json["status"], "success");
}
