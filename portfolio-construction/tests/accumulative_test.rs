use chrono::{DateTime, Duration, TimeZone, Utc};
use portfolio_construction::{
    AccumulativeConfig, AccumulativeConstructor, AllocatorError, PercentMaterializer,
};
use trading::{
    Insight, InsightDirection, InstrumentId, PortfolioConstructor, PriceUpdate, SecurityChanges,
    WeightChange,
};

const EPS: f64 = 1e-9;

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 4, 8, 14, 30, 0).unwrap()
}

fn at(minutes: i64) -> DateTime<Utc> {
    t0() + Duration::minutes(minutes)
}

fn insight(
    instrument: InstrumentId,
    direction: InsightDirection,
    generated_min: i64,
    period_min: i64,
) -> Insight {
    Insight::new(
        instrument,
        direction,
        at(generated_min),
        Duration::minutes(period_min),
    )
}

fn constructor() -> AccumulativeConstructor {
    let _ = env_logger::builder().is_test(true).try_init();
    AccumulativeConstructor::new(AccumulativeConfig::default())
}

fn weight_of(changes: &[WeightChange], instrument: InstrumentId) -> Option<f64> {
    changes
        .iter()
        .rev()
        .find(|c| c.instrument_id() == instrument)
        .map(|c| c.weight())
}

#[test]
fn test_active_insight_applied_once_across_passes() {
    let mut pcm = constructor();

    let changes = pcm
        .evaluate(t0(), vec![insight(1, InsightDirection::Up, 0, 60)])
        .unwrap();
    assert_eq!(changes.len(), 1);
    assert!((changes[0].weight() - 0.03).abs() < EPS);

    // A new insight on another instrument forces a pass; instrument 1 stays put.
    let changes = pcm
        .evaluate(at(1), vec![insight(2, InsightDirection::Down, 1, 60)])
        .unwrap();
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].instrument_id(), 2);
    assert!((pcm.weight(1) - 0.03).abs() < EPS);
}

#[test]
fn test_untouched_instrument_stays_at_zero() {
    let mut pcm = constructor();
    pcm.evaluate(t0(), vec![insight(1, InsightDirection::Up, 0, 5)])
        .unwrap();
    pcm.evaluate(at(10), vec![]).unwrap();

    assert_eq!(pcm.weight(7), 0.0);
    assert!(pcm.weights().all(|(id, _)| id != 7));
}

#[test]
fn test_consecutive_up_insights_accumulate() {
    let mut pcm = constructor();

    pcm.evaluate(t0(), vec![insight(1, InsightDirection::Up, 0, 60)])
        .unwrap();
    let changes = pcm
        .evaluate(at(1), vec![insight(1, InsightDirection::Up, 1, 60)])
        .unwrap();

    assert!((weight_of(&changes, 1).unwrap() - 0.06).abs() < EPS);
}

#[test]
fn test_only_latest_insight_per_instrument_is_activated() {
    let mut pcm = constructor();
    let older = insight(1, InsightDirection::Up, 0, 60);
    let newer = insight(1, InsightDirection::Down, 1, 60);

    let changes = pcm.evaluate(at(1), vec![newer, older]).unwrap();

    assert_eq!(changes.len(), 1);
    assert!((changes[0].weight() + 0.03).abs() < EPS);
}

#[test]
fn test_down_insight_reverses_on_expiry() {
    let mut pcm = constructor();

    let changes = pcm
        .evaluate(t0(), vec![insight(1, InsightDirection::Down, 0, 5)])
        .unwrap();
    assert!((changes[0].weight() + 0.03).abs() < EPS);
    assert_eq!(pcm.next_expiry(), Some(at(5)));

    // Passes up to and including the cached expiry time are skipped.
    assert!(pcm.evaluate(at(5), vec![]).unwrap().is_empty());

    let changes = pcm.evaluate(at(6), vec![]).unwrap();
    assert_eq!(changes.len(), 1);
    assert!(changes[0].weight().abs() < EPS);
    assert_eq!(pcm.next_expiry(), None);
}

#[test]
fn test_flat_insight_steps_towards_zero() {
    let mut pcm = constructor();
    pcm.evaluate(t0(), vec![insight(1, InsightDirection::Up, 0, 60)])
        .unwrap();
    pcm.evaluate(at(1), vec![insight(1, InsightDirection::Up, 1, 60)])
        .unwrap();

    let changes = pcm
        .evaluate(at(2), vec![insight(1, InsightDirection::Flat, 2, 60)])
        .unwrap();
    assert!((weight_of(&changes, 1).unwrap() - 0.03).abs() < EPS);
}

#[test]
fn test_flat_insight_expiry_is_a_no_op() {
    let mut pcm = constructor();
    pcm.evaluate(t0(), vec![insight(1, InsightDirection::Up, 0, 60)])
        .unwrap();
    pcm.evaluate(at(1), vec![insight(1, InsightDirection::Up, 1, 60)])
        .unwrap();
    pcm.evaluate(at(2), vec![insight(1, InsightDirection::Flat, 2, 3)])
        .unwrap();
    assert!((pcm.weight(1) - 0.03).abs() < EPS);

    // The Flat expiry is still emitted, but the weight does not move back up.
    let changes = pcm.evaluate(at(6), vec![]).unwrap();
    assert_eq!(changes.len(), 1);
    assert!((changes[0].weight() - 0.03).abs() < EPS);
}

#[test]
fn test_universe_removal_flattens_and_suppresses_expiry() {
    let mut pcm = constructor();
    pcm.evaluate(
        t0(),
        vec![
            insight(1, InsightDirection::Up, 0, 10),
            insight(2, InsightDirection::Up, 0, 10),
        ],
    )
    .unwrap();

    pcm.on_securities_changed(&SecurityChanges::removed(vec![1]));
    let changes = pcm.evaluate(at(1), vec![]).unwrap();
    assert_eq!(changes, vec![WeightChange::flat(1)]);
    assert_eq!(pcm.weight(1), 0.0);

    // Only instrument 2 is still tracked, so only it expires.
    let changes = pcm.evaluate(at(11), vec![]).unwrap();
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].instrument_id(), 2);
    assert_eq!(pcm.weight(1), 0.0);
}

#[test]
fn test_removal_is_flattened_only_once() {
    let mut pcm = constructor();
    pcm.evaluate(t0(), vec![insight(1, InsightDirection::Up, 0, 10)])
        .unwrap();
    pcm.on_securities_changed(&SecurityChanges::removed(vec![3]));

    let first = pcm.evaluate(at(1), vec![]).unwrap();
    assert_eq!(first, vec![WeightChange::flat(3)]);

    let second = pcm.evaluate(at(2), vec![]).unwrap();
    assert!(second.is_empty());
}

#[test]
fn test_idle_passes_short_circuit() {
    let mut pcm = constructor();
    pcm.evaluate(t0(), vec![insight(1, InsightDirection::Up, 0, 10)])
        .unwrap();
    let next_expiry = pcm.next_expiry();
    let snapshot: Vec<(InstrumentId, f64)> = pcm.weights().collect();

    assert!(pcm.evaluate(at(2), vec![]).unwrap().is_empty());
    assert!(pcm.evaluate(at(3), vec![]).unwrap().is_empty());
    assert_eq!(pcm.next_expiry(), next_expiry);
    assert_eq!(pcm.weights().collect::<Vec<_>>(), snapshot);

    // Past the cached expiry the pass runs again.
    let changes = pcm.evaluate(at(11), vec![]).unwrap();
    assert_eq!(changes.len(), 1);
    assert!(changes[0].weight().abs() < EPS);
}

#[test]
fn test_expiry_without_activation_is_fatal() {
    let mut pcm = constructor();

    // Already closed on arrival: never active, so nothing was accumulated.
    let stale = insight(9, InsightDirection::Up, 0, 5);
    let err = pcm.evaluate(at(10), vec![stale]).unwrap_err();

    assert!(matches!(
        err,
        AllocatorError::MissingWeight { instrument_id: 9, .. }
    ));
}

#[test]
fn test_insight_filter_rejects_before_tracking() {
    let mut pcm = constructor()
        .with_insight_filter(|insight| insight.direction() != InsightDirection::Flat);

    let changes = pcm
        .evaluate(
            t0(),
            vec![
                insight(1, InsightDirection::Flat, 0, 10),
                insight(2, InsightDirection::Up, 0, 10),
            ],
        )
        .unwrap();

    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].instrument_id(), 2);
    assert_eq!(pcm.ledger().len(), 1);
}

#[test]
fn test_custom_percent_and_sign_normalisation() {
    let mut pcm = AccumulativeConstructor::new(AccumulativeConfig::new(-0.1));
    assert_eq!(pcm.percent(), 0.1);

    let changes = pcm
        .evaluate(t0(), vec![insight(1, InsightDirection::Down, 0, 10)])
        .unwrap();
    assert!((changes[0].weight() + 0.1).abs() < EPS);
}

#[test]
fn test_create_targets_reports_unsized_instruments() {
    let mut pcm = constructor();
    let mut materializer = PercentMaterializer::new(100_000.0);
    materializer.on_price(&PriceUpdate::new(1, 100.0, t0()));

    let batch = pcm
        .create_targets(
            t0(),
            vec![
                insight(1, InsightDirection::Up, 0, 10),
                insight(2, InsightDirection::Up, 0, 10),
            ],
            &materializer,
        )
        .unwrap();

    // 0.03 * 100000 / 100 = 30 units
    assert_eq!(batch.len(), 1);
    assert_eq!(batch.targets()[0].instrument_id(), 1);
    assert!((batch.targets()[0].quantity() - 30.0).abs() < EPS);
    assert!(batch.is_failed(2));
    // The failure does not roll back the accumulated weight.
    assert!((pcm.weight(2) - 0.03).abs() < EPS);
}

#[test]
fn test_create_targets_flattens_removed_without_price() {
    let mut pcm = constructor();
    let materializer = PercentMaterializer::new(100_000.0);

    pcm.on_securities_changed(&SecurityChanges::removed(vec![4]));
    let batch = pcm.create_targets(t0(), vec![], &materializer).unwrap();

    assert_eq!(batch.len(), 1);
    assert_eq!(batch.targets()[0].instrument_id(), 4);
    assert_eq!(batch.targets()[0].quantity(), 0.0);
    assert!(batch.failed().is_empty());
}
