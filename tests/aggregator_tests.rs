//! Integration tests for trailing-window energy aggregation

mod helpers;

use blockenergy::{
    BatchLoader, DayBatchSize, EnergyAggregator, EnergyPerByte, EnergyValue, MemoryCache,
    RawBlock, SizeCache,
};
use helpers::{assert_energy_eq, MockBlockSource, DAY_MILLIS, NOW};
use std::sync::Arc;
use std::time::Duration;

fn create_aggregator(source: &Arc<MockBlockSource>, batch_size: u32) -> EnergyAggregator {
    let loader = Arc::new(BatchLoader::new(
        source.clone(),
        SizeCache::new(Arc::new(MemoryCache::new())),
        EnergyPerByte::default(),
        Duration::from_secs(604_800),
    ));
    EnergyAggregator::new(
        source.clone(),
        loader,
        DayBatchSize::new(batch_size).unwrap(),
    )
}

#[tokio::test]
async fn test_zero_days_is_zero_without_requests() {
    let source = Arc::new(MockBlockSource::new());
    let aggregator = create_aggregator(&source, 5);

    let report = aggregator.aggregate(0, NOW).await;

    assert_eq!(report.total, EnergyValue::ZERO);
    assert_eq!(report.batches, 0);
    assert!(source.day_requests().is_empty());
    assert_eq!(source.total_block_calls(), 0);
}

#[tokio::test]
async fn test_failed_day_contributes_nothing() {
    let source = Arc::new(
        MockBlockSource::new()
            .with_sized_blocks(&["d0", "d1", "d3", "d4", "d2"], 1000)
            .with_day(NOW.days_before(0), &["d0"])
            .with_day(NOW.days_before(1), &["d1"])
            .with_day(NOW.days_before(2), &["d2"])
            .with_failing_day(NOW.days_before(2))
            .with_day(NOW.days_before(3), &["d3"])
            .with_day(NOW.days_before(4), &["d4"]),
    );
    let aggregator = create_aggregator(&source, 5);

    let report = aggregator.aggregate(5, NOW).await;

    assert_eq!(report.total.as_f64(), 4.0 * 4560.0);
    assert_eq!(report.failed_days, 1);
    assert_eq!(report.blocks, 4);
    assert_eq!(report.batches, 1);
    assert_eq!(source.block_calls("d2"), 0);
}

#[tokio::test]
async fn test_day_timestamps_step_back_from_now() {
    let source = Arc::new(MockBlockSource::new());
    let aggregator = create_aggregator(&source, 5);

    aggregator.total_energy_at(12, NOW).await;

    let expected: Vec<i64> = (0..12)
        .map(|offset| NOW.as_millis() - offset * DAY_MILLIS)
        .collect();
    let requested: Vec<i64> = source
        .day_requests()
        .iter()
        .map(|day| day.as_millis())
        .collect();
    assert_eq!(requested, expected);
}

#[tokio::test(start_paused = true)]
async fn test_day_batches_run_sequentially() {
    let source = Arc::new(MockBlockSource::new().with_day_delay(Duration::from_millis(100)));
    let aggregator = create_aggregator(&source, 5);

    let report = aggregator.aggregate(12, NOW).await;

    assert_eq!(report.batches, 3);
    assert_eq!(source.day_requests().len(), 12);
    // Concurrent within a batch, never more than one batch at a time
    assert_eq!(source.max_days_in_flight(), 5);
}

#[tokio::test(start_paused = true)]
async fn test_batch_size_bounds_concurrency() {
    let source = Arc::new(MockBlockSource::new().with_day_delay(Duration::from_millis(100)));
    let aggregator = create_aggregator(&source, 2);

    aggregator.aggregate(7, NOW).await;

    assert_eq!(source.max_days_in_flight(), 2);
    assert_eq!(source.day_requests().len(), 7);
}

#[tokio::test]
async fn test_repeated_hashes_count_per_listing() {
    // Two sliding-window days may list the same block
    let source = Arc::new(
        MockBlockSource::new()
            .with_sized_blocks(&["shared"], 1000)
            .with_day(NOW.days_before(0), &["shared"])
            .with_day(NOW.days_before(1), &["shared"]),
    );
    let aggregator = create_aggregator(&source, 5);

    let report = aggregator.aggregate(2, NOW).await;

    assert_eq!(report.total.as_f64(), 2.0 * 4560.0);
    assert_eq!(report.blocks, 2);
    assert_eq!(source.block_calls("shared"), 1);
}

#[tokio::test]
async fn test_degraded_blocks_are_reported() {
    let source = Arc::new(
        MockBlockSource::new()
            .with_block("good", RawBlock::with_size(10))
            .with_failing_block("bad")
            .with_day(NOW, &["good", "bad"]),
    );
    let aggregator = create_aggregator(&source, 5);

    let report = aggregator.aggregate(1, NOW).await;

    assert_energy_eq(report.total, 45.6);
    assert_eq!(report.degraded_blocks, 1);
    assert_eq!(report.failed_days, 0);
}

#[tokio::test]
async fn test_totals_accumulate_across_batches() {
    let mut source = MockBlockSource::new();
    for offset in 0..7u32 {
        let hash = format!("b{offset}");
        source = source
            .with_sized_blocks(&[hash.as_str()], 1000)
            .with_day(NOW.days_before(offset), &[hash.as_str()]);
    }
    let source = Arc::new(source);
    let aggregator = create_aggregator(&source, 3);

    let total = aggregator.total_energy_at(7, NOW).await;

    assert_eq!(total.as_f64(), 7.0 * 4560.0);
    assert_eq!(source.total_block_calls(), 7);
}
