use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use rad_core::{ActorId, ExposureConfig, Position, SourceId, Timestamp};
use rad_runtime::{
    FileStateRepository, ManualClock, RosterOracle, Runtime, StateRepository, StorageFormat,
};

const ALICE: ActorId = ActorId(1);
const BOB: ActorId = ActorId(2);
const START: Timestamp = Timestamp(5_000_000);

fn at(x: f64) -> Position {
    Position::new("wasteland", x, 70.0, -4.0)
}

async fn boot(dir: &Path, format: StorageFormat, clock: Arc<ManualClock>) -> Runtime {
    let repository = FileStateRepository::new(dir, format).unwrap();
    Runtime::builder()
        .exposure_config(ExposureConfig::default())
        .periodic_ticks(false)
        .repository(repository)
        .actors(RosterOracle::new())
        .clock(clock)
        .build()
        .await
        .unwrap()
}

#[tokio::test]
async fn state_survives_restart_in_json() {
    let dir = tempfile::tempdir().unwrap();
    let clock = Arc::new(ManualClock::new(START));

    let runtime = boot(dir.path(), StorageFormat::Json, clock.clone()).await;
    let handle = runtime.handle();
    let first = handle
        .create_source("Crater", at(0.0), 25, 90, 7)
        .await
        .unwrap();
    let second = handle
        .create_source("Spill", at(40.0), 6, 30, 3)
        .await
        .unwrap();
    assert!(handle.remove_source(first.id()).await.unwrap());
    handle.set_exposure(ALICE, 64).await.unwrap();
    let expiry = handle
        .apply_timed_buff(BOB, Duration::from_secs(120))
        .await
        .unwrap();
    runtime.shutdown().await.unwrap();

    clock.advance(Duration::from_secs(60));
    let runtime = boot(dir.path(), StorageFormat::Json, clock.clone()).await;
    let handle = runtime.handle();

    assert_eq!(handle.sources().await.unwrap(), vec![second]);
    assert_eq!(handle.exposure(ALICE).await.unwrap(), 64);
    assert_eq!(handle.exposure(BOB).await.unwrap(), 0);
    assert!(handle.has_active_buff(BOB).await.unwrap());
    assert_eq!(expiry, START.plus_seconds(120));

    // Removed identities are never handed out again.
    let third = handle
        .create_source("Crater", at(0.0), 25, 90, 7)
        .await
        .unwrap();
    assert_eq!(third.id(), SourceId(3));

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn expired_buffs_and_clean_actors_are_not_saved() {
    let dir = tempfile::tempdir().unwrap();
    let clock = Arc::new(ManualClock::new(START));

    let runtime = boot(dir.path(), StorageFormat::Json, clock.clone()).await;
    let handle = runtime.handle();
    handle.set_exposure(ALICE, 10).await.unwrap();
    handle.set_exposure(ALICE, 0).await.unwrap();
    handle
        .apply_timed_buff(BOB, Duration::from_secs(5))
        .await
        .unwrap();
    clock.advance(Duration::from_secs(5));
    runtime.shutdown().await.unwrap();

    let repository = FileStateRepository::new(dir.path(), StorageFormat::Json).unwrap();
    assert!(repository.load_exposures().unwrap().is_empty());
}

#[tokio::test]
async fn bincode_format_round_trips_through_runtime() {
    let dir = tempfile::tempdir().unwrap();
    let clock = Arc::new(ManualClock::new(START));

    let runtime = boot(dir.path(), StorageFormat::Bincode, clock.clone()).await;
    let handle = runtime.handle();
    let source = handle
        .create_source("Core", at(1.5), 12, 100, 10)
        .await
        .unwrap();
    handle.set_exposure(BOB, 99).await.unwrap();
    handle.save().await.unwrap();

    assert!(dir.path().join("sources.bin").exists());
    assert!(dir.path().join("exposure.bin").exists());
    runtime.shutdown().await.unwrap();

    let runtime = boot(dir.path(), StorageFormat::Bincode, clock).await;
    let handle = runtime.handle();
    assert_eq!(handle.source(source.id()).await.unwrap(), Some(source));
    assert_eq!(handle.exposure(BOB).await.unwrap(), 99);
    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn corrupted_files_start_empty() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("sources.json"), "{ not json").unwrap();
    fs::write(dir.path().join("exposure.json"), "[1, 2").unwrap();

    let clock = Arc::new(ManualClock::new(START));
    let runtime = boot(dir.path(), StorageFormat::Json, clock).await;
    let handle = runtime.handle();

    assert!(handle.sources().await.unwrap().is_empty());
    assert_eq!(handle.exposure(ALICE).await.unwrap(), 0);

    // The next save replaces the damaged files.
    handle
        .create_source("Fresh", at(0.0), 5, 5, 5)
        .await
        .unwrap();
    runtime.shutdown().await.unwrap();

    let repository = FileStateRepository::new(dir.path(), StorageFormat::Json).unwrap();
    let store = repository.load_sources().unwrap().unwrap();
    assert_eq!(store.sources.len(), 1);
    assert_eq!(store.sources[0].name, "Fresh");
}

#[tokio::test]
async fn out_of_range_records_are_clamped_on_load() {
    let dir = tempfile::tempdir().unwrap();
    let contents = serde_json::json!({
        "next_id": 2,
        "sources": [{
            "id": 1,
            "name": "Hot",
            "world": "wasteland",
            "x": 0.0,
            "y": 70.0,
            "z": -4.0,
            "radius": -8,
            "strength": 500,
            "power": 0,
            "active": true
        }]
    });
    fs::write(dir.path().join("sources.json"), contents.to_string()).unwrap();

    let clock = Arc::new(ManualClock::new(START));
    let runtime = boot(dir.path(), StorageFormat::Json, clock).await;
    let handle = runtime.handle();

    let hot = handle.source_by_name("hot").await.unwrap().unwrap();
    assert_eq!(hot.radius(), 1);
    assert_eq!(hot.strength(), 100);
    assert_eq!(hot.power(), 1);

    runtime.shutdown().await.unwrap();
}
