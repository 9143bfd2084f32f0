use chrono::NaiveDate;
use rail_delay_map::analyzers::analyzer::{
    PublishTarget, compute_render_state, load_observations, load_routes, publish, refresh,
};
use rail_delay_map::analyzers::grade::{DelayBucket, MaxDelayTier};
use rail_delay_map::infra::LocalDirSource;
use rail_delay_map::store::RenderStore;
use rail_delay_map::topology::unique_stations;
use std::env;
use std::fs;

fn fixture(path: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), path)
}

fn sources() -> (LocalDirSource, LocalDirSource) {
    (
        LocalDirSource::new(fixture("routes")),
        LocalDirSource::new(fixture("delays")),
    )
}

#[tokio::test]
async fn test_full_pipeline() {
    let (routes, delays) = sources();

    let state = refresh(&routes, &delays).await.expect("pipeline failed");

    let pairs: Vec<_> = state
        .segments
        .iter()
        .map(|s| (s.start_station.as_str(), s.end_station.as_str()))
        .collect();
    assert_eq!(
        pairs,
        vec![
            ("Budapest-Keleti", "Székesfehérvár"),
            ("Budapest-Nyugati", "Kecskemét"),
            ("Budapest-Nyugati", "Szeged"),
            ("Cegléd", "Kecskemét"),
        ]
    );

    let keleti = &state.segments[0];
    assert_eq!(keleti.average_delay, 17.5);
    assert_eq!(keleti.max_delay, 20);
    assert_eq!(keleti.bucket, DelayBucket::Major);
    assert_eq!(keleti.max_delay_tier, MaxDelayTier::Moderate);
    assert_eq!(keleti.route_desc, "Unknown Route");
    assert_eq!(keleti.pattern_name, "S 4210");
    assert_eq!(keleti.route_color, "DC143C");

    let on_time = &state.segments[1];
    assert_eq!(on_time.bucket, DelayBucket::OnTime);
    assert_eq!(on_time.sample_count, 0);
    assert_eq!(on_time.weight, 2);
    assert_eq!(on_time.coordinates.len(), 3);

    let szeged = &state.segments[2];
    assert_eq!(szeged.average_delay, 6.5);
    assert_eq!(szeged.max_delay, 8);
    assert_eq!(szeged.sample_count, 2);
    assert_eq!(szeged.bucket, DelayBucket::Significant);
    assert_eq!(szeged.max_delay_tier, MaxDelayTier::Minor);
    assert_eq!(szeged.color, "#FF6600");
    assert_eq!(szeged.coordinates.first(), Some(&[47.5105, 19.0566]));
    assert_eq!(szeged.coordinates.last(), Some(&[46.2440, 20.1447]));
    assert_eq!(szeged.route_desc, "Budapest - Szeged");
    assert_eq!(szeged.pattern_name, "Szeged");

    let cegled = &state.segments[3];
    assert_eq!(cegled.average_delay, 1.0);
    assert_eq!(cegled.bucket, DelayBucket::Slight);
    assert_eq!(cegled.stations, vec!["Cegléd", "Kecskemét"]);
}

#[tokio::test]
async fn test_network_summary_includes_unmatched_pairs() {
    let (routes, delays) = sources();

    let state = refresh(&routes, &delays).await.unwrap();
    let summary = &state.summary;

    // Averages: 17.5, 0, 6.5, 3 (no matching pattern), 1.
    assert_eq!(summary.route_pairs, 5);
    assert!((summary.mean_delay - 5.6).abs() < 1e-9);
    assert_eq!(summary.median_delay, 3.0);
    assert_eq!(summary.max_delay, 17.5);
    assert_eq!(summary.pairs_on_time, 1);
    assert_eq!(summary.pairs_delayed, 4);
    assert_eq!(summary.pairs_significantly_delayed, 2);
    assert!((summary.on_time_percentage - 20.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_loaders_skip_bad_documents_and_stale_snapshots() {
    let (routes, delays) = sources();

    let routes = load_routes(&routes).await.unwrap();
    assert_eq!(routes.len(), 2);
    assert_eq!(routes[0].patterns.len(), 1);

    let observations = load_observations(&delays).await.unwrap();
    assert!(observations.iter().all(|o| o.departure_delay() != Some(99)));
    assert!(observations.iter().all(|o| o.departure_delay() != Some(500)));
    assert!(
        observations
            .iter()
            .any(|o| o.station_pair() == Some(("005510033", "005517228")))
    );
}

#[tokio::test]
async fn test_unique_stations_from_fixtures() {
    let (routes, _) = sources();
    let routes = load_routes(&routes).await.unwrap();

    let codes: Vec<_> = unique_stations(&routes)
        .iter()
        .map(|s| s.code.as_str())
        .collect();

    assert_eq!(codes.len(), 6);
    assert!(codes.contains(&"005510017"));
    assert!(codes.contains(&"005510157"));
}

#[tokio::test]
async fn test_dated_source_falls_back_to_earlier_day() {
    let routes = LocalDirSource::new(fixture("routes"));
    let date = NaiveDate::from_ymd_opt(2025, 7, 23).unwrap();

    let delays = LocalDirSource::new(fixture("dated")).with_date(Some(date), 3);
    let state = refresh(&routes, &delays).await.unwrap();

    assert_eq!(state.segments.len(), 1);
    assert_eq!(state.segments[0].average_delay, 8.0);
    assert_eq!(state.segments[0].max_delay, 12);

    let too_short = LocalDirSource::new(fixture("dated")).with_date(Some(date), 2);
    assert!(refresh(&routes, &too_short).await.is_err());
}

#[tokio::test]
async fn test_compact_in_directory_name_keeps_snapshots() {
    let routes = LocalDirSource::new(fixture("routes"));
    let delays = LocalDirSource::new(fixture("mav_compact_runs"));

    let observations = load_observations(&delays).await.unwrap();
    assert_eq!(observations.len(), 2);

    let state = refresh(&routes, &delays).await.unwrap();
    assert_eq!(state.summary.route_pairs, 1);
    assert_eq!(state.segments.len(), 1);
    assert_eq!(state.segments[0].average_delay, 6.5);
}

#[tokio::test]
async fn test_store_keeps_state_when_source_disappears() {
    let (routes, delays) = sources();
    let store = RenderStore::new();
    store.refresh(&routes, &delays).await.unwrap();

    let missing = LocalDirSource::new(fixture("no_such_directory"));
    assert!(store.refresh(&routes, &missing).await.is_err());

    let kept = store.current().await.unwrap();
    assert_eq!(kept.segments.len(), 4);
}

#[tokio::test]
async fn test_publish_writes_document_and_history() {
    let (routes, delays) = sources();
    let state = refresh(&routes, &delays).await.unwrap();

    let output = format!("{}/rail_delay_map_it_render.json", env::temp_dir().display());
    let history = format!("{}/rail_delay_map_it_history.csv", env::temp_dir().display());
    let _ = fs::remove_file(&output);
    let _ = fs::remove_file(&history);

    let target = PublishTarget {
        output: Some(output.clone()),
        history: Some(history.clone()),
        ..Default::default()
    };
    publish(&state, &target).await.unwrap();
    publish(&state, &target).await.unwrap();

    let document: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(document["schema_version"], 1);
    assert!(document["generated_at"].is_string());
    assert_eq!(document["segments"].as_array().unwrap().len(), 4);
    assert_eq!(document["segments"][2]["bucket"], "significant");
    assert_eq!(document["summary"]["route_pairs"], 5);

    let rows = fs::read_to_string(&history).unwrap();
    assert_eq!(rows.lines().count(), 3);

    fs::remove_file(&output).unwrap();
    fs::remove_file(&history).unwrap();
}

#[test]
fn test_empty_inputs() {
    let state = compute_render_state(&[], &[]);

    assert!(state.segments.is_empty());
    assert_eq!(state.summary.route_pairs, 0);
    assert_eq!(state.summary.on_time_percentage, 0.0);
}
