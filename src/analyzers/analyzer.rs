use crate::analyzers::aggregate::aggregate_delays;
use crate::analyzers::summary::summarize_network;
use crate::analyzers::synthesize::synthesize_all;
use crate::analyzers::types::{RenderDocument, RenderState, SummaryRecord};
use crate::analyzers::writetos3::write_json_to_s3;
use crate::observation::DelayObservation;
use crate::output::append_record;
use crate::parser::{parse_delay_file, parse_route_file, select_latest_snapshots};
use crate::services::dataset_source::DatasetSource;
use crate::topology::Route;
use anyhow::{Context, Result};
use bytes::Bytes;
use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::{info, warn};

/// Documents fetched at once from a single source.
const FETCH_CONCURRENCY: usize = 8;

/// Joins delay observations against the route topology.
///
/// Pure and total: malformed observations are skipped, unmatched pairs yield
/// no segments, and empty inputs produce an empty state with a zeroed
/// summary.
pub fn compute_render_state(routes: &[Route], observations: &[DelayObservation]) -> RenderState {
    let summaries = aggregate_delays(observations);
    let segments = synthesize_all(routes, &summaries);
    let summary = summarize_network(&summaries);

    RenderState { segments, summary }
}

async fn fetch_all(source: &dyn DatasetSource, names: Vec<String>) -> Result<Vec<(String, Bytes)>> {
    stream::iter(names)
        .map(|name| async move {
            let bytes = source.fetch(&name).await?;
            Ok::<_, anyhow::Error>((name, bytes))
        })
        .buffered(FETCH_CONCURRENCY)
        .try_collect()
        .await
}

/// Loads every route document from `source`. Undecodable documents are
/// skipped; listing or fetching errors fail the load.
#[tracing::instrument(skip(source), fields(source = %source.describe()))]
pub async fn load_routes(source: &dyn DatasetSource) -> Result<Vec<Route>> {
    let names = source.list().await?;
    let documents = fetch_all(source, names).await?;
    let document_count = documents.len();

    let mut routes = Vec::new();
    for (name, bytes) in documents {
        match parse_route_file(&bytes) {
            Ok(Some(route)) => routes.push(route),
            Ok(None) => warn!(document = %name, "Document has no route, skipping"),
            Err(e) => warn!(document = %name, error = %e, "Route document parse failed"),
        }
    }

    info!(documents = document_count, routes = routes.len(), "Routes loaded");
    Ok(routes)
}

/// Loads the latest delay snapshot per station pair from `source`.
#[tracing::instrument(skip(source), fields(source = %source.describe()))]
pub async fn load_observations(source: &dyn DatasetSource) -> Result<Vec<DelayObservation>> {
    let listed = source.list().await?;
    let listed_count = listed.len();

    let (names, snapshots): (Vec<_>, Vec<_>) = select_latest_snapshots(listed).into_iter().unzip();
    let documents = fetch_all(source, names).await?;
    let document_count = documents.len();

    let mut observations = Vec::new();
    for ((name, bytes), snapshot) in documents.into_iter().zip(snapshots) {
        let pair = snapshot
            .as_ref()
            .map(|s| (s.start.as_str(), s.end.as_str()));

        match parse_delay_file(&bytes, pair) {
            Ok(parsed) => observations.extend(parsed),
            Err(e) => warn!(document = %name, error = %e, "Delay document parse failed"),
        }
    }

    info!(
        listed = listed_count,
        documents = document_count,
        observations = observations.len(),
        "Delay observations loaded"
    );
    Ok(observations)
}

/// Loads both datasets concurrently. Either failing fails the whole load.
pub async fn load_datasets(
    routes: &dyn DatasetSource,
    delays: &dyn DatasetSource,
) -> Result<(Vec<Route>, Vec<DelayObservation>)> {
    tokio::try_join!(
        async { load_routes(routes).await.context("route dataset load failed") },
        async { load_observations(delays).await.context("delay dataset load failed") },
    )
}

/// Runs the full load and compute pipeline from scratch.
pub async fn refresh(routes: &dyn DatasetSource, delays: &dyn DatasetSource) -> Result<RenderState> {
    let (routes, observations) = load_datasets(routes, delays).await?;
    let state = compute_render_state(&routes, &observations);

    info!(
        routes = routes.len(),
        observations = observations.len(),
        pairs = state.summary.route_pairs,
        segments = state.segments.len(),
        "Render state computed"
    );
    Ok(state)
}

/// Where a computed render state is written.
#[derive(Debug, Default, Clone)]
pub struct PublishTarget {
    /// Local JSON file for the render document.
    pub output: Option<String>,
    /// CSV file receiving one summary row per publish.
    pub history: Option<String>,
    pub s3_bucket: Option<String>,
    pub s3_key: String,
    pub gzip: bool,
}

/// Writes the render document locally, appends to the summary history and
/// uploads to S3, as configured.
#[tracing::instrument(skip(state))]
pub async fn publish(state: &RenderState, target: &PublishTarget) -> Result<()> {
    let document = RenderDocument::new(state);

    if let Some(path) = &target.output {
        let body = serde_json::to_vec_pretty(&document)?;
        tokio::fs::write(path, body)
            .await
            .with_context(|| format!("cannot write {path}"))?;
        info!(path = %path, segments = state.segments.len(), "Render document written");
    }

    if let Some(path) = &target.history {
        append_record(path, &SummaryRecord::from_state(state))?;
    }

    if let Some(bucket) = &target.s3_bucket {
        let config = aws_config::load_from_env().await;
        let s3 = aws_sdk_s3::Client::new(&config);

        write_json_to_s3(&s3, bucket, &target.s3_key, &document, target.gzip).await?;
        info!(bucket = %bucket, key = %target.s3_key, gzip = target.gzip, "Render document uploaded");
    }

    Ok(())
}
