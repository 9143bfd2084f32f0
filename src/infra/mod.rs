//! [`DatasetSource`] adapters.
//!
//! [`LocalDirSource`] reads a directory (or a single file) from disk,
//! [`S3Source`] lists and downloads objects under an S3 prefix, and
//! [`HttpSource`] fetches a single document over HTTP.

mod http;
mod local;
mod s3;

pub use http::HttpSource;
pub use local::LocalDirSource;
pub use s3::S3Source;

use anyhow::{Result, bail};
use chrono::{Days, NaiveDate};
use tracing::info;

use crate::fetch::BasicClient;
use crate::services::dataset_source::DatasetSource;

/// Days to try for a dated source, newest first: `date`, then up to
/// `max_days_back - 1` earlier days.
pub(crate) fn candidate_days(date: NaiveDate, max_days_back: u32) -> impl Iterator<Item = NaiveDate> {
    (0..max_days_back.max(1))
        .filter_map(move |back| date.checked_sub_days(Days::new(u64::from(back))))
}

/// Splits `s3://bucket/some/prefix` into `("bucket", "some/prefix/")`.
pub fn parse_s3_location(location: &str) -> Option<(String, String)> {
    let rest = location.strip_prefix("s3://")?;
    let (bucket, prefix) = rest.split_once('/').unwrap_or((rest, ""));
    if bucket.is_empty() {
        return None;
    }

    let prefix = if prefix.is_empty() || prefix.ends_with('/') {
        prefix.to_string()
    } else {
        format!("{prefix}/")
    };

    Some((bucket.to_string(), prefix))
}

/// Opens the source named by `location`: an `s3://` URI, an `http(s)://`
/// URL, or a local path.
///
/// `date` selects a dated sub-directory (`YYYY-MM-DD/`) for S3 and local
/// sources, falling back up to `max_days_back` days. HTTP sources ignore it.
pub async fn open_source(
    location: &str,
    date: Option<NaiveDate>,
    max_days_back: u32,
) -> Result<Box<dyn DatasetSource>> {
    let source: Box<dyn DatasetSource> = if location.starts_with("s3://") {
        let Some((bucket, prefix)) = parse_s3_location(location) else {
            bail!("missing bucket in '{location}'");
        };

        let config = aws_config::load_from_env().await;
        let client = aws_sdk_s3::Client::new(&config);
        Box::new(S3Source::new(client, bucket, prefix).with_date(date, max_days_back))
    } else if location.starts_with("http://") || location.starts_with("https://") {
        Box::new(HttpSource::new(BasicClient::new()?, location))
    } else {
        Box::new(LocalDirSource::new(location).with_date(date, max_days_back))
    };

    info!(source = %source.describe(), "Opened dataset source");
    Ok(source)
}
