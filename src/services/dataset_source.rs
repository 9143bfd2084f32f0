//! Trait for the collaborators that fetch raw dataset documents.

use anyhow::Result;
use bytes::Bytes;

/// A location holding raw JSON documents: a directory, an S3 prefix, or a
/// single URL.
///
/// Implementations only list and fetch. Decoding and snapshot selection
/// happen in the pipeline, so any caching or retry policy stays here.
#[async_trait::async_trait]
pub trait DatasetSource: Send + Sync {
    /// Human-readable location, used in logs and errors.
    fn describe(&self) -> String;

    /// Returns the names of every document at this location.
    async fn list(&self) -> Result<Vec<String>>;

    /// Fetches one document previously returned by [`DatasetSource::list`].
    async fn fetch(&self, name: &str) -> Result<Bytes>;
}
