use anyhow::Result;
use bytes::Bytes;

use crate::fetch::{HttpClient, fetch_bytes};
use crate::services::dataset_source::DatasetSource;

/// A single document served at a URL.
pub struct HttpSource<C> {
    client: C,
    url: String,
}

impl<C: HttpClient> HttpSource<C> {
    pub fn new(client: C, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait::async_trait]
impl<C: HttpClient> DatasetSource for HttpSource<C> {
    fn describe(&self) -> String {
        self.url.clone()
    }

    async fn list(&self) -> Result<Vec<String>> {
        Ok(vec![self.url.clone()])
    }

    #[tracing::instrument(skip(self))]
    async fn fetch(&self, name: &str) -> Result<Bytes> {
        fetch_bytes(&self.client, name).await
    }
}
