use anyhow::{Context, Result, bail};
use bytes::Bytes;
use chrono::NaiveDate;
use tracing::{debug, info};

use super::candidate_days;
use crate::services::dataset_source::DatasetSource;

/// Lists and downloads `*.json` objects under an S3 prefix.
pub struct S3Source {
    client: aws_sdk_s3::Client,
    bucket: String,
    prefix: String,
    date: Option<NaiveDate>,
    max_days_back: u32,
}

impl S3Source {
    pub fn new(
        client: aws_sdk_s3::Client,
        bucket: impl Into<String>,
        prefix: impl Into<String>,
    ) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            prefix: prefix.into(),
            date: None,
            max_days_back: 1,
        }
    }

    /// Lists `<prefix><YYYY-MM-DD>/` instead, walking back day by day until
    /// a day with documents is found.
    pub fn with_date(mut self, date: Option<NaiveDate>, max_days_back: u32) -> Self {
        self.date = date;
        self.max_days_back = max_days_back;
        self
    }

    async fn list_json_keys(&self, prefix: &str) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        let mut continuation_token: Option<String> = None;

        loop {
            let resp = self
                .client
                .list_objects_v2()
                .bucket(&self.bucket)
                .prefix(prefix)
                .set_continuation_token(continuation_token.take())
                .send()
                .await
                .with_context(|| format!("ListObjectsV2 failed for s3://{}/{prefix}", self.bucket))?;

            keys.extend(
                resp.contents()
                    .iter()
                    .filter_map(|obj| obj.key())
                    .filter(|key| key.ends_with(".json"))
                    .map(str::to_string),
            );

            match resp.next_continuation_token() {
                Some(token) if resp.is_truncated() == Some(true) => {
                    continuation_token = Some(token.to_string());
                }
                _ => break,
            }
        }

        debug!(bucket = %self.bucket, prefix, keys = keys.len(), "Listed S3 objects");
        Ok(keys)
    }
}

#[async_trait::async_trait]
impl DatasetSource for S3Source {
    fn describe(&self) -> String {
        format!("s3://{}/{}", self.bucket, self.prefix)
    }

    async fn list(&self) -> Result<Vec<String>> {
        let Some(date) = self.date else {
            return self.list_json_keys(&self.prefix).await;
        };

        for day in candidate_days(date, self.max_days_back) {
            let prefix = format!("{}{}/", self.prefix, day.format("%Y-%m-%d"));
            let keys = self.list_json_keys(&prefix).await?;

            if !keys.is_empty() {
                info!(date = %day, documents = keys.len(), "Using S3 documents");
                return Ok(keys);
            }
            info!(date = %day, "No S3 documents for date");
        }

        bail!(
            "no documents under {} in the {} day(s) up to {}",
            self.describe(),
            self.max_days_back.max(1),
            date
        )
    }

    async fn fetch(&self, name: &str) -> Result<Bytes> {
        let resp = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(name)
            .send()
            .await
            .with_context(|| format!("GetObject failed for s3://{}/{name}", self.bucket))?;

        let body = resp.body.collect().await?;
        Ok(body.into_bytes())
    }
}
