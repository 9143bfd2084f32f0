use anyhow::{Context, Result, bail};
use bytes::Bytes;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::candidate_days;
use crate::services::dataset_source::DatasetSource;

/// Reads `*.json` documents from a local directory, or a single file.
pub struct LocalDirSource {
    root: PathBuf,
    date: Option<NaiveDate>,
    max_days_back: u32,
}

impl LocalDirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            date: None,
            max_days_back: 1,
        }
    }

    /// Reads from `<root>/<YYYY-MM-DD>/` instead, walking back day by day
    /// until a directory with documents is found.
    pub fn with_date(mut self, date: Option<NaiveDate>, max_days_back: u32) -> Self {
        self.date = date;
        self.max_days_back = max_days_back;
        self
    }
}

async fn json_files(dir: &Path) -> Result<Vec<String>> {
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .with_context(|| format!("cannot read directory {}", dir.display()))?;

    let mut names = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) == Some("json") {
            names.push(path.display().to_string());
        }
    }
    names.sort();

    Ok(names)
}

#[async_trait::async_trait]
impl DatasetSource for LocalDirSource {
    fn describe(&self) -> String {
        self.root.display().to_string()
    }

    async fn list(&self) -> Result<Vec<String>> {
        if self.root.is_file() {
            return Ok(vec![self.root.display().to_string()]);
        }

        let Some(date) = self.date else {
            return json_files(&self.root).await;
        };

        for day in candidate_days(date, self.max_days_back) {
            let dir = self.root.join(day.format("%Y-%m-%d").to_string());
            if !dir.is_dir() {
                debug!(dir = %dir.display(), "No directory for date");
                continue;
            }

            let names = json_files(&dir).await?;
            if !names.is_empty() {
                info!(date = %day, documents = names.len(), "Using local documents");
                return Ok(names);
            }
        }

        bail!(
            "no documents under {} in the {} day(s) up to {}",
            self.root.display(),
            self.max_days_back.max(1),
            date
        )
    }

    async fn fetch(&self, name: &str) -> Result<Bytes> {
        let bytes = tokio::fs::read(name)
            .await
            .with_context(|| format!("cannot read {name}"))?;
        Ok(Bytes::from(bytes))
    }
}
